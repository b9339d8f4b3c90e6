//! wp-import CLI - Bulk import CSV posts into WordPress
//!
//! # Commands
//!
//! ```bash
//! wp-import import blog_posts.csv           # Create every row as a post
//! wp-import preview blog_posts.csv          # Print the post payloads, no network
//! wp-import statuses                        # Show the status label mapping
//! ```
//!
//! Connection settings come from the environment (or a `.env` file):
//! `WP_BASE_URL`, `WP_API_KEY`, `DEFAULT_AUTHOR_ID`, optionally
//! `WP_TIMEOUT_SECS`.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use wp_import::config::author_id_from_env;
use wp_import::{
    import_csv, preview_csv, Config, ImportOptions, ImportSummary, WpClient, STATUS_TABLE,
};

#[derive(Parser)]
#[command(name = "wp-import")]
#[command(about = "Bulk import CSV blog posts into WordPress", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every row of a CSV file as a WordPress post
    Import {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Remember resolved categories and tags for the rest of the run
        #[arg(long)]
        cache_terms: bool,
    },

    /// Print the post payloads a CSV file would produce, without importing
    Preview {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Author id to put in the payloads (default: DEFAULT_AUTHOR_ID or 0)
        #[arg(short, long)]
        author: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how status labels map to WordPress post statuses
    Statuses,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            input,
            delimiter,
            cache_terms,
        } => cmd_import(&input, delimiter, cache_terms).await,

        Commands::Preview {
            input,
            delimiter,
            author,
            output,
        } => cmd_preview(&input, delimiter, author, output.as_deref()),

        Commands::Statuses => cmd_statuses(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_import(
    input: &Path,
    delimiter: Option<char>,
    cache_terms: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let client = WpClient::new(&config)?;
    eprintln!("🔗 Target: {}", client.base_url());

    let options = ImportOptions {
        delimiter,
        cache_terms,
    };
    let summary = import_csv(&client, &config, input, &options).await?;

    print_summary(&summary);
    eprintln!("\n✨ Done!");
    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    eprintln!("\n📊 Results: {} rows", summary.rows);
    eprintln!(
        "   Posts: {} created, {} failed",
        summary.posts_created, summary.posts_failed
    );
    eprintln!(
        "   Images: {} uploaded, {} failed",
        summary.images_uploaded, summary.images_failed
    );
    eprintln!(
        "   Terms: {} created, {} failed",
        summary.terms_created, summary.terms_failed
    );
}

fn cmd_preview(
    input: &Path,
    delimiter: Option<char>,
    author: Option<u64>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Previewing: {}", input.display());

    let author_id = match author {
        Some(id) => id,
        None => author_id_from_env()?.unwrap_or(0),
    };
    let options = ImportOptions {
        delimiter,
        cache_terms: false,
    };
    let posts = preview_csv(input, author_id, &options)?;
    eprintln!("   {} posts", posts.len());

    let json = serde_json::to_string_pretty(&posts)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_statuses() -> Result<(), Box<dyn std::error::Error>> {
    for (label, status) in STATUS_TABLE.iter() {
        println!("  {:<10} → {}", label, status);
    }
    println!("  {:<10} → {}", "(other)", wp_import::PostStatus::Draft);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

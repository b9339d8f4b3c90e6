//! Row-by-row import of a post table.
//!
//! For every row, in file order:
//! 1. upload the featured image (if any)
//! 2. map the status label
//! 3. resolve each tag name as a tag and as a category
//! 4. assemble and submit the post
//!
//! A failing step leaves a hole in that row's post (no featured media, a
//! missing term) or loses the post itself, but never stops the loop. Only
//! failing to load the file aborts a run.
//!
//! # Example
//!
//! ```rust,ignore
//! use wp_import::{import_csv, Config, ImportOptions, WpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = WpClient::new(&config)?;
//!     let summary = import_csv(&client, &config, "blog_posts.csv", &ImportOptions::default()).await?;
//!     println!("{} posts created", summary.posts_created);
//!     Ok(())
//! }
//! ```

use std::path::Path;

use crate::api::HttpTransport;
use crate::config::Config;
use crate::error::ImportResult;
use crate::logs::{
    log_error_indent, log_info, log_info_indent, log_success, log_success_indent,
    log_warning_indent,
};
use crate::media::upload_featured_image;
use crate::models::{MediaId, PostRecord, Row, TaxonomyKind, TermId};
use crate::parser::{read_rows, ParseResult};
use crate::publish::create_post;
use crate::taxonomy::{TermOrigin, TermResolver};

/// Options for an import run
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// CSV delimiter (auto-detect if `None`)
    pub delimiter: Option<char>,
    /// Remember resolved term ids for the rest of the run
    pub cache_terms: bool,
}

/// What a run did, for the closing report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub posts_created: usize,
    pub posts_failed: usize,
    pub images_uploaded: usize,
    pub images_failed: usize,
    pub terms_created: usize,
    pub terms_failed: usize,
}

/// Drives rows through upload, term resolution and publishing.
pub struct Importer<'a, T> {
    api: &'a T,
    author_id: u64,
    resolver: TermResolver<'a, T>,
    summary: ImportSummary,
}

impl<'a, T: HttpTransport> Importer<'a, T> {
    pub fn new(api: &'a T, config: &Config, options: &ImportOptions) -> Self {
        let resolver = if options.cache_terms {
            TermResolver::cached(api)
        } else {
            TermResolver::new(api)
        };

        Self {
            api,
            author_id: config.author_id,
            resolver,
            summary: ImportSummary::default(),
        }
    }

    /// Process every row in order and return the tally.
    pub async fn run(mut self, rows: &[Row]) -> ImportSummary {
        for row in rows {
            self.process_row(row).await;
        }

        if let Some(hits) = self.resolver.cache_hits() {
            log_info(format!("Term cache answered {} lookup(s)", hits));
        }
        self.summary
    }

    /// Import a single row. Failures are reported and absorbed.
    pub async fn process_row(&mut self, row: &Row) {
        self.summary.rows += 1;
        log_info(format!("Processing row {}: {}", row.number, row.display_title()));

        let featured_media = self.featured_media(row).await;
        let term_ids = self.term_ids(row).await;

        let post = PostRecord::assemble(row, self.author_id, term_ids, featured_media);
        self.publish(&post).await;
    }

    async fn featured_media(&mut self, row: &Row) -> Option<MediaId> {
        match upload_featured_image(self.api, row.featured_image.as_deref()).await {
            Ok(Some(media)) => {
                self.summary.images_uploaded += 1;
                log_success_indent(
                    format!("Image uploaded successfully: {} (ID {})", media.filename, media.id),
                    1,
                );
                Some(media.id)
            }
            Ok(None) => {
                log_info_indent("No image URL provided.", 1);
                None
            }
            Err(e) => {
                self.summary.images_failed += 1;
                log_warning_indent(format!("{}; continuing without featured image", e), 1);
                None
            }
        }
    }

    /// Resolve every tag name as a tag and as a category into one id list.
    ///
    /// Ids keep first-seen order and never repeat.
    async fn term_ids(&mut self, row: &Row) -> Vec<TermId> {
        let mut ids = Vec::new();

        for name in row.tag_names() {
            for kind in [TaxonomyKind::Tag, TaxonomyKind::Category] {
                if let Some(id) = self.resolve_term(kind, name).await {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
        }

        ids
    }

    async fn resolve_term(&mut self, kind: TaxonomyKind, name: &str) -> Option<TermId> {
        match self.resolver.resolve(kind, name).await {
            Ok(term) => {
                match term.origin {
                    TermOrigin::Created => {
                        self.summary.terms_created += 1;
                        log_success_indent(format!("Created {}: {} (ID {})", kind, name, term.id), 1);
                    }
                    TermOrigin::AlreadyExists => {
                        log_info_indent(
                            format!(
                                "{} '{}' already exists with ID {}. Using existing ID.",
                                capitalize(kind.label()),
                                name,
                                term.id
                            ),
                            1,
                        );
                    }
                    TermOrigin::Existing | TermOrigin::Cached => {}
                }
                Some(term.id)
            }
            Err(e) => {
                self.summary.terms_failed += 1;
                log_error_indent(format!("Failed to resolve {} '{}': {}", kind, name, e), 1);
                None
            }
        }
    }

    async fn publish(&mut self, post: &PostRecord) {
        match create_post(self.api, post).await {
            Ok(id) => {
                self.summary.posts_created += 1;
                let id = id.map(|id| format!(" (ID {})", id)).unwrap_or_default();
                log_success_indent(format!("Post '{}' created successfully!{}", post.title, id), 1);
            }
            Err(e) => {
                self.summary.posts_failed += 1;
                log_error_indent(format!("Failed to create post: {}", e), 1);
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Load a CSV file and import every row.
///
/// Returns an error only when the file cannot be loaded; nothing is sent to
/// the remote in that case.
pub async fn import_csv<T: HttpTransport>(
    api: &T,
    config: &Config,
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> ImportResult<ImportSummary> {
    let parsed = load(path.as_ref(), options)?;
    Ok(Importer::new(api, config, options).run(&parsed.rows).await)
}

/// Assemble the post payloads of a CSV file without contacting the remote.
///
/// Featured media and terms are left empty since resolving them needs the
/// remote API. Prints nothing, so the payloads can go to stdout as is.
pub fn preview_csv(
    path: impl AsRef<Path>,
    author_id: u64,
    options: &ImportOptions,
) -> ImportResult<Vec<PostRecord>> {
    let parsed = read_rows(path, options.delimiter)?;
    Ok(parsed
        .rows
        .iter()
        .map(|row| PostRecord::assemble(row, author_id, Vec::new(), None))
        .collect())
}

fn load(path: &Path, options: &ImportOptions) -> ImportResult<ParseResult> {
    log_info(format!("📖 Reading CSV file: {}", path.display()));
    let parsed = read_rows(path, options.delimiter)?;

    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} rows", parsed.rows.len()));
    Ok(parsed)
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

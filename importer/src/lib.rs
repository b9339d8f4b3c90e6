//! # wp-import - Bulk import blog posts into WordPress
//!
//! Reads a CSV table of posts and creates each one through the WordPress
//! REST API, uploading its featured image and creating missing categories
//! and tags on the way.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│ Media+Terms │────▶│    Posts    │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │  (per row)  │     │  (REST API) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Rows are processed one at a time, one request at a time. A failed request
//! degrades the row's post (no image, a missing term) and the run moves on.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wp_import::{import_csv, Config, ImportOptions, WpClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().unwrap();
//!     let client = WpClient::new(&config).unwrap();
//!     let summary = import_csv(&client, &config, "blog_posts.csv", &ImportOptions::default())
//!         .await
//!         .unwrap();
//!     println!("Created {} posts", summary.posts_created);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`config`] - Environment-driven run configuration
//! - [`models`] - Rows, statuses, post payloads
//! - [`parser`] - CSV parsing with auto-detection
//! - [`api`] - HTTP transport and the reqwest client
//! - [`media`] - Featured image upload
//! - [`taxonomy`] - Category/tag lookup and creation
//! - [`cache`] - Optional in-process term cache
//! - [`publish`] - Post creation
//! - [`pipeline`] - The row loop
//! - [`logs`] - Console narration

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Input
pub mod parser;

// Remote API
pub mod api;
pub mod cache;
pub mod media;
pub mod publish;
pub mod taxonomy;

// Orchestration
pub mod logs;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ApiError, ConfigError, CsvError, ImportError, MediaError};

// =============================================================================
// Re-exports - Configuration & Models
// =============================================================================

pub use config::Config;

pub use models::{
    MediaId,
    PostId,
    PostMeta,
    PostRecord,
    PostStatus,
    Row,
    TaxonomyKind,
    TermId,
    STATUS_TABLE,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes,
    read_rows,
    ParseResult,
    REQUIRED_COLUMNS,
};

// =============================================================================
// Re-exports - Remote API
// =============================================================================

pub use api::{FileUpload, HttpResponse, HttpTransport, WpClient};
pub use cache::TermCache;
pub use media::{upload_featured_image, UploadedMedia};
pub use publish::create_post;
pub use taxonomy::{get_or_create_term, ResolvedTerm, TermOrigin, TermResolver};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{import_csv, preview_csv, ImportOptions, ImportSummary, Importer};

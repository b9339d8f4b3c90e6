//! Error types for the import pipeline.
//!
//! One error type per layer:
//!
//! - [`CsvError`] - Input file loading errors
//! - [`ConfigError`] - Startup configuration errors
//! - [`ApiError`] - Remote API call errors
//! - [`ImportError`] - Top-level errors that abort a run
//!
//! Only [`ImportError`] ever reaches the CLI. [`ApiError`] is caught per
//! sub-step inside the row loop and turned into a missing piece of data.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Input Errors
// =============================================================================

/// Errors while loading the input table.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The input path does not exist.
    #[error("File '{}' not found. Please ensure the file is in the correct directory.", .0.display())]
    FileNotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed CSV content.
    #[error("Invalid CSV format: {0}")]
    ParseError(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Delimiter must be a single ASCII character.
    #[error("Invalid delimiter '{0}': must be a single ASCII character")]
    InvalidDelimiter(char),

    /// Required header columns are absent.
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

impl CsvError {
    /// `true` for the `FileNotFound` kind, `false` for every read error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CsvError::FileNotFound(_))
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building the process-wide configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing {0} environment variable")]
    MissingVar(&'static str),

    /// An environment variable is set but unusable.
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },

    /// The HTTP client could not be built from the configuration.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

// =============================================================================
// Remote API Errors
// =============================================================================

/// Errors from a single remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (connect, TLS, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote answered with an unexpected status.
    #[error("HTTP {status}{}", with_body(.body))]
    Rejected { status: u16, body: String },

    /// Success status, but the body is not what was expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn with_body(body: &str) -> String {
    if body.trim().is_empty() {
        String::new()
    } else {
        format!(" - {}", body.trim())
    }
}

impl ApiError {
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            body: body.into(),
        }
    }

    /// HTTP status of a rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// Media Errors
// =============================================================================

/// Errors while turning an image URL into a media asset.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The image could not be downloaded.
    #[error("Failed to fetch image from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ApiError,
    },

    /// The media endpoint did not create the asset.
    #[error("Failed to upload image '{filename}': {source}")]
    Upload {
        filename: String,
        #[source]
        source: ApiError,
    },
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Errors that abort a whole run before any row is processed.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Input could not be loaded.
    #[error("{0}")]
    Csv(#[from] CsvError),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error (preview output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for remote API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for whole-run operations.
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let import_err: ImportError = csv_err.into();
        assert!(import_err.to_string().contains("empty"));

        let config_err = ConfigError::MissingVar("WP_API_KEY");
        let import_err: ImportError = config_err.into();
        assert!(import_err.to_string().contains("WP_API_KEY"));
    }

    #[test]
    fn test_not_found_kind() {
        assert!(CsvError::FileNotFound(PathBuf::from("posts.csv")).is_not_found());
        assert!(!CsvError::EmptyFile.is_not_found());
        assert!(!CsvError::MissingColumns(vec!["Tags".into()]).is_not_found());
    }

    #[test]
    fn test_rejection_format() {
        let err = ApiError::rejected(403, r#"{"code":"rest_forbidden"}"#);
        assert_eq!(err.status(), Some(403));
        let msg = err.to_string();
        assert!(msg.starts_with("HTTP 403 - "));
        assert!(msg.contains("rest_forbidden"));

        assert_eq!(ApiError::rejected(404, "").to_string(), "HTTP 404");
    }

    #[test]
    fn test_media_error_names_url() {
        let err = MediaError::Fetch {
            url: "https://x/img.png".into(),
            source: ApiError::rejected(404, ""),
        };
        assert_eq!(err.to_string(), "Failed to fetch image from https://x/img.png: HTTP 404");
    }

    #[test]
    fn test_missing_columns_format() {
        let err = CsvError::MissingColumns(vec!["Tags".into(), "Status".into()]);
        assert_eq!(err.to_string(), "Missing required column(s): Tags, Status");
    }
}

//! Access to the remote WordPress REST API.
//!
//! Components never talk to reqwest directly. They go through
//! [`HttpTransport`], implemented for real by [`WpClient`]. Routes are
//! relative to the configured base URL (`posts`, `media`, `tags?page=2`);
//! `download` alone takes an absolute URL and sends no credentials.

pub mod client;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

pub use client::WpClient;

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ApiError::InvalidResponse(format!("{} (status {}): {}", e, self.status, self.text()))
        })
    }

    /// Turn this response into a rejection carrying its status and body.
    pub fn into_rejection(self) -> ApiError {
        let body = self.text();
        ApiError::rejected(self.status, body)
    }
}

/// A file sent as the `file` part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// The four kinds of request the importer makes.
///
/// Any status the server answers with is `Ok`; only failures to complete the
/// exchange are `Err(ApiError::Transport)`.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// Unauthenticated GET of an absolute URL.
    async fn download(&self, url: &str) -> ApiResult<HttpResponse>;

    /// Authorized GET of an API route.
    async fn get(&self, route: &str) -> ApiResult<HttpResponse>;

    /// Authorized POST of a JSON body to an API route.
    async fn post_json<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> ApiResult<HttpResponse>;

    /// Authorized multipart POST of a single file to an API route.
    async fn post_file(&self, route: &str, file: FileUpload) -> ApiResult<HttpResponse>;
}

/// Extract the `id` field every WordPress create endpoint returns.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Created {
    pub id: u64,
}

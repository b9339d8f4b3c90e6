//! reqwest implementation of [`HttpTransport`].

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use super::{FileUpload, HttpResponse, HttpTransport};
use crate::config::Config;
use crate::error::{ApiError, ApiResult, ConfigError, ConfigResult};

const USER_AGENT: &str = concat!("wp-bulk-import/", env!("CARGO_PKG_VERSION"));

/// WordPress REST client bound to one site and one set of credentials.
#[derive(Clone)]
pub struct WpClient {
    http: Client,
    base_url: String,
    authorization: String,
}

impl std::fmt::Debug for WpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WpClient {
    /// Build a client from the run configuration.
    pub fn new(config: &Config) -> ConfigResult<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            authorization: config.authorization(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, &self.authorization)
    }

    async fn send(request: RequestBuilder) -> ApiResult<HttpResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

impl HttpTransport for WpClient {
    async fn download(&self, url: &str) -> ApiResult<HttpResponse> {
        Self::send(self.http.get(url)).await
    }

    async fn get(&self, route: &str) -> ApiResult<HttpResponse> {
        Self::send(self.authorized(self.http.get(self.url(route)))).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> ApiResult<HttpResponse> {
        Self::send(self.authorized(self.http.post(self.url(route)).json(body))).await
    }

    async fn post_file(&self, route: &str, file: FileUpload) -> ApiResult<HttpResponse> {
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(file.content_type)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let form = Form::new().part("file", part);

        Self::send(self.authorized(self.http.post(self.url(route)).multipart(form))).await
    }
}

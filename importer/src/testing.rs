//! In-memory WordPress used by unit tests.
//!
//! Behaves like the real REST API for the routes the importer uses: paged
//! term listings, term creation with `term_exists` on name collisions, media
//! upload and post creation. Responses for a route can be overridden to
//! simulate failures, and every request is recorded.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{FileUpload, HttpResponse, HttpTransport};
use crate::error::{ApiError, ApiResult};
use crate::models::TaxonomyKind;

/// Scripted reply for a route override.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    TransportError(String),
}

impl Reply {
    pub fn status(status: u16, body: Value) -> Self {
        Reply::Respond(HttpResponse::new(status, body.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct StoredTerm {
    pub id: u64,
    pub name: String,
    /// Hidden terms are not listed but still collide on creation.
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Default)]
struct State {
    terms: HashMap<&'static str, Vec<StoredTerm>>,
    images: HashMap<String, HttpResponse>,
    overrides: HashMap<String, VecDeque<Reply>>,
    next_term_id: u64,
    next_media_id: u64,
    next_post_id: u64,
    uploads: Vec<UploadedFile>,
    posts: Vec<Value>,
    calls: Vec<String>,
}

/// Fake WordPress site.
pub struct FakeWordPress {
    state: RefCell<State>,
}

impl Default for FakeWordPress {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWordPress {
    /// Terms are numbered from 1, media from 100, posts from 500.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                next_term_id: 1,
                next_media_id: 100,
                next_post_id: 500,
                ..Default::default()
            }),
        }
    }

    /// Seed a listed term with a fixed id.
    pub fn with_term(self, kind: TaxonomyKind, id: u64, name: &str) -> Self {
        self.insert_term(kind, id, name, false);
        self
    }

    /// Seed a term that collides on creation but never shows up in listings.
    pub fn with_hidden_term(self, kind: TaxonomyKind, id: u64, name: &str) -> Self {
        self.insert_term(kind, id, name, true);
        self
    }

    /// Serve `bytes` with `status` for an image URL. Unknown URLs are 404.
    pub fn with_image(self, url: &str, status: u16, bytes: &[u8]) -> Self {
        self.state
            .borrow_mut()
            .images
            .insert(url.to_string(), HttpResponse::new(status, bytes.to_vec()));
        self
    }

    /// Answer the next request to `key` with `reply` instead of the default.
    ///
    /// `key` is `"<METHOD> <route>"`, the route without its query string,
    /// e.g. `"POST tags"` or `"GET categories"`, or `"DOWNLOAD <url>"`.
    pub fn with_override(self, key: &str, reply: Reply) -> Self {
        self.state
            .borrow_mut()
            .overrides
            .entry(key.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Every request made so far, as `"<METHOD> <route-with-query>"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Number of recorded requests starting with `prefix`.
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn posts(&self) -> Vec<Value> {
        self.state.borrow().posts.clone()
    }

    pub fn uploads(&self) -> Vec<UploadedFile> {
        self.state.borrow().uploads.clone()
    }

    pub fn terms(&self, kind: TaxonomyKind) -> Vec<StoredTerm> {
        self.state
            .borrow()
            .terms
            .get(kind.route())
            .cloned()
            .unwrap_or_default()
    }

    fn insert_term(&self, kind: TaxonomyKind, id: u64, name: &str, hidden: bool) {
        let mut state = self.state.borrow_mut();
        state.next_term_id = state.next_term_id.max(id + 1);
        state.terms.entry(kind.route()).or_default().push(StoredTerm {
            id,
            name: name.to_string(),
            hidden,
        });
    }

    fn record(&self, method: &str, target: &str) -> Option<Reply> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("{} {}", method, target));
        let path = target.split('?').next().unwrap_or(target);
        let key = format!("{} {}", method, path);
        state.overrides.get_mut(&key).and_then(VecDeque::pop_front)
    }

    fn route_kind(route: &str) -> Option<&'static str> {
        match route {
            "tags" => Some("tags"),
            "categories" => Some("categories"),
            _ => None,
        }
    }

    fn list_terms(&self, route: &str, query: &str) -> HttpResponse {
        let mut per_page = 10;
        let mut page = 1;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("per_page", v)) => per_page = v.parse().unwrap_or(10),
                Some(("page", v)) => page = v.parse().unwrap_or(1),
                _ => {}
            }
        }

        let state = self.state.borrow();
        let visible: Vec<&StoredTerm> = state
            .terms
            .get(route)
            .map(|terms| terms.iter().filter(|t| !t.hidden).collect())
            .unwrap_or_default();

        let start = (page - 1) * per_page;
        if page > 1 && start >= visible.len() {
            return HttpResponse::new(
                400,
                json!({ "code": "rest_post_invalid_page_number" }).to_string(),
            );
        }

        let items: Vec<Value> = visible
            .iter()
            .skip(start)
            .take(per_page)
            .map(|t| json!({ "id": t.id, "name": t.name, "taxonomy": route }))
            .collect();
        HttpResponse::new(200, Value::Array(items).to_string())
    }

    fn create_term(&self, route: &'static str, body: &Value) -> HttpResponse {
        let Some(name) = body.get("name").and_then(Value::as_str) else {
            return HttpResponse::new(400, json!({ "code": "rest_missing_callback_param" }).to_string());
        };

        let mut state = self.state.borrow_mut();
        let existing = state
            .terms
            .get(route)
            .and_then(|terms| terms.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
            .map(|t| t.id);

        if let Some(term_id) = existing {
            return HttpResponse::new(
                400,
                json!({
                    "code": "term_exists",
                    "message": "A term with the name provided already exists.",
                    "data": { "status": 400, "term_id": term_id }
                })
                .to_string(),
            );
        }

        let id = state.next_term_id;
        state.next_term_id += 1;
        state.terms.entry(route).or_default().push(StoredTerm {
            id,
            name: name.to_string(),
            hidden: false,
        });
        HttpResponse::new(201, json!({ "id": id, "name": name }).to_string())
    }
}

fn apply(reply: Reply) -> ApiResult<HttpResponse> {
    match reply {
        Reply::Respond(response) => Ok(response),
        Reply::TransportError(message) => Err(ApiError::Transport(message)),
    }
}

impl HttpTransport for FakeWordPress {
    async fn download(&self, url: &str) -> ApiResult<HttpResponse> {
        if let Some(reply) = self.record("DOWNLOAD", url) {
            return apply(reply);
        }
        Ok(self
            .state
            .borrow()
            .images
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "Not Found")))
    }

    async fn get(&self, route: &str) -> ApiResult<HttpResponse> {
        if let Some(reply) = self.record("GET", route) {
            return apply(reply);
        }
        let (path, query) = route.split_once('?').unwrap_or((route, ""));
        match Self::route_kind(path) {
            Some(kind) => Ok(self.list_terms(kind, query)),
            None => Ok(HttpResponse::new(404, json!({ "code": "rest_no_route" }).to_string())),
        }
    }

    async fn post_json<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> ApiResult<HttpResponse> {
        if let Some(reply) = self.record("POST", route) {
            return apply(reply);
        }
        let body = serde_json::to_value(body).map_err(|e| ApiError::Transport(e.to_string()))?;

        if let Some(kind) = Self::route_kind(route) {
            return Ok(self.create_term(kind, &body));
        }
        if route == "posts" {
            let mut state = self.state.borrow_mut();
            let id = state.next_post_id;
            state.next_post_id += 1;
            state.posts.push(body);
            return Ok(HttpResponse::new(201, json!({ "id": id }).to_string()));
        }
        Ok(HttpResponse::new(404, json!({ "code": "rest_no_route" }).to_string()))
    }

    async fn post_file(&self, route: &str, file: FileUpload) -> ApiResult<HttpResponse> {
        if let Some(reply) = self.record("UPLOAD", route) {
            return apply(reply);
        }
        if route != "media" {
            return Ok(HttpResponse::new(404, json!({ "code": "rest_no_route" }).to_string()));
        }
        let mut state = self.state.borrow_mut();
        let id = state.next_media_id;
        state.next_media_id += 1;
        state.uploads.push(UploadedFile {
            filename: file.filename,
            content_type: file.content_type.to_string(),
            size: file.bytes.len(),
        });
        Ok(HttpResponse::new(201, json!({ "id": id }).to_string()))
    }
}

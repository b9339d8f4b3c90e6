//! Taxonomy term resolution.
//!
//! A term name is looked up case-insensitively in the remote list of its
//! taxonomy and created when absent. A creation that races with another
//! writer comes back as `400 term_exists` carrying the existing id, which is
//! used as if the lookup had found it.

use serde::Deserialize;
use serde_json::json;

use crate::api::{Created, HttpResponse, HttpTransport};
use crate::cache::TermCache;
use crate::error::{ApiError, ApiResult};
use crate::models::{TaxonomyKind, TermId};

/// Terms requested per listing page (the REST API maximum).
pub const PAGE_SIZE: usize = 100;

/// Error code WordPress returns when a term name is taken.
const TERM_EXISTS: &str = "term_exists";

/// A term as listed by the REST API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteTerm {
    pub id: TermId,
    pub name: String,
}

/// How a term id was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermOrigin {
    /// Found in the remote listing.
    Existing,
    /// Created by this call.
    Created,
    /// Creation reported `term_exists`; id taken from the error payload.
    AlreadyExists,
    /// Answered by the in-process cache.
    Cached,
}

/// Outcome of resolving one term name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTerm {
    pub id: TermId,
    pub origin: TermOrigin,
}

#[derive(Debug, Deserialize)]
struct TermErrorBody {
    code: String,
    #[serde(default)]
    data: Option<TermErrorData>,
}

#[derive(Debug, Deserialize)]
struct TermErrorData {
    #[serde(default)]
    term_id: Option<TermId>,
}

/// Scan the remote listing of `kind` for `name`, page by page.
///
/// Stops at the first match or at the first page shorter than
/// [`PAGE_SIZE`]. A rejected first page is an error; a rejected later page
/// (WordPress answers 400 past the last page) ends the scan.
pub async fn find_term<T: HttpTransport>(
    api: &T,
    kind: TaxonomyKind,
    name: &str,
) -> ApiResult<Option<RemoteTerm>> {
    let wanted = name.to_lowercase();
    let mut page = 1;

    loop {
        let route = format!("{}?per_page={}&page={}", kind.route(), PAGE_SIZE, page);
        let response = api.get(&route).await?;

        if response.status != 200 {
            if page == 1 {
                return Err(response.into_rejection());
            }
            return Ok(None);
        }

        let terms: Vec<RemoteTerm> = response.json()?;
        if let Some(term) = terms.iter().find(|t| t.name.to_lowercase() == wanted) {
            return Ok(Some(term.clone()));
        }
        if terms.len() < PAGE_SIZE {
            return Ok(None);
        }
        page += 1;
    }
}

/// Create a term, recovering the id when it already exists.
pub async fn create_term<T: HttpTransport>(
    api: &T,
    kind: TaxonomyKind,
    name: &str,
) -> ApiResult<ResolvedTerm> {
    let response = api.post_json(kind.route(), &json!({ "name": name })).await?;

    match response.status {
        201 => {
            let created: Created = response.json()?;
            Ok(ResolvedTerm {
                id: created.id,
                origin: TermOrigin::Created,
            })
        }
        400 => match existing_term_id(&response) {
            Some(id) => Ok(ResolvedTerm {
                id,
                origin: TermOrigin::AlreadyExists,
            }),
            None => Err(response.into_rejection()),
        },
        _ => Err(response.into_rejection()),
    }
}

/// `data.term_id` of a `term_exists` error body.
fn existing_term_id(response: &HttpResponse) -> Option<TermId> {
    let body: TermErrorBody = serde_json::from_slice(&response.body).ok()?;
    if body.code != TERM_EXISTS {
        return None;
    }
    body.data?.term_id
}

/// Find or create a term by name.
///
/// A listing that fails with a status falls through to creation; a
/// transport failure is returned as is.
pub async fn get_or_create_term<T: HttpTransport>(
    api: &T,
    kind: TaxonomyKind,
    name: &str,
) -> ApiResult<ResolvedTerm> {
    match find_term(api, kind, name).await {
        Ok(Some(term)) => {
            return Ok(ResolvedTerm {
                id: term.id,
                origin: TermOrigin::Existing,
            })
        }
        Ok(None) | Err(ApiError::Rejected { .. }) | Err(ApiError::InvalidResponse(_)) => {}
        Err(e @ ApiError::Transport(_)) => return Err(e),
    }

    create_term(api, kind, name).await
}

/// Term resolution for a whole run, optionally backed by a [`TermCache`].
pub struct TermResolver<'a, T> {
    api: &'a T,
    cache: Option<TermCache>,
}

impl<'a, T: HttpTransport> TermResolver<'a, T> {
    /// Resolver that asks the remote every time.
    pub fn new(api: &'a T) -> Self {
        Self { api, cache: None }
    }

    /// Resolver that remembers ids for the rest of the run.
    pub fn cached(api: &'a T) -> Self {
        Self {
            api,
            cache: Some(TermCache::new()),
        }
    }

    pub async fn resolve(&mut self, kind: TaxonomyKind, name: &str) -> ApiResult<ResolvedTerm> {
        if let Some(id) = self.cache.as_mut().and_then(|c| c.get(kind, name)) {
            return Ok(ResolvedTerm {
                id,
                origin: TermOrigin::Cached,
            });
        }

        let resolved = get_or_create_term(self.api, kind, name).await?;
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(kind, name, resolved.id);
        }
        Ok(resolved)
    }

    /// Cache hits so far, `None` when caching is off.
    pub fn cache_hits(&self) -> Option<usize> {
        self.cache.as_ref().map(TermCache::hits)
    }
}

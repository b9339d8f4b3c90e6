//! In-process term cache.
//!
//! Remembers which id a term name resolved to during this run so repeated
//! names skip the remote listing. Opt-in; nothing is written to disk.
//! Resolving through the cache yields the same id the remote lookup would.

use std::collections::HashMap;

use crate::models::{TaxonomyKind, TermId};

/// Term ids keyed by taxonomy and lowercased name.
#[derive(Debug, Default)]
pub struct TermCache {
    entries: HashMap<(TaxonomyKind, String), TermId>,
    hits: usize,
}

impl TermCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(kind: TaxonomyKind, name: &str) -> (TaxonomyKind, String) {
        (kind, name.to_lowercase())
    }

    /// Look up a term, counting hits.
    pub fn get(&mut self, kind: TaxonomyKind, name: &str) -> Option<TermId> {
        let id = self.entries.get(&Self::key(kind, name)).copied();
        if id.is_some() {
            self.hits += 1;
        }
        id
    }

    /// Remember the id a name resolved to.
    pub fn insert(&mut self, kind: TaxonomyKind, name: &str, id: TermId) {
        self.entries.insert(Self::key(kind, name), id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache so far.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

//! Per-file scope-tree cache.
//!
//! An explicit cache object owned by the project workspace, with
//! invalidation hooks for file edit/close. The engine is single-threaded
//! by contract, so entries live in a plain map owned by the calling thread.

use crate::element::ScopeTree;
use lunar_foundation::FileId;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Counters exposed for host diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub invalidations: u64,
    pub entries: usize,
}

/// Cache of parsed scope trees keyed by file identity.
#[derive(Default)]
pub struct TreeCache {
    entries: HashMap<FileId, ScopeTree>,
    hits: u64,
    misses: u64,
    inserts: u64,
    invalidations: u64,
}

impl TreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, file: &FileId) -> bool {
        self.entries.contains_key(file)
    }

    pub fn get(&mut self, file: &FileId) -> Option<&ScopeTree> {
        if self.entries.contains_key(file) {
            self.hits += 1;
            trace!("Tree cache hit for: {file}");
        } else {
            self.misses += 1;
            trace!("Tree cache miss for: {file}");
        }
        self.entries.get(file)
    }

    pub fn get_mut(&mut self, file: &FileId) -> Option<&mut ScopeTree> {
        self.entries.get_mut(file)
    }

    pub fn insert(&mut self, tree: ScopeTree) {
        self.inserts += 1;
        trace!("Caching tree for: {}", tree.file());
        self.entries.insert(tree.file().clone(), tree);
    }

    /// Drop the entry for `file`, if present. Hosts call this on file edit;
    /// the next request re-parses through the provider.
    pub fn invalidate(&mut self, file: &FileId) -> Option<ScopeTree> {
        let removed = self.entries.remove(file);
        if removed.is_some() {
            self.invalidations += 1;
            debug!("Invalidated cached tree for: {file}");
        }
        removed
    }

    pub fn invalidate_all(&mut self) {
        self.invalidations += self.entries.len() as u64;
        self.entries.clear();
        debug!("Tree cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            inserts: self.inserts,
            invalidations: self.invalidations,
            entries: self.entries.len(),
        }
    }
}

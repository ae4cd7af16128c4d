//! Project-level context: file registry, provider, and tree cache.

use crate::cache::{CacheStats, TreeCache};
use crate::element::ScopeTree;
use crate::provider::TreeProvider;
use lunar_foundation::{FileId, RefactorError, RefactorResult};
use tracing::debug;

/// Owns everything the engine needs to reach project files: the enumerated
/// file set, the host's tree provider, and the per-file tree cache.
///
/// Single-threaded by contract; every accessor takes `&mut self`, which also
/// rules out reentrant engine invocations at compile time.
pub struct ProjectWorkspace {
    provider: Box<dyn TreeProvider>,
    files: Vec<FileId>,
    cache: TreeCache,
}

impl ProjectWorkspace {
    pub fn new(provider: Box<dyn TreeProvider>) -> Self {
        Self {
            provider,
            files: Vec::new(),
            cache: TreeCache::new(),
        }
    }

    /// Register a project file for cross-file propagation.
    pub fn register_file(&mut self, file: impl Into<FileId>) {
        let file = file.into();
        if !self.files.contains(&file) {
            debug!("Registered project file: {file}");
            self.files.push(file);
        }
    }

    /// Register a host-parsed tree directly, bypassing the provider.
    pub fn insert_tree(&mut self, tree: ScopeTree) {
        self.register_file(tree.file().clone());
        self.cache.insert(tree);
    }

    /// Every registered file, in registration order.
    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    /// Registered files that participate in Lua cross-file propagation.
    pub fn lua_files(&self) -> Vec<FileId> {
        self.files.iter().filter(|f| f.is_lua()).cloned().collect()
    }

    pub fn is_registered(&self, file: &FileId) -> bool {
        self.files.contains(file)
    }

    fn ensure_loaded(&mut self, file: &FileId) -> RefactorResult<()> {
        if !self.is_registered(file) {
            return Err(RefactorError::file_not_loaded(file.as_str()));
        }
        if self.cache.get(file).is_none() {
            debug!("Parsing tree for: {file}");
            let tree = self.provider.parse(file)?;
            self.cache.insert(tree);
        }
        Ok(())
    }

    /// The scope tree for `file`, parsing through the provider on a cache
    /// miss.
    pub fn tree(&mut self, file: &FileId) -> RefactorResult<&ScopeTree> {
        self.ensure_loaded(file)?;
        Ok(self.cache.get_mut(file).expect("loaded above"))
    }

    /// Mutable access for components that rename occurrences in place.
    pub fn tree_mut(&mut self, file: &FileId) -> RefactorResult<&mut ScopeTree> {
        self.ensure_loaded(file)?;
        Ok(self.cache.get_mut(file).expect("loaded above"))
    }

    /// Invalidation hook: the host edited the file's text outside the
    /// engine, so the cached tree is stale.
    pub fn on_file_edited(&mut self, file: &FileId) {
        self.cache.invalidate(file);
    }

    /// Invalidation hook: the file left the project.
    pub fn on_file_closed(&mut self, file: &FileId) {
        self.cache.invalidate(file);
        self.files.retain(|f| f != file);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

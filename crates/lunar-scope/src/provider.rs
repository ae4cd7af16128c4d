//! The parsed-tree provider boundary.

use crate::element::ScopeTree;
use lunar_foundation::{FileId, RefactorError, RefactorResult};
use std::collections::HashMap;

/// Host-side collaborator that turns a file into a scope tree.
///
/// The engine only ever calls this through the workspace cache; it never
/// constructs trees itself and never reads file text.
pub trait TreeProvider {
    fn parse(&self, file: &FileId) -> RefactorResult<ScopeTree>;
}

/// Provider backed by prebuilt trees.
///
/// Hosts that parse eagerly (and tests) register finished trees; a parse
/// request for an unknown file fails the same way a real parse error would.
#[derive(Default)]
pub struct StaticTreeProvider {
    trees: HashMap<FileId, ScopeTree>,
}

impl StaticTreeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tree: ScopeTree) {
        self.trees.insert(tree.file().clone(), tree);
    }

    pub fn with_tree(mut self, tree: ScopeTree) -> Self {
        self.insert(tree);
        self
    }
}

impl TreeProvider for StaticTreeProvider {
    fn parse(&self, file: &FileId) -> RefactorResult<ScopeTree> {
        self.trees
            .get(file)
            .cloned()
            .ok_or_else(|| RefactorError::parse(format!("no tree available for {file}")))
    }
}

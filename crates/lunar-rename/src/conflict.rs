//! Conflict Resolver: detect name collisions before anything mutates.
//!
//! The scan covers the target's own scope for locals and every project
//! file's module scope for globals. Resolution loops through the host's
//! `ConflictUi` until the state is terminal: resolved (no conflicts),
//! proceed-with-conflicts, or canceled. No occurrence is renamed while the
//! state is unresolved.

use crate::locator::{DeclarationSite, ResolvedDeclaration};
use lunar_foundation::{FileId, RefactorResult, SourceSpan, SymbolKind, Visibility};
use lunar_scope::ProjectWorkspace;
use serde::Serialize;
use tracing::debug;

/// An existing declaration that already uses the proposed name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// The colliding name
    pub name: String,
    /// Kind of the existing declaration
    pub kind: SymbolKind,
    /// File containing the existing declaration
    pub file: FileId,
    /// Span of the existing declaration
    pub span: SourceSpan,
    /// Host-facing description
    pub description: String,
}

/// The conflicts found for one proposed name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSet {
    pub entries: Vec<Conflict>,
}

impl ConflictSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, name: &str, kind: SymbolKind, file: &FileId, span: SourceSpan) {
        self.entries.push(Conflict {
            name: name.to_string(),
            kind,
            file: file.clone(),
            span,
            description: format!("{} `{}` already declared in {}", kind, name, file),
        });
    }
}

/// The host's answer to a non-empty conflict set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Rename anyway, accepting the collision.
    ProceedAnyway,
    /// Retry conflict detection with a different name.
    ReplaceName(String),
    /// Abort with zero mutations.
    Cancel,
}

/// Host boundary for interactive conflict resolution.
pub trait ConflictUi {
    fn resolve_conflicts(
        &mut self,
        old_name: &str,
        kind_label: &str,
        conflicts: &ConflictSet,
    ) -> ConflictDecision;
}

/// Non-interactive policy that aborts on any conflict. The safe default
/// for hosts without a prompt surface.
pub struct RejectConflicts;

impl ConflictUi for RejectConflicts {
    fn resolve_conflicts(&mut self, _: &str, _: &str, _: &ConflictSet) -> ConflictDecision {
        ConflictDecision::Cancel
    }
}

/// Non-interactive policy that renames despite conflicts.
pub struct AcceptConflicts;

impl ConflictUi for AcceptConflicts {
    fn resolve_conflicts(&mut self, _: &str, _: &str, _: &ConflictSet) -> ConflictDecision {
        ConflictDecision::ProceedAnyway
    }
}

/// Scan the relevant scopes for declarations already named `new_name`.
///
/// A project file that cannot be parsed during a global scan is skipped
/// here; propagation records it as a failed outcome later.
pub fn find_conflicts(
    workspace: &mut ProjectWorkspace,
    target: &ResolvedDeclaration,
    new_name: &str,
) -> RefactorResult<ConflictSet> {
    let mut set = ConflictSet::default();
    let own_site = match target.site {
        DeclarationSite::Explicit(id) => Some((target.file.clone(), id)),
        DeclarationSite::Implicit => None,
    };

    match target.visibility {
        Visibility::Local => {
            let tree = workspace.tree(&target.file)?;
            for (id, occ) in tree.declarations_in(target.scope) {
                if occ.name == new_name && own_site != Some((target.file.clone(), id)) {
                    set.push(&occ.name, occ.kind, &target.file, occ.span);
                }
            }
        }
        Visibility::Global => {
            for file in workspace.lua_files() {
                let tree = match workspace.tree(&file) {
                    Ok(tree) => tree,
                    Err(err) => {
                        debug!("skipping {file} during conflict scan: {err}");
                        continue;
                    }
                };
                for (id, occ) in tree.declarations_in(tree.root()) {
                    if occ.name == new_name && own_site != Some((file.clone(), id)) {
                        set.push(&occ.name, occ.kind, &file, occ.span);
                    }
                }
            }
        }
    }

    if !set.is_empty() {
        debug!(
            new_name,
            count = set.entries.len(),
            "proposed name conflicts with existing declarations"
        );
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::resolve_occurrence;
    use lunar_scope::{ScopeTreeBuilder, StaticTreeProvider};
    use pretty_assertions::assert_eq;

    fn span() -> SourceSpan {
        SourceSpan::on_line(0, 0, 1)
    }

    fn workspace_with(trees: Vec<lunar_scope::ScopeTree>) -> ProjectWorkspace {
        let mut provider = StaticTreeProvider::new();
        let files: Vec<FileId> = trees.iter().map(|t| t.file().clone()).collect();
        for tree in trees {
            provider.insert(tree);
        }
        let mut ws = ProjectWorkspace::new(Box::new(provider));
        for file in files {
            ws.register_file(file);
        }
        ws
    }

    #[test]
    fn local_conflict_found_in_the_same_scope() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        b.begin_function("f", Visibility::Global, span());
        let decl = b.declare("x", SymbolKind::Variable, Visibility::Local, span());
        b.declare("y", SymbolKind::Variable, Visibility::Local, span());
        b.end_function();
        let tree = b.finish();

        let target = resolve_occurrence(&tree, decl).unwrap();
        let mut ws = workspace_with(vec![tree]);

        let conflicts = find_conflicts(&mut ws, &target, "y").unwrap();
        assert_eq!(conflicts.entries.len(), 1);
        assert_eq!(conflicts.entries[0].name, "y");

        let clean = find_conflicts(&mut ws, &target, "z").unwrap();
        assert!(clean.is_empty());
    }

    #[test]
    fn local_conflict_ignores_other_scopes() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        b.declare("y", SymbolKind::Variable, Visibility::Global, span());
        b.begin_function("f", Visibility::Global, span());
        let decl = b.declare("x", SymbolKind::Variable, Visibility::Local, span());
        b.end_function();
        let tree = b.finish();

        let target = resolve_occurrence(&tree, decl).unwrap();
        let mut ws = workspace_with(vec![tree]);

        // Directly-owned declarations only; the module-scope `y` is not a
        // collision for a function-local rename.
        let conflicts = find_conflicts(&mut ws, &target, "y").unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn global_conflicts_are_found_project_wide() {
        let mut a = ScopeTreeBuilder::new("a.lua");
        let decl = a.declare("x", SymbolKind::Variable, Visibility::Global, span());
        let a = a.finish();

        let mut b = ScopeTreeBuilder::new("b.lua");
        b.declare("total", SymbolKind::Variable, Visibility::Global, span());
        let b = b.finish();

        let target = resolve_occurrence(&a, decl).unwrap();
        let mut ws = workspace_with(vec![a, b]);

        let conflicts = find_conflicts(&mut ws, &target, "total").unwrap();
        assert_eq!(conflicts.entries.len(), 1);
        assert_eq!(conflicts.entries[0].file, FileId::from("b.lua"));
    }
}

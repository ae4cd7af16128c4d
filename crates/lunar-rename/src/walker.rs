//! Reference Walker: collect and rename every occurrence that resolves to
//! the target declaration.
//!
//! One non-recursive depth-first pass per tree. Each occurrence with a
//! matching spelling is re-resolved through the locator rule and renamed
//! only when it lands on the same declaration, so occurrences shadowed by
//! an intervening local declaration are left alone.

use crate::locator::{self, ResolvedDeclaration};
use lunar_foundation::{OccurrenceChange, OccurrenceId, Visibility};
use lunar_scope::ScopeTree;
use tracing::debug;

/// Occurrence ids in `tree` that would be renamed for `target`, in
/// depth-first source order. Pure: used by both the rename pass and the
/// dry-run planner.
pub fn collect_targets(tree: &ScopeTree, target: &ResolvedDeclaration) -> Vec<OccurrenceId> {
    // Local symbols are confined to their declaring scope; globals are
    // searched from the module root (which is the whole file).
    let search_root = if target.visibility == Visibility::Local {
        target.scope
    } else {
        tree.root()
    };

    tree.occurrences_below(search_root)
        .into_iter()
        .filter(|&id| locator::resolves_to(tree, id, target))
        .collect()
}

/// Rename every resolving occurrence in `tree`, returning the before/after
/// records in traversal order. The textual merge back into the host buffer
/// is driven by the returned spans.
pub fn rename_in_tree(
    tree: &mut ScopeTree,
    target: &ResolvedDeclaration,
    new_name: &str,
) -> Vec<OccurrenceChange> {
    let targets = collect_targets(tree, target);
    debug!(
        file = %tree.file(),
        name = %target.name,
        count = targets.len(),
        "renaming occurrences"
    );

    let mut changes = Vec::with_capacity(targets.len());
    for id in targets {
        let span = tree.occurrence(id).span;
        let before = tree.set_name(id, new_name);
        changes.push(OccurrenceChange {
            file: tree.file().clone(),
            occurrence: id,
            span,
            before,
            after: new_name.to_string(),
        });
    }
    changes
}

//! Cross-File Aggregator: best-effort propagation of a global rename.
//!
//! Only engaged for Global visibility. Every other registered Lua file is
//! processed independently; a file that fails to parse is recorded as a
//! failed, empty outcome and does not abort the remaining files. This is
//! deliberately non-transactional: committed sibling files stay renamed.

use crate::locator::ResolvedDeclaration;
use crate::walker;
use lunar_foundation::{AggregatedOutcome, RenameOutcome};
use lunar_scope::ProjectWorkspace;
use tracing::{debug, warn};

/// Propagate a global rename into every project file other than the
/// origin, merging per-file outcomes into `aggregate`.
pub fn propagate(
    workspace: &mut ProjectWorkspace,
    target: &ResolvedDeclaration,
    new_name: &str,
    aggregate: &mut AggregatedOutcome,
) {
    for file in workspace.lua_files() {
        if file == target.file {
            continue;
        }

        let tree = match workspace.tree_mut(&file) {
            Ok(tree) => tree,
            Err(err) => {
                warn!("cross-file rename skipped {file}: {err}");
                aggregate.merge(file.clone(), RenameOutcome::failed(err.to_string()));
                continue;
            }
        };

        let changes = walker::rename_in_tree(tree, target, new_name);
        debug!(file = %file, count = changes.len(), "propagated global rename");
        aggregate.merge(file, RenameOutcome::succeeded(changes, true));
    }
}

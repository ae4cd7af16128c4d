//! Undo Recorder: reversible record of a committed rename.
//!
//! Changes are stored as before/after pairs, so a redo direction is
//! derivable from the same record; only the undo direction is exposed,
//! since the host's undo stack is linear with no redo interface.

use lunar_foundation::{FileId, OccurrenceChange, RefactorResult};
use lunar_scope::ProjectWorkspace;
use serde::Serialize;
use tracing::{debug, warn};

/// Everything needed to reverse one rename operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoRecord {
    /// Name before the operation
    pub old_name: String,
    /// Name after the operation
    pub new_name: String,
    /// Every changed occurrence across every touched file
    pub changes: Vec<OccurrenceChange>,
    /// Trees that must be marked dirty when the record is applied
    pub touched_files: Vec<FileId>,
    /// When the operation ran
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UndoRecord {
    pub fn new(
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        changes: Vec<OccurrenceChange>,
        touched_files: Vec<FileId>,
    ) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            changes,
            touched_files,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Replay every change back to its `before` name and mark the touched
    /// trees dirty so the host re-synchronizes its view.
    ///
    /// An occurrence whose current name no longer matches the recorded
    /// `after` has been edited since the rename; it is skipped with a
    /// warning rather than overwritten.
    pub fn apply(&self, workspace: &mut ProjectWorkspace) -> RefactorResult<()> {
        debug!(
            old_name = %self.old_name,
            new_name = %self.new_name,
            count = self.changes.len(),
            "applying undo record"
        );

        for change in &self.changes {
            let tree = workspace.tree_mut(&change.file)?;
            let current = &tree.occurrence(change.occurrence).name;
            if current != &change.after {
                warn!(
                    file = %change.file,
                    expected = %change.after,
                    found = %current,
                    "occurrence changed since rename; leaving as-is"
                );
                continue;
            }
            tree.set_name(change.occurrence, change.before.clone());
        }

        for file in &self.touched_files {
            if let Ok(tree) = workspace.tree_mut(file) {
                tree.mark_dirty();
            }
        }
        Ok(())
    }
}

//! The host-facing rename entry points.
//!
//! Control flow per operation: dispatch a strategy for the symbol kind,
//! resolve the canonical declaration, loop conflict detection through the
//! host UI, rename the origin file in place, propagate across the project
//! when the declaration is global, and capture the undo record.

use crate::aggregate;
use crate::conflict::{self, ConflictDecision, ConflictSet, ConflictUi};
use crate::locator::{self, ResolvedDeclaration};
use crate::strategy;
use crate::undo::UndoRecord;
use crate::walker;
use lunar_foundation::{
    model, AggregatedOutcome, FileId, OccurrenceId, RefactorError, RefactorResult, RenameOutcome,
    TextEdit, Visibility,
};
use lunar_scope::ProjectWorkspace;
use tracing::{debug, info};

/// A committed rename: the merged outcome plus its undo record.
#[derive(Debug)]
pub struct RenameOperation {
    pub outcome: AggregatedOutcome,
    pub undo: UndoRecord,
}

impl RenameOperation {
    /// Status line for the host UI.
    pub fn summary(&self) -> String {
        self.outcome.summary()
    }
}

/// Dry-run result: everything a rename would touch, with zero mutations.
#[derive(Debug)]
pub struct RenamePlan {
    pub old_name: String,
    pub new_name: String,
    pub visibility: Visibility,
    pub edits: Vec<TextEdit>,
    pub conflicts: ConflictSet,
    /// Files a committed rename would record as failed (no parseable tree)
    pub failed_files: Vec<FileId>,
}

/// The rename engine. Owns the project workspace; `&mut self` receivers
/// make reentrant invocation a compile error, matching the single-threaded
/// contract with the host.
pub struct RenameEngine {
    workspace: ProjectWorkspace,
}

impl RenameEngine {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &ProjectWorkspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut ProjectWorkspace {
        &mut self.workspace
    }

    pub fn into_workspace(self) -> ProjectWorkspace {
        self.workspace
    }

    /// Rename the symbol at an occurrence the host UI has already resolved.
    pub fn rename_occurrence(
        &mut self,
        ui: &mut dyn ConflictUi,
        file: &FileId,
        occurrence: OccurrenceId,
        new_name: &str,
    ) -> RefactorResult<RenameOperation> {
        let target = {
            let tree = self.workspace.tree(file)?;
            locator::resolve_occurrence(tree, occurrence)?
        };
        self.rename_resolved(ui, target, new_name)
    }

    /// Convenience overload: resolve the occurrence by name first. Fails
    /// with `DeclarationNotFound` when the file has no occurrence of the
    /// name at all.
    pub fn rename_symbol(
        &mut self,
        ui: &mut dyn ConflictUi,
        file: &FileId,
        name: &str,
        new_name: &str,
    ) -> RefactorResult<RenameOperation> {
        let occurrence = {
            let tree = self.workspace.tree(file)?;
            tree.find_occurrence_by_name(name)
                .ok_or_else(|| RefactorError::declaration_not_found(name))?
        };
        self.rename_occurrence(ui, file, occurrence, new_name)
    }

    /// Compute what a rename would change without mutating anything.
    pub fn plan(
        &mut self,
        file: &FileId,
        occurrence: OccurrenceId,
        new_name: &str,
    ) -> RefactorResult<RenamePlan> {
        let target = {
            let tree = self.workspace.tree(file)?;
            locator::resolve_occurrence(tree, occurrence)?
        };
        let selected = strategy::dispatch(target.kind)?;
        strategy::screen_names(selected, &target.name, new_name)?;

        let conflicts = conflict::find_conflicts(&mut self.workspace, &target, new_name)?;

        // Best-effort like the commit path: a propagation file without a
        // parseable tree is reported, not a reason to abort the dry run.
        let mut changes = Vec::new();
        let mut failed_files = Vec::new();
        for file in self.propagation_files(&target) {
            let tree = match self.workspace.tree(&file) {
                Ok(tree) => tree,
                Err(err) if file != target.file => {
                    debug!("dry run skipped {file}: {err}");
                    failed_files.push(file);
                    continue;
                }
                Err(err) => return Err(err),
            };
            for id in walker::collect_targets(tree, &target) {
                changes.push(lunar_foundation::OccurrenceChange {
                    file: file.clone(),
                    occurrence: id,
                    span: tree.occurrence(id).span,
                    before: target.name.clone(),
                    after: new_name.to_string(),
                });
            }
        }

        Ok(RenamePlan {
            old_name: target.name.clone(),
            new_name: new_name.to_string(),
            visibility: target.visibility,
            edits: model::to_text_edits(&changes),
            conflicts,
            failed_files,
        })
    }

    fn rename_resolved(
        &mut self,
        ui: &mut dyn ConflictUi,
        target: ResolvedDeclaration,
        new_name: &str,
    ) -> RefactorResult<RenameOperation> {
        let selected = strategy::dispatch(target.kind)?;
        debug!(
            name = %target.name,
            ?selected,
            ?target.visibility,
            implicit = target.is_implicit(),
            "rename requested"
        );

        // Conflict-resolution loop. Nothing mutates until this reaches a
        // terminal non-conflicting (or proceed-anyway) state.
        let mut final_name = new_name.to_string();
        loop {
            strategy::screen_names(selected, &target.name, &final_name)?;
            let conflicts = conflict::find_conflicts(&mut self.workspace, &target, &final_name)?;
            if conflicts.is_empty() {
                break;
            }
            match ui.resolve_conflicts(&target.name, target.kind.label(), &conflicts) {
                ConflictDecision::ProceedAnyway => break,
                ConflictDecision::ReplaceName(name) => final_name = name,
                ConflictDecision::Cancel => return Err(RefactorError::ConflictUnresolved),
            }
        }

        // Commit, origin file first.
        let global = target.visibility == Visibility::Global;
        let mut aggregate = AggregatedOutcome::new();
        {
            let tree = self.workspace.tree_mut(&target.file)?;
            let changes = walker::rename_in_tree(tree, &target, &final_name);
            aggregate.merge(target.file.clone(), RenameOutcome::succeeded(changes, global));
        }
        if global {
            aggregate::propagate(&mut self.workspace, &target, &final_name, &mut aggregate);
        }

        let undo = UndoRecord::new(
            target.name.clone(),
            final_name.clone(),
            aggregate.all_changes(),
            aggregate.touched_files.clone(),
        );

        info!(
            old_name = %target.name,
            new_name = %final_name,
            occurrences = aggregate.changed_count(),
            files = aggregate.touched_files.len(),
            "rename committed"
        );
        Ok(RenameOperation { outcome: aggregate, undo })
    }

    /// Files a rename of `target` may touch, origin first.
    fn propagation_files(&self, target: &ResolvedDeclaration) -> Vec<FileId> {
        if target.visibility == Visibility::Local {
            return vec![target.file.clone()];
        }
        let mut files = vec![target.file.clone()];
        files.extend(
            self.workspace
                .lua_files()
                .into_iter()
                .filter(|f| f != &target.file),
        );
        files
    }
}

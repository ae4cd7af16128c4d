//! Core model types shared by the scope tree and the rename engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a project file, as handed to the engine by the host.
///
/// Hosts key files by project-relative path; the engine only needs equality
/// and ordering, never filesystem access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl FileId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this file participates in cross-file propagation.
    pub fn is_lua(&self) -> bool {
        self.0.ends_with(".lua")
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// Index of a scope element inside its file's tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// Index of a symbol occurrence inside its file's tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccurrenceId(pub u32);

/// Kinds of scope-owning tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// The single top-level scope of a file.
    Module,
    /// A function body.
    Function,
}

/// Syntactic classification of a symbol occurrence.
///
/// A closed set: the strategy dispatcher matches it exhaustively, so a new
/// kind is a compile error at every dispatch site rather than a fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Variable,
    Table,
    Parameter,
    Call,
    Literal,
    Other,
}

impl SymbolKind {
    /// Human-readable label used in UI prompts and messages.
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Table => "table",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Call => "function call",
            SymbolKind::Literal => "literal",
            SymbolKind::Other => "element",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Visibility of a declaration, decided once per rename operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Declared with `local` semantics or as a parameter; confined to its
    /// declaring scope.
    Local,
    /// Declared at module scope, or implicitly by first global assignment;
    /// visible to every file of the project.
    Global,
}

/// Location of an occurrence in the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpan {
    /// Start line (0-based)
    pub start_line: u32,
    /// Start column (0-based)
    pub start_column: u32,
    /// End line (0-based)
    pub end_line: u32,
    /// End column (0-based)
    pub end_column: u32,
}

impl SourceSpan {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Single-line span helper for identifier-sized ranges.
    pub fn on_line(line: u32, start_column: u32, len: u32) -> Self {
        Self {
            start_line: line,
            start_column,
            end_line: line,
            end_column: start_column + len,
        }
    }
}

/// One renamed occurrence, recorded as a before/after pair.
///
/// Storing both names makes undo and redo derivable from the same record;
/// the host's undo stack only consumes the `before` direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceChange {
    /// File the occurrence lives in
    pub file: FileId,
    /// Arena index of the occurrence within that file's tree
    pub occurrence: OccurrenceId,
    /// Source span of the identifier, for the host's textual merge
    pub span: SourceSpan,
    /// Name before the rename
    pub before: String,
    /// Name after the rename
    pub after: String,
}

/// Result of a rename within a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    /// Whether the file was processed successfully
    pub success: bool,
    /// Status message surfaced to the host UI
    pub message: String,
    /// Every occurrence changed in this file, in traversal order
    pub changed_occurrences: Vec<OccurrenceChange>,
    /// Whether the rename propagates beyond the immediate scope
    pub rename_references: bool,
}

impl RenameOutcome {
    pub fn succeeded(
        changed_occurrences: Vec<OccurrenceChange>,
        rename_references: bool,
    ) -> Self {
        let message = format!("Renamed {} occurrence(s)", changed_occurrences.len());
        Self {
            success: true,
            message,
            changed_occurrences,
            rename_references,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            changed_occurrences: Vec::new(),
            rename_references: false,
        }
    }

    pub fn changed_count(&self) -> usize {
        self.changed_occurrences.len()
    }
}

/// Merged result of a rename across every affected project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedOutcome {
    /// Per-file outcomes, keyed by file identity
    pub outcomes: BTreeMap<FileId, RenameOutcome>,
    /// Files whose trees were mutated and must be re-synchronized
    pub touched_files: Vec<FileId>,
    /// When the operation ran
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl AggregatedOutcome {
    pub fn new() -> Self {
        Self {
            outcomes: BTreeMap::new(),
            touched_files: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Merge a per-file outcome, tracking the file as touched when it
    /// carries changes.
    pub fn merge(&mut self, file: FileId, outcome: RenameOutcome) {
        if !outcome.changed_occurrences.is_empty() && !self.touched_files.contains(&file) {
            self.touched_files.push(file.clone());
        }
        self.outcomes.insert(file, outcome);
    }

    /// Total changed occurrences across all files.
    pub fn changed_count(&self) -> usize {
        self.outcomes.values().map(RenameOutcome::changed_count).sum()
    }

    /// Files recorded as failed during propagation.
    pub fn failed_files(&self) -> Vec<&FileId> {
        self.outcomes
            .iter()
            .filter(|(_, o)| !o.success)
            .map(|(f, _)| f)
            .collect()
    }

    /// Every change across every file, in merge order.
    pub fn all_changes(&self) -> Vec<OccurrenceChange> {
        self.outcomes
            .values()
            .flat_map(|o| o.changed_occurrences.iter().cloned())
            .collect()
    }

    /// Status message surfaced to the host UI.
    pub fn summary(&self) -> String {
        let failed = self.failed_files().len();
        if failed == 0 {
            format!(
                "Renamed {} occurrence(s) across {} file(s)",
                self.changed_count(),
                self.touched_files.len()
            )
        } else {
            format!(
                "Renamed {} occurrence(s) across {} file(s); {} file(s) failed",
                self.changed_count(),
                self.touched_files.len(),
                failed
            )
        }
    }
}

impl Default for AggregatedOutcome {
    fn default() -> Self {
        Self::new()
    }
}

/// Span-based text replacement handed to the host's textual merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    /// File the edit applies to
    pub file: FileId,
    /// Identifier span to replace
    pub span: SourceSpan,
    /// Replacement text
    pub new_text: String,
}

/// Convert changes into text edits ordered bottom-up within each file, so
/// the host can apply them without span adjustment.
pub fn to_text_edits(changes: &[OccurrenceChange]) -> Vec<TextEdit> {
    let mut edits: Vec<TextEdit> = changes
        .iter()
        .map(|c| TextEdit {
            file: c.file.clone(),
            span: c.span,
            new_text: c.after.clone(),
        })
        .collect();
    edits.sort_by(|a, b| {
        a.file.cmp(&b.file).then(
            (b.span.start_line, b.span.start_column)
                .cmp(&(a.span.start_line, a.span.start_column)),
        )
    });
    edits
}

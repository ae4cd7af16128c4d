//! Rename-refactoring engine for Lua sources
//!
//! Given one occurrence of a symbol, the engine resolves the declaring
//! scope, enumerates every occurrence referring to the same declaration
//! (not merely the same spelling), detects name conflicts before mutating
//! anything, propagates global renames across every project file, and
//! records a reversible undo record.
//!
//! Parsing, text merging, and interactive prompts stay on the host side of
//! the [`lunar_scope::TreeProvider`] and [`ConflictUi`] boundaries.

pub mod aggregate;
pub mod conflict;
pub mod engine;
pub mod locator;
pub mod strategy;
pub mod undo;
pub mod walker;

pub use conflict::{AcceptConflicts, Conflict, ConflictDecision, ConflictSet, ConflictUi, RejectConflicts};
pub use engine::{RenameEngine, RenameOperation, RenamePlan};
pub use locator::{DeclarationSite, ResolvedDeclaration};
pub use strategy::RenameStrategy;
pub use undo::UndoRecord;

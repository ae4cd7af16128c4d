//! Strategy Dispatcher: map a symbol kind to its rename algorithm.

use lunar_foundation::{reserved, validation, RefactorError, RefactorResult, SymbolKind};

/// The closed set of rename algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStrategy {
    /// Declaration plus every call site.
    Function,
    /// Variables, tables, and parameters.
    Variable,
}

/// Select the strategy for a symbol kind.
///
/// Exhaustive by construction: kinds without rename semantics yield
/// `InvalidStrategy` rather than a nullable lookup.
pub fn dispatch(kind: SymbolKind) -> RefactorResult<RenameStrategy> {
    match kind {
        SymbolKind::Function | SymbolKind::Call => Ok(RenameStrategy::Function),
        SymbolKind::Variable | SymbolKind::Table | SymbolKind::Parameter => {
            Ok(RenameStrategy::Variable)
        }
        SymbolKind::Literal | SymbolKind::Other => {
            Err(RefactorError::invalid_strategy(kind.label()))
        }
    }
}

/// Screen the old and new names before any mutation.
///
/// Both directions are checked against the fixed built-in table for the
/// Function and Variable strategies; the new name must additionally be
/// identifier-shaped.
pub fn screen_names(strategy: RenameStrategy, old_name: &str, new_name: &str) -> RefactorResult<()> {
    validation::validate_new_name(new_name)?;
    match strategy {
        RenameStrategy::Function | RenameStrategy::Variable => {
            if reserved::is_reserved(old_name) {
                return Err(RefactorError::symbol_reserved(old_name));
            }
            if reserved::is_reserved(new_name) {
                return Err(RefactorError::symbol_reserved(new_name));
            }
        }
    }
    Ok(())
}

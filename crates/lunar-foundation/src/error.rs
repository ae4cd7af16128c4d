//! Error handling for the Lunar rename engine

use thiserror::Error;

/// Errors produced while preparing or executing a rename operation.
///
/// With the exception of `FileProcessingFailure`, every variant aborts the
/// operation before any occurrence is mutated; callers can rely on zero
/// partial state when one of these surfaces. `FileProcessingFailure` is
/// recorded per file inside an aggregated outcome during cross-file
/// propagation and never rolls back sibling files.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RefactorError {
    #[error("Element has no rename semantics: {element}")]
    InvalidElement { element: String },

    #[error("No enclosing scope for function rename: {name}")]
    InvalidParent { name: String },

    #[error("No rename strategy for symbol kind: {kind}")]
    InvalidStrategy { kind: String },

    #[error("Declaration not found: {name}")]
    DeclarationNotFound { name: String },

    #[error("Name collides with a built-in identifier: {name}")]
    SymbolReserved { name: String },

    #[error("Not a valid identifier: {name}")]
    InvalidIdentifier { name: String },

    #[error("Rename canceled during conflict resolution")]
    ConflictUnresolved,

    #[error("Failed to process project file: {file}")]
    FileProcessingFailure { file: String },

    #[error("File is not loaded in the workspace: {file}")]
    FileNotLoaded { file: String },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl RefactorError {
    pub fn invalid_element(element: impl Into<String>) -> Self {
        Self::InvalidElement {
            element: element.into(),
        }
    }

    pub fn invalid_parent(name: impl Into<String>) -> Self {
        Self::InvalidParent { name: name.into() }
    }

    pub fn invalid_strategy(kind: impl Into<String>) -> Self {
        Self::InvalidStrategy { kind: kind.into() }
    }

    pub fn declaration_not_found(name: impl Into<String>) -> Self {
        Self::DeclarationNotFound { name: name.into() }
    }

    pub fn symbol_reserved(name: impl Into<String>) -> Self {
        Self::SymbolReserved { name: name.into() }
    }

    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    pub fn file_processing_failure(file: impl Into<String>) -> Self {
        Self::FileProcessingFailure { file: file.into() }
    }

    pub fn file_not_loaded(file: impl Into<String>) -> Self {
        Self::FileNotLoaded { file: file.into() }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// True when the error is guaranteed to surface before any mutation.
    pub fn is_pre_mutation(&self) -> bool {
        !matches!(self, Self::FileProcessingFailure { .. })
    }
}

/// Result type alias for convenience
pub type RefactorResult<T> = Result<T, RefactorError>;

//! Candidate-name validation.

use crate::error::{RefactorError, RefactorResult};
use crate::reserved;
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Whether `name` has the shape of a Lua identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(name)
}

/// Validate a proposed new name: identifier-shaped and not a keyword.
///
/// Reserved non-keyword built-ins are screened separately by the strategy
/// dispatcher, since only Function and Variable renames consult the table.
pub fn validate_new_name(name: &str) -> RefactorResult<()> {
    if !is_identifier(name) {
        return Err(RefactorError::invalid_identifier(name));
    }
    if reserved::is_keyword(name) {
        return Err(RefactorError::symbol_reserved(name));
    }
    Ok(())
}

//! Foundation Layer - Core types, error taxonomy, and fixed language knowledge
//!
//! This crate provides the foundational building blocks for Lunar:
//! - Core data structures shared by the scope model and the rename engine
//! - The refactoring error taxonomy
//! - The fixed Lua reserved-identifier table
//! - Candidate-name validation

pub mod error;
pub mod model;
pub mod reserved;
pub mod validation;

// Re-export commonly used types for convenience
pub use error::{RefactorError, RefactorResult};
pub use model::*;

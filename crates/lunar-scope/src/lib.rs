//! Scoped element tree model for Lunar
//!
//! The engine never parses source text itself: a host-provided
//! [`TreeProvider`] turns file text into a [`ScopeTree`], and the engine
//! only reads the tree and mutates occurrence name fields. Trees are cached
//! per file in an explicit [`TreeCache`] owned by the [`ProjectWorkspace`],
//! with invalidation hooks for file edit/close.

pub mod builder;
pub mod cache;
pub mod element;
pub mod provider;
pub mod workspace;

pub use builder::ScopeTreeBuilder;
pub use cache::{CacheStats, TreeCache};
pub use element::{OccurrenceData, ScopeElementData, ScopeTree};
pub use provider::{StaticTreeProvider, TreeProvider};
pub use workspace::ProjectWorkspace;

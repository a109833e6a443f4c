//! Application layer for todolens.
//!
//! This crate owns the todo list state, the collaborator traits it is driven
//! through, and the configuration shared by every front end.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod source;
pub mod todo_cache;

// Re-exports for convenience
pub use aggregator::{CommandOutcome, LoadOutcome, LoadState, SaveOutcome, TodoAggregator, TodoCommand};
pub use config::{CommitPolicy, SavedQueryConfig, SelectionConfig, SortConfig, TodoConfig};
pub use error::{FetchTarget, PersistOperation, TodoError, TodoResult};
pub use source::{SavedQueryStore, TodoSource};
pub use todo_cache::TodoCache;

//! Domain types, normalization, ordering and search for todolens.

/// Error types.
pub mod error;
/// Identifier types.
pub mod id;
/// Raw task enrichment.
pub mod normalize;
/// Named search queries.
pub mod saved_query;
/// Token-based search index.
pub mod search_index;
/// Bulk-selection grid.
pub mod selection;
/// Ordering of tasks and named items.
pub mod sorting;
/// Status descriptors and lookup.
pub mod status;
/// Task payloads and records.
pub mod task;

pub use error::CoreError;
pub use id::TaskId;
pub use normalize::{normalize, normalize_all};
pub use saved_query::{ALL_PROJECTS_SCOPE, SavedQuery, TODO_QUERY_SCOPE, UserFilters};
pub use search_index::{SearchIndex, tokenize};
pub use selection::{MAX_GRID_CELLS, SelectionGrid};
pub use sorting::{Named, SortKey, sort_by_name, sort_tasks};
pub use status::{StatusDescriptor, StatusMap, StatusRegistry};
pub use task::{Comment, RawTask, StatusChange, TaskRecord};

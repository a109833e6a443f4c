//! Error types surfaced by the todo aggregator.

use std::fmt;

use thiserror::Error;

/// Collaborator call that failed to load data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    /// Tasks assigned to the current user.
    AssignedTasks,
    /// Recently completed tasks.
    CompletedTasks,
    /// Saved search filters of the current user.
    UserFilters,
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AssignedTasks => "assigned tasks",
            Self::CompletedTasks => "completed tasks",
            Self::UserFilters => "user filters",
        })
    }
}

/// Saved-query change sent to the persistence collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOperation {
    /// Creating a named query.
    Save,
    /// Deleting a named query.
    Remove,
}

impl fmt::Display for PersistOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Save => "save",
            Self::Remove => "remove",
        })
    }
}

/// Errors reported by [`TodoAggregator`](crate::TodoAggregator) operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// A data-fetch collaborator failed; previously loaded data is kept.
    #[error("Failed to fetch {target}: {source:#}")]
    FetchFailure {
        /// Which fetch failed.
        target: FetchTarget,
        /// Collaborator error.
        source: anyhow::Error,
    },

    /// The saved-query collaborator rejected a change.
    #[error("Failed to {operation} saved query '{name}': {source:#}")]
    PersistenceFailure {
        /// Attempted change.
        operation: PersistOperation,
        /// Name of the query involved.
        name: String,
        /// Collaborator error.
        source: anyhow::Error,
    },
}

/// Result alias for aggregator operations.
pub type TodoResult<T> = Result<T, TodoError>;

//! Async collaborator capabilities consumed by the aggregator.

use anyhow::Error;
use todolens_core::{RawTask, SavedQuery, UserFilters};

/// Data-fetch capability for the current user's tasks and filters.
#[allow(async_fn_in_trait)]
pub trait TodoSource {
    /// Error type bubbled up from the backing service.
    type Error: Into<Error> + Send;

    /// Load tasks assigned to the current user and not yet complete.
    ///
    /// # Errors
    /// Returns a source-specific error when the tasks cannot be fetched.
    async fn fetch_assigned_tasks(&self) -> Result<Vec<RawTask>, Self::Error>;

    /// Load tasks the current user recently completed.
    ///
    /// # Errors
    /// Returns a source-specific error when the tasks cannot be fetched.
    async fn fetch_completed_tasks(&self) -> Result<Vec<RawTask>, Self::Error>;

    /// Load the saved search filters of the current user.
    ///
    /// # Errors
    /// Returns a source-specific error when the filters cannot be fetched.
    async fn fetch_user_filters(&self) -> Result<UserFilters, Self::Error>;
}

/// Persistence capability for named queries.
#[allow(async_fn_in_trait)]
pub trait SavedQueryStore {
    /// Error type bubbled up from the backing service.
    type Error: Into<Error> + Send;

    /// Persist a named query under `list_type` and return the stored entry.
    ///
    /// # Errors
    /// Returns a store-specific error when the query cannot be saved.
    async fn persist_named_query(
        &self,
        list_type: &str,
        name: &str,
        search_query: &str,
    ) -> Result<SavedQuery, Self::Error>;

    /// Delete a previously saved query.
    ///
    /// # Errors
    /// Returns a store-specific error when the query cannot be deleted.
    async fn delete_named_query(&self, query: &SavedQuery) -> Result<(), Self::Error>;
}

//! JSON files standing in for the tracker API.
//!
//! A data directory holds `tasks.json`, `done.json`, `statuses.json` and
//! `filters.json`. Missing files read as empty collections.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use todolens_app::{SavedQueryStore, TodoSource};
use todolens_core::{
    ALL_PROJECTS_SCOPE, RawTask, SavedQuery, StatusDescriptor, StatusMap, TODO_QUERY_SCOPE,
    UserFilters,
};
use tracing::debug;

const TASKS_FILE: &str = "tasks.json";
const DONE_FILE: &str = "done.json";
const STATUSES_FILE: &str = "statuses.json";
const FILTERS_FILE: &str = "filters.json";

/// Errors raised while reading or writing the data directory.
#[derive(Error, Debug)]
pub enum DataDirError {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// A file did not contain the expected JSON.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// A saved query to delete is not in the filters file.
    #[error("Saved query '{name}' not found in {path}")]
    QueryNotFound {
        /// File searched.
        path: PathBuf,
        /// Name of the query.
        name: String,
    },
}

/// Collaborators backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonDataDir {
    root: PathBuf,
}

impl JsonDataDir {
    /// Use `root` as the data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read the status registry.
    ///
    /// # Errors
    /// Returns an error when `statuses.json` exists but cannot be read or parsed.
    pub async fn load_statuses(&self) -> Result<StatusMap, DataDirError> {
        let statuses: Vec<StatusDescriptor> = self.read_json(STATUSES_FILE).await?;
        Ok(StatusMap::from_descriptors(statuses))
    }

    async fn read_json<T>(&self, file: &str) -> Result<T, DataDirError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let path = self.root.join(file);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Data file missing, using empty value");
                return Ok(T::default());
            }
            Err(source) => return Err(DataDirError::Io { path, source }),
        };
        serde_json::from_str(&contents).map_err(|source| DataDirError::Json { path, source })
    }

    async fn write_json<T>(&self, file: &str, value: &T) -> Result<(), DataDirError>
    where
        T: serde::Serialize,
    {
        let path = self.root.join(file);
        let contents = serde_json::to_string_pretty(value).map_err(|source| DataDirError::Json {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| DataDirError::Io { path, source })
    }
}

impl TodoSource for JsonDataDir {
    type Error = DataDirError;

    async fn fetch_assigned_tasks(&self) -> Result<Vec<RawTask>, Self::Error> {
        self.read_json(TASKS_FILE).await
    }

    async fn fetch_completed_tasks(&self) -> Result<Vec<RawTask>, Self::Error> {
        self.read_json(DONE_FILE).await
    }

    async fn fetch_user_filters(&self) -> Result<UserFilters, Self::Error> {
        self.read_json(FILTERS_FILE).await
    }
}

impl SavedQueryStore for JsonDataDir {
    type Error = DataDirError;

    async fn persist_named_query(
        &self,
        list_type: &str,
        name: &str,
        search_query: &str,
    ) -> Result<SavedQuery, Self::Error> {
        let mut filters: UserFilters = self.read_json(FILTERS_FILE).await?;
        let saved = SavedQuery {
            id: Some(format!("{list_type}:{name}")),
            name: name.to_owned(),
            search_query: search_query.to_owned(),
            list_type: list_type.to_owned(),
        };
        filters.insert(ALL_PROJECTS_SCOPE, saved.clone());
        self.write_json(FILTERS_FILE, &filters).await?;
        Ok(saved)
    }

    async fn delete_named_query(&self, query: &SavedQuery) -> Result<(), Self::Error> {
        let mut filters: UserFilters = self.read_json(FILTERS_FILE).await?;
        // Entries written by the tracker may omit their list type.
        let list_type = if query.list_type.is_empty() {
            TODO_QUERY_SCOPE
        } else {
            query.list_type.as_str()
        };
        if !filters.remove(list_type, &query.name) {
            return Err(DataDirError::QueryNotFound {
                path: self.root.join(FILTERS_FILE),
                name: query.name.clone(),
            });
        }
        self.write_json(FILTERS_FILE, &filters).await
    }
}

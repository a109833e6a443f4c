//! Named search queries persisted per user.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::sorting::Named;
use crate::task::null_as_default;

/// List type under which todo queries are stored.
pub const TODO_QUERY_SCOPE: &str = "todos";

/// Project scope holding queries shared across productions.
pub const ALL_PROJECTS_SCOPE: &str = "all";

/// User-named free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    /// Identifier assigned by the persistence collaborator.
    #[serde(default)]
    pub id: Option<String>,
    /// Name shown to the user; unique within a list.
    pub name: String,
    /// Query text replayed into the search index.
    #[serde(default, deserialize_with = "null_as_default")]
    pub search_query: String,
    /// List the query belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub list_type: String,
}

impl SavedQuery {
    /// Query that exists only locally (never confirmed by the collaborator).
    pub fn local(list_type: &str, name: &str, search_query: &str) -> Self {
        Self {
            id: None,
            name: name.to_owned(),
            search_query: search_query.to_owned(),
            list_type: list_type.to_owned(),
        }
    }
}

impl Named for SavedQuery {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Saved queries grouped by list type, then by project scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct UserFilters {
    lists: BTreeMap<String, BTreeMap<String, Vec<SavedQuery>>>,
}

impl UserFilters {
    /// Queries stored for a list type and project scope.
    #[must_use]
    pub fn queries(&self, list_type: &str, scope: &str) -> &[SavedQuery] {
        self.lists
            .get(list_type)
            .and_then(|scopes| scopes.get(scope))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Cross-project queries of the todo list.
    #[must_use]
    pub fn todo_queries(&self) -> &[SavedQuery] {
        self.queries(TODO_QUERY_SCOPE, ALL_PROJECTS_SCOPE)
    }

    /// Append a query to a list type and project scope.
    pub fn insert(&mut self, scope: &str, query: SavedQuery) {
        self.lists
            .entry(query.list_type.clone())
            .or_default()
            .entry(scope.to_owned())
            .or_default()
            .push(query);
    }

    /// Drop every query named `name` from a list type, in all scopes.
    pub fn remove(&mut self, list_type: &str, name: &str) -> bool {
        let Some(scopes) = self.lists.get_mut(list_type) else {
            return false;
        };
        let mut removed = false;
        for queries in scopes.values_mut() {
            let before = queries.len();
            queries.retain(|query| query.name != name);
            removed |= queries.len() != before;
        }
        removed
    }
}

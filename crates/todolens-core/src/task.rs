//! Task payloads as fetched and the normalized records built from them.

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;

use crate::id::TaskId;
use crate::status::StatusDescriptor;

/// Comment attached to a task, usually carrying a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Comment {
    /// Comment identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Comment body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Display name of the author.
    #[serde(default, deserialize_with = "null_as_default")]
    pub person_name: String,
    /// Creation time in UTC.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Task as returned by the data-fetch collaborator.
///
/// Only `id` is required. Every other field defaults when absent or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawTask {
    /// Task identifier.
    pub id: TaskId,
    /// Task name; empty for most tracker payloads.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Name of the task type (`"Animation"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_type_name: String,
    /// Pipeline order of the task type.
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_type_priority: i64,
    /// Status identifier to resolve against the registry.
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_status_id: String,
    /// Owning entity identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_id: String,
    /// Owning entity name (`"SH010"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_name: String,
    /// Entity type (`"Shot"`, `"Asset"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type_name: String,
    /// Episode of the owning entity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_name: String,
    /// Sequence of the owning entity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sequence_name: String,
    /// Production name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_name: String,
    /// Task priority within its entity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i64,
    /// Due date as sent by the server.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Names of assigned people.
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignees: Vec<String>,
    /// Most recent comment.
    #[serde(default)]
    pub last_comment: Option<Comment>,
    /// RFC 3339 timestamp of the last change.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Normalized task with derived display fields and a resolved status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: TaskId,
    /// Display name (falls back to the task type name).
    pub name: String,
    /// Name of the task type.
    pub task_type_name: String,
    /// Pipeline order of the task type.
    pub task_type_priority: i64,
    /// Owning entity identifier.
    pub entity_id: String,
    /// Owning entity name.
    pub entity_name: String,
    /// Entity type.
    pub entity_type_name: String,
    /// Episode, sequence and entity joined for display.
    pub full_entity_name: String,
    /// Episode of the owning entity.
    pub episode_name: String,
    /// Sequence of the owning entity.
    pub sequence_name: String,
    /// Production name.
    pub project_name: String,
    /// Task priority within its entity.
    pub priority: i64,
    /// Due date as sent by the server.
    pub due_date: Option<String>,
    /// Names of assigned people.
    pub assignees: Vec<String>,
    /// Status identifier.
    pub task_status_id: String,
    /// Denormalized status name.
    pub task_status_name: String,
    /// Denormalized status abbreviation.
    pub task_status_short_name: String,
    /// Denormalized status colour.
    pub task_status_color: String,
    /// Status descriptor shared with the registry, `None` when unresolved.
    pub task_status: Option<Arc<StatusDescriptor>>,
    /// Most recent comment.
    pub last_comment: Option<Comment>,
    /// Time of the last known activity.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_activity: Option<OffsetDateTime>,
}

impl TaskRecord {
    /// Point the record at a new status, refreshing the denormalized fields.
    ///
    /// An unresolved status keeps the id but clears everything derived from it.
    pub fn set_status(&mut self, status_id: &str, status: Option<Arc<StatusDescriptor>>) {
        self.task_status_id = status_id.to_owned();
        match status.as_deref() {
            Some(descriptor) => {
                self.task_status_name.clone_from(&descriptor.name);
                self.task_status_short_name.clone_from(&descriptor.short_name);
                self.task_status_color.clone_from(&descriptor.color);
            }
            None => {
                self.task_status_name.clear();
                self.task_status_short_name.clear();
                self.task_status_color.clear();
            }
        }
        self.task_status = status;
    }

    /// Text fields the search index tokenizes.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.name.as_str(),
            self.task_type_name.as_str(),
            self.entity_name.as_str(),
            self.episode_name.as_str(),
            self.sequence_name.as_str(),
            self.project_name.as_str(),
            self.task_status_short_name.as_str(),
        ]
        .into_iter()
        .chain(self.assignees.iter().map(String::as_str))
    }
}

/// Status change delivered by an incremental update (a new comment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status the task moves to.
    pub task_status_id: String,
    /// Comment that carried the change.
    pub comment: Comment,
}

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

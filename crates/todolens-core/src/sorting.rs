//! Deterministic ordering for task lists and named collections.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::task::TaskRecord;

/// Field a task list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Production name.
    ProjectName,
    /// Full entity name (episode / sequence / entity).
    EntityName,
    /// Task type name.
    TaskTypeName,
    /// Display name.
    Name,
    /// Task priority, lowest first.
    Priority,
    /// Due date, earliest first; missing dates last.
    DueDate,
}

impl SortKey {
    /// Order used when no configuration overrides it.
    pub const DEFAULT_ORDER: [Self; 3] = [Self::EntityName, Self::Name, Self::Priority];

    /// Configuration spelling of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectName => "project_name",
            Self::EntityName => "entity_name",
            Self::TaskTypeName => "task_type_name",
            Self::Name => "name",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
        }
    }

    fn compare(self, a: &TaskRecord, b: &TaskRecord) -> Ordering {
        match self {
            Self::ProjectName => compare_text(&a.project_name, &b.project_name),
            Self::EntityName => compare_text(&a.full_entity_name, &b.full_entity_name),
            Self::TaskTypeName => compare_text(&a.task_type_name, &b.task_type_name),
            Self::Name => compare_text(&a.name, &b.name),
            Self::Priority => a.priority.cmp(&b.priority),
            Self::DueDate => match (&a.due_date, &b.due_date) {
                (Some(a_due), Some(b_due)) => a_due.cmp(b_due),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Anything displayed by name.
pub trait Named {
    /// Name used for ordering.
    fn name(&self) -> &str;
}

/// Return `tasks` ordered by `keys`, ties kept in input order.
#[must_use]
pub fn sort_tasks(tasks: &[TaskRecord], keys: &[SortKey]) -> Vec<TaskRecord> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// Return `items` ordered by name, case-insensitively, ties kept in input order.
#[must_use]
pub fn sort_by_name<T>(items: &[T]) -> Vec<T>
where
    T: Named + Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare_text(a.name(), b.name()));
    sorted
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use crate::normalize::normalize;
    use crate::saved_query::SavedQuery;
    use crate::status::StatusMap;
    use crate::task::RawTask;

    fn task(id: u64, entity: &str, name: &str, priority: i64) -> TaskRecord {
        normalize(
            RawTask {
                id: TaskId::from(id),
                entity_name: entity.into(),
                name: name.into(),
                priority,
                ..RawTask::default()
            },
            &StatusMap::default(),
        )
    }

    fn ids(tasks: &[TaskRecord]) -> Vec<String> {
        tasks.iter().map(|task| task.id.to_string()).collect()
    }

    #[test]
    fn sort_tasks_uses_composite_key() {
        let tasks = vec![
            task(1, "SH020", "Animation", 0),
            task(2, "sh010", "Layout", 0),
            task(3, "SH010", "animation", 2),
            task(4, "SH010", "Animation", 1),
        ];

        let sorted = sort_tasks(&tasks, &SortKey::DEFAULT_ORDER);
        assert_eq!(ids(&sorted), vec!["4", "3", "2", "1"]);
    }

    #[test]
    fn sort_tasks_is_stable_and_leaves_input_untouched() {
        let tasks = vec![
            task(1, "SH010", "Animation", 0),
            task(2, "SH010", "Animation", 0),
            task(3, "SH001", "Animation", 0),
        ];

        let sorted = sort_tasks(&tasks, &[SortKey::EntityName]);
        assert_eq!(ids(&sorted), vec!["3", "1", "2"]);
        assert_eq!(ids(&tasks), vec!["1", "2", "3"]);
    }

    #[test]
    fn due_dates_sort_missing_last() {
        let mut early = task(1, "A", "x", 0);
        early.due_date = Some("2024-01-01".into());
        let undated = task(2, "A", "x", 0);
        let mut late = task(3, "A", "x", 0);
        late.due_date = Some("2024-06-01".into());

        let sorted = sort_tasks(&[undated, late, early], &[SortKey::DueDate]);
        assert_eq!(ids(&sorted), vec!["1", "3", "2"]);
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let queries = vec![
            SavedQuery::local("todos", "urgent", "urgent"),
            SavedQuery::local("todos", "Animation", "anim"),
            SavedQuery::local("todos", "blocked", "blocked"),
        ];
        let names: Vec<_> = sort_by_name(&queries)
            .into_iter()
            .map(|query| query.name)
            .collect();
        assert_eq!(names, vec!["Animation", "blocked", "urgent"]);
    }

    #[test]
    fn sort_key_spelling_matches_serde() {
        for key in [
            SortKey::ProjectName,
            SortKey::EntityName,
            SortKey::TaskTypeName,
            SortKey::Name,
            SortKey::Priority,
            SortKey::DueDate,
        ] {
            let json = serde_json::to_string(&key).unwrap_or_else(|err| panic!("serialize: {err}"));
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }
}

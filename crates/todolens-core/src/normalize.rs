//! Enrich raw task payloads into [`TaskRecord`] values.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::status::StatusRegistry;
use crate::task::{RawTask, TaskRecord};

const ENTITY_NAME_SEPARATOR: &str = " / ";

/// Normalize a single raw task, resolving its status through `registry`.
///
/// Never fails: absent fields stay empty and an unknown status leaves
/// [`TaskRecord::task_status`] as `None`.
pub fn normalize<R>(raw: RawTask, registry: &R) -> TaskRecord
where
    R: StatusRegistry + ?Sized,
{
    let full_entity_name = full_entity_name(&raw);
    let name = if raw.name.trim().is_empty() {
        raw.task_type_name.clone()
    } else {
        raw.name
    };
    let last_activity = raw
        .updated_at
        .as_deref()
        .and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok())
        .or_else(|| raw.last_comment.as_ref().and_then(|comment| comment.created_at));

    let mut record = TaskRecord {
        id: raw.id,
        name,
        task_type_name: raw.task_type_name,
        task_type_priority: raw.task_type_priority,
        entity_id: raw.entity_id,
        entity_name: raw.entity_name,
        entity_type_name: raw.entity_type_name,
        full_entity_name,
        episode_name: raw.episode_name,
        sequence_name: raw.sequence_name,
        project_name: raw.project_name,
        priority: raw.priority,
        due_date: raw.due_date,
        assignees: raw.assignees,
        task_status_id: String::new(),
        task_status_name: String::new(),
        task_status_short_name: String::new(),
        task_status_color: String::new(),
        task_status: None,
        last_comment: raw.last_comment,
        last_activity,
    };
    let status = registry.resolve_status(&raw.task_status_id);
    record.set_status(&raw.task_status_id, status);
    record
}

/// Normalize every task of a fetch payload, keeping payload order.
pub fn normalize_all<R>(raws: Vec<RawTask>, registry: &R) -> Vec<TaskRecord>
where
    R: StatusRegistry + ?Sized,
{
    raws.into_iter().map(|raw| normalize(raw, registry)).collect()
}

fn full_entity_name(raw: &RawTask) -> String {
    [
        raw.episode_name.as_str(),
        raw.sequence_name.as_str(),
        raw.entity_name.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(ENTITY_NAME_SEPARATOR)
}

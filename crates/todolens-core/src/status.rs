//! Task status descriptors and the lookup capability used to resolve them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Workflow status as published by the status registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDescriptor {
    /// Registry identifier.
    pub id: String,
    /// Full display name (`"Work In Progress"`).
    #[serde(default)]
    pub name: String,
    /// Abbreviation shown in dense lists (`"wip"`).
    #[serde(default)]
    pub short_name: String,
    /// Hex colour used by the UI.
    #[serde(default)]
    pub color: String,
}

/// Resolve status identifiers to shared descriptors.
///
/// Tasks never own their descriptor; they keep the `Arc` handed out here.
pub trait StatusRegistry {
    /// Look up a status by id. Unknown ids yield `None`.
    fn resolve_status(&self, status_id: &str) -> Option<Arc<StatusDescriptor>>;
}

impl<R: StatusRegistry + ?Sized> StatusRegistry for &R {
    fn resolve_status(&self, status_id: &str) -> Option<Arc<StatusDescriptor>> {
        (**self).resolve_status(status_id)
    }
}

impl<R: StatusRegistry + ?Sized> StatusRegistry for Arc<R> {
    fn resolve_status(&self, status_id: &str) -> Option<Arc<StatusDescriptor>> {
        (**self).resolve_status(status_id)
    }
}

/// In-memory registry keyed by status id.
#[derive(Debug, Clone, Default)]
pub struct StatusMap {
    statuses: HashMap<String, Arc<StatusDescriptor>>,
}

impl StatusMap {
    /// Build a registry from a list of descriptors. Later duplicates win.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = StatusDescriptor>) -> Self {
        let statuses = descriptors
            .into_iter()
            .map(|descriptor| (descriptor.id.clone(), Arc::new(descriptor)))
            .collect();
        Self { statuses }
    }

    /// Number of registered statuses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Whether no status is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl StatusRegistry for StatusMap {
    fn resolve_status(&self, status_id: &str) -> Option<Arc<StatusDescriptor>> {
        self.statuses.get(status_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str, short_name: &str) -> StatusDescriptor {
        StatusDescriptor {
            id: id.into(),
            name: short_name.to_uppercase(),
            short_name: short_name.into(),
            color: "#000000".into(),
        }
    }

    #[test]
    fn status_map_resolves_known_ids() {
        let map = StatusMap::from_descriptors([descriptor("s1", "wip"), descriptor("s2", "done")]);
        assert_eq!(map.len(), 2);
        let Some(status) = map.resolve_status("s2") else {
            panic!("s2 must resolve");
        };
        assert_eq!(status.short_name, "done");
        assert!(map.resolve_status("missing").is_none());
    }

    #[test]
    fn status_map_hands_out_shared_descriptors() {
        let map = StatusMap::from_descriptors([descriptor("s1", "wip")]);
        let (Some(first), Some(second)) = (map.resolve_status("s1"), map.resolve_status("s1")) else {
            panic!("s1 must resolve");
        };
        assert!(Arc::ptr_eq(&first, &second));
    }
}

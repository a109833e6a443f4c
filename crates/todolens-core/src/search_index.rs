//! Token-based inverted index over normalized tasks.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use crate::task::TaskRecord;

/// Split text into lower-cased tokens on non-alphanumeric boundaries.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Inverted index from token to positions in the indexed collection.
///
/// The index keeps the records it was built from, so results always reflect
/// the collection as of the last (re)build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    tokens: BTreeMap<String, BTreeSet<usize>>,
    tasks: Vec<TaskRecord>,
}

impl SearchIndex {
    /// Index every searchable field of `tasks`.
    #[must_use]
    pub fn build(tasks: &[TaskRecord]) -> Self {
        let mut tokens: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for (position, task) in tasks.iter().enumerate() {
            for field in task.searchable_fields() {
                for token in tokenize(field) {
                    tokens.entry(token).or_default().insert(position);
                }
            }
        }
        Self {
            tokens,
            tasks: tasks.to_vec(),
        }
    }

    /// Evaluate a free-text query.
    ///
    /// Returns `None` for blank text, meaning "no filter". Otherwise every
    /// query token must prefix-match some indexed token of a record; results
    /// keep the indexed collection order.
    #[must_use]
    pub fn query(&self, text: &str) -> Option<Vec<TaskRecord>> {
        if text.trim().is_empty() {
            return None;
        }

        let mut terms = tokenize(text).into_iter();
        let Some(first) = terms.next() else {
            return Some(Vec::new());
        };

        let mut matches = self.positions_with_prefix(&first);
        for term in terms {
            if matches.is_empty() {
                break;
            }
            let next = self.positions_with_prefix(&term);
            matches.retain(|position| next.contains(position));
        }

        Some(
            matches
                .into_iter()
                .filter_map(|position| self.tasks.get(position).cloned())
                .collect(),
        )
    }

    /// Records the index was built from.
    #[must_use]
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no record is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn positions_with_prefix(&self, prefix: &str) -> BTreeSet<usize> {
        self.tokens
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(token, _)| token.starts_with(prefix))
            .flat_map(|(_, positions)| positions.iter().copied())
            .collect()
    }
}

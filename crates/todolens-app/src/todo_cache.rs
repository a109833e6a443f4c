//! Todo collection with its search index, displayed subset and selection grid.

use std::collections::HashMap;

use todolens_core::{SearchIndex, SelectionGrid, SortKey, TaskId, TaskRecord, sort_tasks};

/// Sorted todos plus every structure derived from them.
///
/// Rebuilds produce a whole new set of derived values which replace the old
/// ones together, so no caller ever sees an index or grid built against a
/// different collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TodoCache {
    /// Todos in display order.
    pub todos: Vec<TaskRecord>,
    /// Mapping from task id to index into [`todos`](Self::todos).
    pub task_index: HashMap<TaskId, usize>,
    /// Search index built from [`todos`](Self::todos).
    pub search_index: SearchIndex,
    /// Subset of todos matching the active query.
    pub displayed: Vec<TaskRecord>,
    /// Bulk selection over [`displayed`](Self::displayed).
    pub selection: SelectionGrid,
}

impl TodoCache {
    /// Sort freshly normalized tasks and derive the index, display and grid.
    #[must_use]
    pub fn build(tasks: &[TaskRecord], keys: &[SortKey], search_text: &str, groups: usize) -> Self {
        Self::from_sorted(sort_tasks(tasks, keys), search_text, groups)
    }

    fn from_sorted(todos: Vec<TaskRecord>, search_text: &str, groups: usize) -> Self {
        let search_index = SearchIndex::build(&todos);
        let displayed = Self::display(&search_index, &todos, search_text);
        let selection = SelectionGrid::with_dimensions(displayed.len(), groups);
        let task_index = todos
            .iter()
            .enumerate()
            .map(|(idx, task)| (task.id.clone(), idx))
            .collect();
        Self {
            todos,
            task_index,
            search_index,
            displayed,
            selection,
        }
    }

    fn display(index: &SearchIndex, todos: &[TaskRecord], search_text: &str) -> Vec<TaskRecord> {
        index.query(search_text).unwrap_or_else(|| todos.to_vec())
    }

    /// Recompute the displayed subset for `search_text` and reset the selection.
    pub fn apply_search(&mut self, search_text: &str, groups: usize) {
        let displayed = Self::display(&self.search_index, &self.todos, search_text);
        self.selection = SelectionGrid::with_dimensions(displayed.len(), groups);
        self.displayed = displayed;
    }

    /// Whether a task is part of the collection.
    #[must_use]
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_index.contains_key(task_id)
    }

    /// Fetch a todo by id.
    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<&TaskRecord> {
        self.task_index
            .get(task_id)
            .and_then(|&idx| self.todos.get(idx))
    }

    /// Mutate one todo and rebuild the index and displayed subset.
    ///
    /// Returns `false` without touching anything when the id is unknown. The
    /// selection survives only if the displayed rows are the same tasks as before.
    pub fn update_task<F>(&mut self, task_id: &TaskId, search_text: &str, update: F) -> bool
    where
        F: FnOnce(&mut TaskRecord),
    {
        let Some(&idx) = self.task_index.get(task_id) else {
            return false;
        };

        let mut todos = self.todos.clone();
        if let Some(task) = todos.get_mut(idx) {
            update(task);
        }
        let search_index = SearchIndex::build(&todos);
        let displayed = Self::display(&search_index, &todos, search_text);

        let same_rows = displayed.len() == self.displayed.len()
            && displayed
                .iter()
                .zip(&self.displayed)
                .all(|(now, before)| now.id == before.id);
        if !same_rows {
            self.selection = SelectionGrid::with_dimensions(displayed.len(), self.selection.columns());
        }

        self.todos = todos;
        self.search_index = search_index;
        self.displayed = displayed;
        true
    }

    /// Displayed tasks whose row has a selected cell.
    pub fn selected_tasks(&self) -> impl Iterator<Item = &TaskRecord> {
        self.selection
            .selected_rows()
            .into_iter()
            .filter_map(|x| self.displayed.get(x))
    }
}

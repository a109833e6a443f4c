//! State container for the current user's todo list.

use time::OffsetDateTime;
use todolens_core::{
    ALL_PROJECTS_SCOPE, SavedQuery, SearchIndex, SelectionGrid, StatusChange, StatusRegistry,
    TODO_QUERY_SCOPE, TaskId, TaskRecord, UserFilters, normalize_all, sort_by_name,
};
use tracing::{debug, info, warn};

use crate::config::{CommitPolicy, TodoConfig};
use crate::error::{FetchTarget, PersistOperation, TodoError, TodoResult};
use crate::source::{SavedQueryStore, TodoSource};
use crate::todo_cache::TodoCache;

/// Progress of the todo load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet, or state was reset.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed; earlier data is still served.
    LoadError,
    /// Todos are loaded.
    Loaded,
}

/// Result of [`TodoAggregator::load_todos`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The cached collection was reused; nothing was fetched.
    Reused,
    /// Both collections were fetched.
    Fetched {
        /// Number of todos loaded.
        todos: usize,
        /// Number of done tasks loaded.
        done: usize,
    },
}

/// Result of [`TodoAggregator::save_named_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A query with that name already existed; the collaborator was not called.
    AlreadyExists,
    /// The collaborator stored the query.
    Saved(SavedQuery),
}

/// Every state change the aggregator accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoCommand {
    /// Load todos, reusing the cache unless `force` is set.
    LoadTodos {
        /// Fetch even when todos are already loaded.
        force: bool,
    },
    /// Refresh the user's saved filters.
    LoadUserFilters,
    /// Replace the active free-text query.
    SetSearchText(String),
    /// Apply a status change to one task.
    ApplyIncrementalUpdate {
        /// Target task.
        task_id: TaskId,
        /// New status and the comment carrying it.
        change: StatusChange,
    },
    /// Select or unselect one grid cell.
    SetSelection {
        /// Displayed row.
        x: usize,
        /// Page or group column.
        y: usize,
        /// New cell value.
        selected: bool,
    },
    /// Unselect everything.
    ClearSelection,
    /// Save the named query.
    SaveNamedQuery(String),
    /// Remove a saved query.
    RemoveNamedQuery(SavedQuery),
    /// Drop all state, as on logout.
    Reset,
}

/// What a dispatched [`TodoCommand`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Outcome of a todo load.
    Loaded(LoadOutcome),
    /// Outcome of a saved-query save.
    Saved(SaveOutcome),
    /// Whether an incremental update found its task.
    Updated(bool),
    /// Command applied with nothing to report.
    Applied,
}

#[derive(Debug, Default)]
struct AggregatorState {
    load_state: LoadState,
    cache: TodoCache,
    done_tasks: Vec<TaskRecord>,
    search_text: String,
    user_filters: UserFilters,
    saved_queries: Vec<SavedQuery>,
}

/// Owner of the todo list state.
///
/// Collaborators are injected: `S` fetches and persists, `R` resolves task
/// statuses. Every command takes `&mut self`, so mutations never interleave.
pub struct TodoAggregator<S, R> {
    source: S,
    registry: R,
    config: TodoConfig,
    state: AggregatorState,
}

impl<S, R> TodoAggregator<S, R> {
    /// Create an idle aggregator.
    pub fn new(source: S, registry: R, config: TodoConfig) -> Self {
        Self {
            source,
            registry,
            config,
            state: AggregatorState::default(),
        }
    }

    /// Borrow the injected source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Borrow the configuration.
    pub const fn config(&self) -> &TodoConfig {
        &self.config
    }

    /// Current load state.
    pub const fn load_state(&self) -> LoadState {
        self.state.load_state
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.load_state == LoadState::Loading
    }

    /// Whether the last load failed.
    pub fn has_load_error(&self) -> bool {
        self.state.load_state == LoadState::LoadError
    }

    /// Full sorted todo collection.
    pub fn todos(&self) -> &[TaskRecord] {
        &self.state.cache.todos
    }

    /// Todos matching the active query.
    pub fn displayed_tasks(&self) -> &[TaskRecord] {
        &self.state.cache.displayed
    }

    /// Recently completed tasks.
    pub fn displayed_done_tasks(&self) -> &[TaskRecord] {
        &self.state.done_tasks
    }

    /// Saved todo queries, ordered by name.
    pub fn saved_queries(&self) -> &[SavedQuery] {
        &self.state.saved_queries
    }

    /// Saved filters of the current user.
    pub const fn user_filters(&self) -> &UserFilters {
        &self.state.user_filters
    }

    /// Active free-text query.
    pub fn search_text(&self) -> &str {
        &self.state.search_text
    }

    /// Index over the todo collection.
    pub const fn search_index(&self) -> &SearchIndex {
        &self.state.cache.search_index
    }

    /// Bulk selection over the displayed todos.
    pub const fn selection(&self) -> &SelectionGrid {
        &self.state.cache.selection
    }

    /// Displayed todos whose row is selected.
    pub fn selected_tasks(&self) -> Vec<&TaskRecord> {
        self.state.cache.selected_tasks().collect()
    }

    /// Replace the active query and recompute the displayed todos.
    ///
    /// Blank text shows the whole collection. The selection grid is rebuilt
    /// for the new display.
    pub fn set_search_text(&mut self, text: &str) {
        text.clone_into(&mut self.state.search_text);
        self.state
            .cache
            .apply_search(text, self.config.selection.groups);
        debug!(
            query = text,
            displayed = self.state.cache.displayed.len(),
            "Applied todo search"
        );
    }

    /// Select or unselect a cell. Out-of-range coordinates are ignored.
    pub fn set_selection(&mut self, x: usize, y: usize, selected: bool) {
        self.state.cache.selection.set(x, y, selected);
    }

    /// Unselect every cell.
    pub fn clear_selection(&mut self) {
        self.state.cache.selection = self.state.cache.selection.clear();
    }

    /// Drop every collection, the index, the grid and all flags.
    pub fn reset(&mut self) {
        self.state = AggregatorState::default();
        debug!("Reset todo state");
    }

    fn insert_saved_query(&mut self, query: SavedQuery) {
        self.state
            .user_filters
            .insert(ALL_PROJECTS_SCOPE, query.clone());
        self.state.saved_queries.push(query);
        self.state.saved_queries = sort_by_name(&self.state.saved_queries);
    }

    fn remove_saved_query(&mut self, name: &str) {
        self.state.user_filters.remove(TODO_QUERY_SCOPE, name);
        if let Some(idx) = self
            .state
            .saved_queries
            .iter()
            .position(|query| query.name == name)
        {
            self.state.saved_queries.remove(idx);
        }
    }
}

impl<S, R> TodoAggregator<S, R>
where
    R: StatusRegistry,
{
    /// Apply a status change carried by a new comment.
    ///
    /// Tasks outside the todo list are ignored and `false` is returned. For a
    /// known task the status, last comment and last activity are updated and
    /// the search index is rebuilt from the whole collection.
    pub fn apply_incremental_update(&mut self, task_id: &TaskId, change: &StatusChange) -> bool {
        if !self.state.cache.contains(task_id) {
            debug!(%task_id, "Ignoring update for task outside the todo list");
            return false;
        }

        let status = self.registry.resolve_status(&change.task_status_id);
        if status.is_none() {
            warn!(%task_id, status_id = %change.task_status_id, "Unknown task status");
        }
        let activity = change
            .comment
            .created_at
            .unwrap_or_else(OffsetDateTime::now_utc);

        self.state.cache.update_task(task_id, &self.state.search_text, |task| {
            task.set_status(&change.task_status_id, status);
            task.last_comment = Some(change.comment.clone());
            task.last_activity = Some(activity);
        })
    }
}

impl<S, R> TodoAggregator<S, R>
where
    S: TodoSource,
    R: StatusRegistry,
{
    /// Load the todo list, then the done list.
    ///
    /// A non-empty collection is reused unless `force` is set. On success the
    /// active query is re-applied and saved queries are seeded from the user's
    /// filters.
    ///
    /// # Errors
    /// Returns [`TodoError::FetchFailure`] when either fetch fails. Data loaded
    /// before the failure stays in place.
    pub async fn load_todos(&mut self, force: bool) -> TodoResult<LoadOutcome> {
        if !force && !self.state.cache.todos.is_empty() {
            debug!(todos = self.state.cache.todos.len(), "Reusing loaded todos");
            return Ok(LoadOutcome::Reused);
        }

        self.state.load_state = LoadState::Loading;
        let raws = match self.source.fetch_assigned_tasks().await {
            Ok(raws) => raws,
            Err(err) => return Err(self.fail_fetch(FetchTarget::AssignedTasks, err.into())),
        };

        let tasks = normalize_all(raws, &self.registry);
        self.state.cache = TodoCache::build(
            &tasks,
            self.config.sort.keys(),
            &self.state.search_text,
            self.config.selection.groups,
        );
        self.state.saved_queries = sort_by_name(self.state.user_filters.todo_queries());
        self.state.load_state = LoadState::Loaded;
        info!(
            todos = self.state.cache.todos.len(),
            displayed = self.state.cache.displayed.len(),
            "Loaded todos"
        );

        let done_raws = match self.source.fetch_completed_tasks().await {
            Ok(raws) => raws,
            Err(err) => return Err(self.fail_fetch(FetchTarget::CompletedTasks, err.into())),
        };
        self.state.done_tasks = normalize_all(done_raws, &self.registry);
        debug!(done = self.state.done_tasks.len(), "Loaded done tasks");

        Ok(LoadOutcome::Fetched {
            todos: self.state.cache.todos.len(),
            done: self.state.done_tasks.len(),
        })
    }

    /// Refresh the user's saved filters used to seed saved queries.
    ///
    /// # Errors
    /// Returns [`TodoError::FetchFailure`]; the previous filters are kept.
    pub async fn load_user_filters(&mut self) -> TodoResult<()> {
        match self.source.fetch_user_filters().await {
            Ok(filters) => {
                self.state.user_filters = filters;
                debug!(
                    todo_queries = self.state.user_filters.todo_queries().len(),
                    "Loaded user filters"
                );
                Ok(())
            }
            Err(err) => {
                let source = err.into();
                warn!(error = %source, "Failed to load user filters");
                Err(TodoError::FetchFailure {
                    target: FetchTarget::UserFilters,
                    source,
                })
            }
        }
    }

    fn fail_fetch(&mut self, target: FetchTarget, source: anyhow::Error) -> TodoError {
        self.state.load_state = LoadState::LoadError;
        warn!(%target, error = %source, "Todo fetch failed");
        TodoError::FetchFailure { target, source }
    }
}

impl<S, R> TodoAggregator<S, R>
where
    S: SavedQueryStore,
{
    /// Save a named query whose text is the name itself.
    ///
    /// Resolves immediately when a query of that name already exists.
    ///
    /// # Errors
    /// Returns [`TodoError::PersistenceFailure`] when the collaborator fails.
    /// Under [`CommitPolicy::Optimistic`] the query is inserted locally anyway.
    pub async fn save_named_query(&mut self, name: &str) -> TodoResult<SaveOutcome> {
        if self.state.saved_queries.iter().any(|query| query.name == name) {
            debug!(name, "Saved query already exists");
            return Ok(SaveOutcome::AlreadyExists);
        }

        match self
            .source
            .persist_named_query(TODO_QUERY_SCOPE, name, name)
            .await
        {
            Ok(saved) => {
                info!(name, "Saved todo query");
                self.insert_saved_query(saved.clone());
                Ok(SaveOutcome::Saved(saved))
            }
            Err(err) => {
                let source = err.into();
                warn!(name, error = %source, "Failed to save todo query");
                if self.config.saved_queries.commit == CommitPolicy::Optimistic {
                    self.insert_saved_query(SavedQuery::local(TODO_QUERY_SCOPE, name, name));
                }
                Err(TodoError::PersistenceFailure {
                    operation: PersistOperation::Save,
                    name: name.to_owned(),
                    source,
                })
            }
        }
    }

    /// Remove a saved query by name.
    ///
    /// # Errors
    /// Returns [`TodoError::PersistenceFailure`] when the collaborator fails.
    /// Under [`CommitPolicy::Optimistic`] the query is removed locally anyway.
    pub async fn remove_named_query(&mut self, query: &SavedQuery) -> TodoResult<()> {
        match self.source.delete_named_query(query).await {
            Ok(()) => {
                info!(name = %query.name, "Removed todo query");
                self.remove_saved_query(&query.name);
                Ok(())
            }
            Err(err) => {
                let source = err.into();
                warn!(name = %query.name, error = %source, "Failed to remove todo query");
                if self.config.saved_queries.commit == CommitPolicy::Optimistic {
                    self.remove_saved_query(&query.name);
                }
                Err(TodoError::PersistenceFailure {
                    operation: PersistOperation::Remove,
                    name: query.name.clone(),
                    source,
                })
            }
        }
    }
}

impl<S, R> TodoAggregator<S, R>
where
    S: TodoSource + SavedQueryStore,
    R: StatusRegistry,
{
    /// Run any command against the aggregator.
    ///
    /// # Errors
    /// Propagates the error of the underlying operation.
    pub async fn dispatch(&mut self, command: TodoCommand) -> TodoResult<CommandOutcome> {
        match command {
            TodoCommand::LoadTodos { force } => self.load_todos(force).await.map(CommandOutcome::Loaded),
            TodoCommand::LoadUserFilters => self
                .load_user_filters()
                .await
                .map(|()| CommandOutcome::Applied),
            TodoCommand::SetSearchText(text) => {
                self.set_search_text(&text);
                Ok(CommandOutcome::Applied)
            }
            TodoCommand::ApplyIncrementalUpdate { task_id, change } => Ok(CommandOutcome::Updated(
                self.apply_incremental_update(&task_id, &change),
            )),
            TodoCommand::SetSelection { x, y, selected } => {
                self.set_selection(x, y, selected);
                Ok(CommandOutcome::Applied)
            }
            TodoCommand::ClearSelection => {
                self.clear_selection();
                Ok(CommandOutcome::Applied)
            }
            TodoCommand::SaveNamedQuery(name) => self
                .save_named_query(&name)
                .await
                .map(CommandOutcome::Saved),
            TodoCommand::RemoveNamedQuery(query) => self
                .remove_named_query(&query)
                .await
                .map(|()| CommandOutcome::Applied),
            TodoCommand::Reset => {
                self.reset();
                Ok(CommandOutcome::Applied)
            }
        }
    }
}

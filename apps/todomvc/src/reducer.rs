//! Reducer logic for the to-do view.
//!
//! Every user intent is a synchronous state transition. The only effects are
//! the initial fetch and the error auto-dismiss timer.

use crate::source::TodosSource;
use crate::types::{ErrorMessage, TodoAction, TodoId, TodoItem, TodoState};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use todomvc_core::{
    SmallVec,
    effect::{Effect, EffectId},
    environment::IdGenerator,
    reducer::Reducer,
    smallvec,
};

/// Cancellation key of the error auto-dismiss timer
pub const ERROR_DISMISS: EffectId = EffectId::new("error-dismiss");

/// Cancellation key of the initial fetch
pub const LOAD_TODOS: EffectId = EffectId::new("load-todos");

/// Generated ids tried before falling back to one past the largest id
const MAX_ID_DRAWS: usize = 8;

/// How long an error stays visible unless dismissed
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_secs(3);

/// Environment dependencies for the to-do reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Where the initial collection comes from
    pub source: Arc<dyn TodosSource>,
    /// Identifiers for todos added in the session
    pub ids: Arc<dyn IdGenerator>,
    /// Owner of every todo, fetched or added
    pub user_id: u64,
    /// Auto-dismiss delay for error notifications
    pub error_timeout: Duration,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment` with the default error timeout
    #[must_use]
    pub fn new(source: Arc<dyn TodosSource>, ids: Arc<dyn IdGenerator>, user_id: u64) -> Self {
        Self {
            source,
            ids,
            user_id,
            error_timeout: DEFAULT_ERROR_TIMEOUT,
        }
    }

    /// Override the auto-dismiss delay
    #[must_use]
    pub const fn with_error_timeout(mut self, error_timeout: Duration) -> Self {
        self.error_timeout = error_timeout;
        self
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("user_id", &self.user_id)
            .field("error_timeout", &self.error_timeout)
            .finish_non_exhaustive()
    }
}

/// Reducer for the to-do view
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Show `message`, replacing any current error and restarting the timer
    fn raise_error(
        state: &mut TodoState,
        message: ErrorMessage,
        env: &TodoEnvironment,
    ) -> SmallVec<[Effect<TodoAction>; 4]> {
        state.error = Some(message);
        state.error_generation = state.error_generation.wrapping_add(1);

        smallvec![
            Effect::delay(
                env.error_timeout,
                TodoAction::ErrorExpired {
                    generation: state.error_generation,
                },
            )
            .cancellable(ERROR_DISMISS)
        ]
    }

    /// Next generated id not already in the list
    ///
    /// A generator that keeps colliding gives way to one past the largest id
    /// in use, or the lowest free id if that would overflow.
    fn fresh_id(state: &TodoState, env: &TodoEnvironment) -> TodoId {
        for _ in 0..MAX_ID_DRAWS {
            let id = TodoId::new(env.ids.next_id());
            if !state.exists(id) {
                return id;
            }
            tracing::debug!(%id, "Generated id already in use, drawing another");
        }

        let id = state
            .todos
            .iter()
            .map(|t| t.id.get())
            .max()
            .and_then(|max| max.checked_add(1))
            .or_else(|| (0..=u64::MAX).find(|&id| !state.exists(TodoId::new(id))))
            .map_or(TodoId::new(0), TodoId::new);
        tracing::warn!(%id, draws = MAX_ID_DRAWS, "Id generator kept colliding, using fallback id");
        id
    }

    /// Append a todo titled `text` trimmed and clear the field, or keep
    /// `text` in the field and raise the empty-title error
    fn submit(state: &mut TodoState, text: String, env: &TodoEnvironment) -> SmallVec<[Effect<TodoAction>; 4]> {
        let title = text.trim();
        if title.is_empty() {
            state.draft = text;
            return Self::raise_error(state, ErrorMessage::EmptyTitle, env);
        }

        let title = title.to_string();
        let id = Self::fresh_id(state, env);
        state.todos.push(TodoItem::new(id, title, env.user_id));
        state.draft.clear();
        SmallVec::new()
    }

    /// Drop records whose id repeats an earlier record
    fn dedupe(todos: Vec<TodoItem>) -> Vec<TodoItem> {
        let mut seen = HashSet::with_capacity(todos.len());
        let before = todos.len();

        let unique: Vec<TodoItem> = todos.into_iter().filter(|todo| seen.insert(todo.id)).collect();

        if unique.len() != before {
            tracing::warn!(
                dropped = before - unique.len(),
                "Source returned duplicate todo ids, keeping first occurrence"
            );
        }
        unique
    }

    fn load(env: &TodoEnvironment) -> Effect<TodoAction> {
        let source = Arc::clone(&env.source);
        let user_id = env.user_id;

        Effect::Future(Box::pin(async move {
            Some(match source.fetch_todos(user_id).await {
                Ok(todos) => TodoAction::TodosLoaded { todos },
                Err(error) => TodoAction::TodosLoadFailed {
                    reason: error.to_string(),
                },
            })
        }))
        .cancellable(LOAD_TODOS)
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Loading ==========
            TodoAction::LoadTodos => {
                if state.loading {
                    tracing::debug!("Fetch already in progress, ignoring LoadTodos");
                    return SmallVec::new();
                }
                state.loading = true;
                smallvec![Self::load(env)]
            },

            TodoAction::TodosLoaded { todos } => {
                state.loading = false;
                state.todos = Self::dedupe(todos);
                tracing::info!(count = state.todos.len(), "Todos loaded");
                SmallVec::new()
            },

            TodoAction::TodosLoadFailed { reason } => {
                state.loading = false;
                tracing::warn!(%reason, "Failed to load todos");
                Self::raise_error(state, ErrorMessage::LoadFailed, env)
            },

            // ========== Editing ==========
            TodoAction::DraftChanged { text } => {
                state.draft = text;
                SmallVec::new()
            },

            TodoAction::SubmitDraft => {
                let text = std::mem::take(&mut state.draft);
                Self::submit(state, text, env)
            },

            TodoAction::SubmitTitle { text } => Self::submit(state, text, env),

            TodoAction::ToggleTodo { id } => {
                if let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) {
                    todo.completed = !todo.completed;
                } else {
                    tracing::debug!(%id, "Toggle for unknown todo ignored");
                }
                SmallVec::new()
            },

            TodoAction::ToggleAll => {
                let completed = !state.all_completed();
                for todo in &mut state.todos {
                    todo.completed = completed;
                }
                SmallVec::new()
            },

            TodoAction::DeleteTodo { id } => {
                let before = state.todos.len();
                state.todos.retain(|t| t.id != id);
                if state.todos.len() == before {
                    tracing::debug!(%id, "Delete for unknown todo ignored");
                }
                SmallVec::new()
            },

            TodoAction::ClearCompleted => {
                state.todos.retain(|t| !t.completed);
                SmallVec::new()
            },

            TodoAction::SetFilter { filter } => {
                if state.filter != filter {
                    tracing::debug!(%filter, "Filter changed");
                }
                state.filter = filter;
                SmallVec::new()
            },

            // ========== Notifications ==========
            TodoAction::DismissError => {
                state.error = None;
                smallvec![Effect::Cancel(ERROR_DISMISS)]
            },

            TodoAction::ErrorExpired { generation } => {
                if generation == state.error_generation {
                    state.error = None;
                } else {
                    tracing::trace!(generation, current = state.error_generation, "Stale dismiss timer ignored");
                }
                SmallVec::new()
            },
        }
    }
}

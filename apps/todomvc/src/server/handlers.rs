//! Page and intent handlers.
//!
//! - GET `/`, `/active`, `/completed` - select a filter and render the page
//! - POST `/todos` - add a todo from the `title` form field
//! - POST `/todos/:id/toggle`, `/todos/:id/delete` - per-item intents
//! - POST `/todos/toggle-all`, `/todos/clear-completed` - bulk intents
//! - POST `/error/dismiss` - hide the error notification
//! - GET `/api/state` - JSON snapshot of what the page shows
//!
//! Intent handlers answer `303 See Other` pointing back at the active filter.

use super::{AppError, AppState};
use crate::types::{Filter, TodoAction, TodoId, TodoItem, TodoState};
use crate::view;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, Redirect},
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// New-todo form submission.
#[derive(Debug, Deserialize)]
pub struct NewTodoForm {
    /// Raw text of the new-todo field
    #[serde(default)]
    pub title: String,
}

/// What the page currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Todos under the active filter, in list order
    pub todos: Vec<TodoItem>,
    /// Number of todos regardless of filter
    pub total: usize,
    /// Number of todos not yet completed
    pub remaining_count: usize,
    /// Whether the toggle-all control is active
    pub all_completed: bool,
    /// Active filter
    pub filter: Filter,
    /// Whether the initial fetch is outstanding
    pub loading: bool,
    /// Text of the error notification, if shown
    pub error: Option<String>,
}

impl From<&TodoState> for StateSnapshot {
    fn from(state: &TodoState) -> Self {
        Self {
            todos: state.visible_todos().into_iter().cloned().collect(),
            total: state.count(),
            remaining_count: state.remaining_count(),
            all_completed: state.all_completed(),
            filter: state.filter,
            loading: state.loading,
            error: state.error.map(|e| e.text().to_string()),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn show(state: &AppState, filter: Filter) -> Result<Html<String>, AppError> {
    let (_, page) = state
        .store
        .send_and_inspect(TodoAction::SetFilter { filter }, view::render_page)
        .await?;
    Ok(Html(page))
}

/// Apply `action` and redirect to the filter in effect right after it
async fn apply(state: &AppState, action: TodoAction) -> Result<Redirect, AppError> {
    let (_, path) = state
        .store
        .send_and_inspect(action, |s| s.filter.path())
        .await?;
    Ok(Redirect::to(path))
}

/// Page with every todo.
pub async fn show_all(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    show(&state, Filter::All).await
}

/// Page with todos not yet completed.
pub async fn show_active(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    show(&state, Filter::Active).await
}

/// Page with completed todos.
pub async fn show_completed(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    show(&state, Filter::Completed).await
}

/// Add a todo. A blank title raises the empty-title notification instead.
pub async fn add_todo(
    State(state): State<AppState>,
    Form(form): Form<NewTodoForm>,
) -> Result<Redirect, AppError> {
    apply(&state, TodoAction::SubmitTitle { text: form.title }).await
}

/// Flip one todo's completion flag.
pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    apply(&state, TodoAction::ToggleTodo { id: TodoId::new(id) }).await
}

/// Remove one todo.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    apply(&state, TodoAction::DeleteTodo { id: TodoId::new(id) }).await
}

/// Complete everything, or reopen everything if all are completed.
pub async fn toggle_all(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply(&state, TodoAction::ToggleAll).await
}

/// Remove every completed todo.
pub async fn clear_completed(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply(&state, TodoAction::ClearCompleted).await
}

/// Hide the error notification.
pub async fn dismiss_error(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply(&state, TodoAction::DismissError).await
}

/// JSON view of the page.
pub async fn snapshot(State(state): State<AppState>) -> Json<StateSnapshot> {
    Json(state.store.state(|s| StateSnapshot::from(s)).await)
}

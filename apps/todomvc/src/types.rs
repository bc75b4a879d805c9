//! Domain types for the to-do list.
//!
//! A to-do list is an ordered collection of items that can be added,
//! toggled, removed and filtered. All of it lives in memory: nothing is
//! written back to the remote source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a todo item
///
/// Server-assigned for loaded items, drawn from an `IdGenerator` for items
/// added in the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
///
/// Matches the record shape returned by the todos endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Title of the todo
    pub title: String,
    /// Whether the todo is completed
    pub completed: bool,
    /// Owner of the todo
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl TodoItem {
    /// Creates a new, not yet completed todo item
    #[must_use]
    pub fn new(id: TodoId, title: impl Into<String>, user_id: u64) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            user_id,
        }
    }

    /// Returns a copy with the given completion flag
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Which todos are shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Todos not yet completed
    Active,
    /// Completed todos
    Completed,
}

impl Filter {
    /// All filters in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether `item` is shown under this filter
    #[must_use]
    pub const fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }

    /// Page path that selects this filter
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::All => "/",
            Self::Active => "/active",
            Self::Completed => "/completed",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        })
    }
}

/// User-facing error notifications
///
/// Only one is shown at a time; raising a new one replaces the old.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMessage {
    /// The initial fetch failed
    LoadFailed,
    /// A blank title was submitted
    EmptyTitle,
}

impl ErrorMessage {
    /// Text shown in the notification panel
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::LoadFailed => "Unable to load todos",
            Self::EmptyTitle => "Title should not be empty",
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Items shown under `filter`, in list order
#[must_use]
pub fn filter_todos(todos: &[TodoItem], filter: Filter) -> Vec<&TodoItem> {
    todos.iter().filter(|todo| filter.matches(todo)).collect()
}

/// State of the to-do view
///
/// Owns the authoritative list plus the transient UI state around it.
/// Derived values (`visible_todos`, `remaining_count`, `all_completed`) are
/// recomputed on every call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// All todos in insertion order
    pub todos: Vec<TodoItem>,
    /// Active filter
    pub filter: Filter,
    /// Current text of the new-todo field
    pub draft: String,
    /// True while the initial fetch is outstanding
    pub loading: bool,
    /// Currently shown error notification
    pub error: Option<ErrorMessage>,
    /// Bumped every time an error is raised; auto-dismiss timers carry it
    pub error_generation: u64,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state holding `todos`
    #[must_use]
    pub fn with_todos(todos: Vec<TodoItem>) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns true if there are no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Number of todos not yet completed
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// Number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// True only for a non-empty list where every todo is completed
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    /// Todos shown under the active filter
    #[must_use]
    pub fn visible_todos(&self) -> Vec<&TodoItem> {
        filter_todos(&self.todos, self.filter)
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }
}

/// Actions for the to-do view
///
/// User intents are handled synchronously. `TodosLoaded`, `TodosLoadFailed`
/// and `ErrorExpired` are produced by effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Start the initial fetch
    LoadTodos,
    /// The fetch succeeded
    TodosLoaded {
        /// Records returned by the source, in order
        todos: Vec<TodoItem>,
    },
    /// The fetch failed
    TodosLoadFailed {
        /// Why it failed (logged, not shown)
        reason: String,
    },
    /// The new-todo field changed
    DraftChanged {
        /// Full text of the field
        text: String,
    },
    /// The new-todo field was confirmed
    SubmitDraft,
    /// Add a todo from `text` in one step (form submission)
    ///
    /// Blank text leaves `text` in the field and raises the empty-title error.
    SubmitTitle {
        /// Raw text of the field, untrimmed
        text: String,
    },
    /// Flip one todo's completion flag
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },
    /// Complete everything, or reopen everything if all are completed
    ToggleAll,
    /// Remove one todo
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },
    /// Remove every completed todo
    ClearCompleted,
    /// Change the active filter
    SetFilter {
        /// New filter
        filter: Filter,
    },
    /// Hide the error notification now
    DismissError,
    /// Auto-dismiss timer fired
    ErrorExpired {
        /// Generation of the error the timer was started for
        generation: u64,
    },
}

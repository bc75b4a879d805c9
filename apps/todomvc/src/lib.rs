//! Single-page to-do list.
//!
//! Loads a user's todos once from a remote endpoint, then lets the visitor
//! add, toggle, delete, filter and clear them. Every change is local to the
//! running process; nothing is written back.
//!
//! - Simple domain model ([`types`])
//! - All behavior in one reducer ([`reducer`])
//! - The remote collection behind a trait ([`source`])
//! - Server-rendered page with stable `data-cy` hooks ([`view`], [`server`])
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todomvc::{HttpTodosSource, TodoAction, TodoEnvironment, TodoReducer, TodoState};
//! use todomvc_core::environment::MonotonicIds;
//! use todomvc_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::new(
//!     Arc::new(HttpTodosSource::new("https://mate.academy/students-api")),
//!     Arc::new(MonotonicIds::default()),
//!     1,
//! );
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! store.send(TodoAction::LoadTodos).await?;
//! store.send(TodoAction::SubmitTitle { text: "Buy milk".into() }).await?;
//!
//! let remaining = store.state(TodoState::remaining_count).await;
//! println!("{remaining} left");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod reducer;
pub mod server;
pub mod source;
pub mod types;
pub mod view;

use todomvc_runtime::Store;

// Re-export commonly used types
pub use config::Config;
pub use reducer::{ERROR_DISMISS, LOAD_TODOS, TodoEnvironment, TodoReducer};
pub use source::{HttpTodosSource, SourceError, TodosSource};
pub use types::{ErrorMessage, Filter, TodoAction, TodoId, TodoItem, TodoState};

/// Store running the to-do reducer
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

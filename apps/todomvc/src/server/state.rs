//! Application state for the HTTP server.

use crate::TodoStore;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the store itself is reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// The single to-do store behind the page
    pub store: TodoStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(store: TodoStore) -> Self {
        Self { store }
    }
}

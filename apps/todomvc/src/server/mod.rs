//! HTTP shell around the to-do store.
//!
//! Handlers translate requests into [`TodoAction`](crate::types::TodoAction)s,
//! send them through the store, and render the resulting state.

pub mod error;
pub mod handlers;
pub mod health;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;

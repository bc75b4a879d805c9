//! Router configuration for the to-do server.

use super::handlers;
use super::health::health_check;
use super::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Page routes mirror the filter paths (`/`, `/active`, `/completed`); every
/// mutation is a form POST.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(handlers::show_all))
        .route("/active", get(handlers::show_active))
        .route("/completed", get(handlers::show_completed))
        // Intents
        .route("/todos", post(handlers::add_todo))
        .route("/todos/toggle-all", post(handlers::toggle_all))
        .route("/todos/clear-completed", post(handlers::clear_completed))
        .route("/todos/:id/toggle", post(handlers::toggle_todo))
        .route("/todos/:id/delete", post(handlers::delete_todo))
        .route("/error/dismiss", post(handlers::dismiss_error))
        // Machine-readable view and liveness
        .route("/api/state", get(handlers::snapshot))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

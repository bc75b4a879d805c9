//! Liveness endpoint.

use super::AppState;
use axum::{Json, extract::State};
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Effects still running in the store (fetch, dismiss timer)
    pub pending_effects: usize,
}

/// Report liveness. The todos source is not contacted.
///
/// ```bash
/// curl http://localhost:3000/health
/// # {"status":"ok","version":"0.1.0","pending_effects":0}
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        pending_effects: state.store.pending_effects(),
    })
}

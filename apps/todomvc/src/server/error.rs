//! HTTP mapping of store failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use todomvc_runtime::StoreError;

/// Why a handler could not complete.
#[derive(Debug, Error)]
pub enum AppError {
    /// The store stopped accepting actions
    #[error("server is shutting down")]
    ShuttingDown,

    /// Any other store failure
    #[error("store failure: {0}")]
    Store(StoreError),
}

impl AppError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ShuttingDown => "SHUTTING_DOWN",
            Self::Store(_) => "STORE_FAILURE",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ShutdownInProgress => Self::ShuttingDown,
            other => Self::Store(other),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::ShuttingDown => tracing::info!("Rejected request during shutdown"),
            Self::Store(error) => tracing::error!(%error, "Request failed"),
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

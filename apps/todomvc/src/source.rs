//! Remote source of the initial todo collection.
//!
//! The source is read once at startup. Nothing is ever written back.

use crate::types::TodoItem;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Errors that can occur while fetching todos
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Endpoint answered with a non-success status
    #[error("Todos endpoint returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}

/// Read-only collection of todos for one user
#[async_trait]
pub trait TodosSource: Send + Sync {
    /// Fetch every todo owned by `user_id`, in server order
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the collection could not be retrieved.
    async fn fetch_todos(&self, user_id: u64) -> Result<Vec<TodoItem>, SourceError>;
}

/// Todos over HTTP: `GET {base_url}/todos?userId={user_id}`
#[derive(Clone, Debug)]
pub struct HttpTodosSource {
    client: Client,
    base_url: String,
}

impl HttpTodosSource {
    /// Create a source rooted at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a source using an existing client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Endpoint queried for the collection
    #[must_use]
    pub fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }
}

#[async_trait]
impl TodosSource for HttpTodosSource {
    async fn fetch_todos(&self, user_id: u64) -> Result<Vec<TodoItem>, SourceError> {
        let response = self
            .client
            .get(self.todos_url())
            .query(&[("userId", user_id)])
            .send()
            .await
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<TodoItem>>()
            .await
            .map_err(|e| SourceError::ResponseParseFailed(e.to_string()))
    }
}

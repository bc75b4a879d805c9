//! Stub todos sources and store builders shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use todomvc::{SourceError, TodoEnvironment, TodoId, TodoItem, TodoReducer, TodoState, TodoStore, TodosSource};
use todomvc_runtime::Store;
use todomvc_testing::SequentialIds;

pub const USER_ID: u64 = 7;

/// Returns a fixed collection
pub struct StaticSource(pub Vec<TodoItem>);

#[async_trait]
impl TodosSource for StaticSource {
    async fn fetch_todos(&self, _user_id: u64) -> Result<Vec<TodoItem>, SourceError> {
        Ok(self.0.clone())
    }
}

/// Always fails
pub struct FailingSource;

#[async_trait]
impl TodosSource for FailingSource {
    async fn fetch_todos(&self, _user_id: u64) -> Result<Vec<TodoItem>, SourceError> {
        Err(SourceError::Status { status: 500 })
    }
}

/// Never answers
pub struct HangingSource;

#[async_trait]
impl TodosSource for HangingSource {
    async fn fetch_todos(&self, _user_id: u64) -> Result<Vec<TodoItem>, SourceError> {
        std::future::pending().await
    }
}

pub fn item(id: u64, title: &str, completed: bool) -> TodoItem {
    TodoItem::new(TodoId::new(id), title, USER_ID).with_completed(completed)
}

/// A (pending) and B (completed)
pub fn two_items() -> Vec<TodoItem> {
    vec![item(1, "A", false), item(2, "B", true)]
}

pub fn store_with(source: impl TodosSource + 'static) -> TodoStore {
    let env = TodoEnvironment::new(Arc::new(source), Arc::new(SequentialIds::starting_at(1_000)), USER_ID)
        .with_error_timeout(Duration::from_secs(3));
    Store::new(TodoState::new(), TodoReducer::new(), env)
}

/// Let spawned effect tasks run
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

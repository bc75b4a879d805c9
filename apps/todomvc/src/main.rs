//! To-do server.
//!
//! Starts the store, kicks off the initial fetch, and serves the page.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use todomvc::server::{AppState, build_router};
use todomvc::{Config, HttpTodosSource, TodoAction, TodoEnvironment, TodoReducer, TodoState};
use todomvc_core::environment::MonotonicIds;
use todomvc_runtime::Store;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todomvc=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        api_url = %config.api_url,
        user_id = config.user_id,
        bind_addr = %config.bind_addr,
        "Starting to-do server"
    );

    let env = TodoEnvironment::new(
        Arc::new(HttpTodosSource::new(config.api_url.clone())),
        Arc::new(MonotonicIds::default()),
        config.user_id,
    )
    .with_error_timeout(config.error_timeout());
    let store = Store::new(TodoState::new(), TodoReducer::new(), env);

    store.send(TodoAction::LoadTodos).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, build_router(AppState::new(store.clone())))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.shutdown(Duration::from_secs(5)).await?;
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
    }
}

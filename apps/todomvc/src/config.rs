//! Configuration management for the to-do server.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default todos endpoint root
pub const DEFAULT_API_URL: &str = "https://mate.academy/students-api";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the todos endpoint (`TODOS_API_URL`)
    pub api_url: String,
    /// Owner whose todos are loaded (`TODOS_USER_ID`)
    pub user_id: u64,
    /// Address the HTTP server binds to (`BIND_ADDR`)
    pub bind_addr: String,
    /// Error auto-dismiss delay in milliseconds (`ERROR_DISMISS_MS`)
    pub error_dismiss_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: 1,
            bind_addr: "127.0.0.1:3000".to_string(),
            error_dismiss_ms: 3_000,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Missing or unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_url: lookup("TODOS_API_URL").unwrap_or(defaults.api_url),
            user_id: lookup("TODOS_USER_ID")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.user_id),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            error_dismiss_ms: lookup("ERROR_DISMISS_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.error_dismiss_ms),
        }
    }

    /// Error auto-dismiss delay
    #[must_use]
    pub const fn error_timeout(&self) -> Duration {
        Duration::from_millis(self.error_dismiss_ms)
    }
}

//! # TodoMVC Testing
//!
//! Testing utilities and helpers for the TodoMVC reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - Given-When-Then reducer tests ([`ReducerTest`])
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todomvc_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::ToggleAll)
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use todomvc_core::environment::{Clock, IdGenerator};

pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todomvc_testing::mocks::FixedClock;
    /// use todomvc_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable ids: `start`, `start + 1`, `start + 2`, ...
    ///
    /// ```
    /// use todomvc_testing::mocks::SequentialIds;
    /// use todomvc_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIds::starting_at(100);
    /// assert_eq!(ids.next_id(), 100);
    /// assert_eq!(ids.next_id(), 101);
    /// ```
    #[derive(Debug)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Ids starting at `start`
        #[must_use]
        pub const fn starting_at(start: u64) -> Self {
            Self {
                next: AtomicU64::new(start),
            }
        }
    }

    impl Default for SequentialIds {
        fn default() -> Self {
            Self::starting_at(1)
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::SeqCst)
        }
    }

    /// Always returns the same id
    ///
    /// Models a timestamp generator called twice within one clock tick.
    #[derive(Debug, Clone, Copy)]
    pub struct RepeatingIds(pub u64);

    impl IdGenerator for RepeatingIds {
        fn next_id(&self) -> u64 {
            self.0
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, RepeatingIds, SequentialIds, test_clock};
pub use reducer_test::{ReducerTest, assertions};

//! # TodoMVC Core
//!
//! A feature is a state type, an action enum covering user intents and effect
//! results, and a [`Reducer`](reducer::Reducer) that applies one action to the
//! state. The reducer never performs I/O itself. It returns
//! [`Effect`](effect::Effect) values, and a runtime carries them out.
//! Clocks and id sources reach the reducer through its environment
//! ([`environment`]).
//!
//! ## Example
//!
//! ```
//! use todomvc_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// The [`Reducer`](reducer::Reducer) trait
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Applies actions to a state
    pub trait Reducer {
        /// State owned by the store
        type State;

        /// Inputs: user intents and effect results alike
        type Action;

        /// Dependencies handed to every call
        type Environment;

        /// Apply `action` to `state` in place and describe the follow-up work.
        ///
        /// Must not block or perform I/O. Most actions return no effects,
        /// which the inline capacity serves without allocating.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Work a reducer asks the runtime to do
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier used to cancel an in-flight effect
    ///
    /// Two effects started under the same id are never in flight at the same
    /// time: starting the second one aborts the first.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Creates a new effect id
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// Returns the name of this id
        #[must_use]
        pub const fn as_str(&self) -> &'static str {
            self.0
        }
    }

    impl fmt::Display for EffectId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    /// A description of work. Nothing runs until a runtime executes it, and
    /// any `Action` it yields is fed back to the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, auto-dismiss)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Sent once the delay elapses
            action: Box<Action>,
        },

        /// Async work; `Some(action)` is sent back to the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Effect that can be aborted by id
        ///
        /// If an effect with the same id is already in flight, the runtime
        /// aborts it before starting this one.
        Cancellable {
            /// Cancellation key
            id: EffectId,
            /// The wrapped effect
            effect: Box<Effect<Action>>,
        },

        /// Abort the in-flight effect with this id (no-op if none)
        Cancel(EffectId),
    }

    // Futures have no Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Run all of `effects` concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Run `effects` one after another
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Dispatch `action` after `duration`
        #[must_use]
        pub fn delay(duration: Duration, action: Action) -> Effect<Action> {
            Effect::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// Make this effect cancellable under `id`
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Returns true if this is `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Injected sources of time and identity
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Source of the current time
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of numeric identifiers for client-created entities
    pub trait IdGenerator: Send + Sync {
        /// Returns the next identifier
        fn next_id(&self) -> u64;
    }

    /// Timestamp-seeded identifiers that never repeat within a process
    ///
    /// Each id is the current time in milliseconds, unless that would not be
    /// greater than the previous id, in which case it is the previous id + 1.
    pub struct MonotonicIds {
        clock: Arc<dyn Clock>,
        last: AtomicU64,
    }

    impl MonotonicIds {
        /// Creates a generator reading time from `clock`
        #[must_use]
        pub fn new(clock: Arc<dyn Clock>) -> Self {
            Self {
                clock,
                last: AtomicU64::new(0),
            }
        }
    }

    impl Default for MonotonicIds {
        fn default() -> Self {
            Self::new(Arc::new(SystemClock))
        }
    }

    impl std::fmt::Debug for MonotonicIds {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MonotonicIds")
                .field("last", &self.last.load(Ordering::Relaxed))
                .finish_non_exhaustive()
        }
    }

    impl IdGenerator for MonotonicIds {
        fn next_id(&self) -> u64 {
            let now = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);

            let previous = self
                .last
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                    Some(now.max(last.saturating_add(1)))
                })
                .unwrap_or_else(|last| last);

            now.max(previous.saturating_add(1))
        }
    }
}

//! # TodoMVC Runtime
//!
//! The [`Store`] owns a reducer's state and turns the effects it returns
//! into tokio tasks. Actions those tasks produce go back through the reducer.
//!
//! Effects wrapped in `Effect::Cancellable` are tracked by [`EffectId`]. Starting
//! another effect under a live id aborts the running one, and `Effect::Cancel`
//! aborts it outright.
//!
//! ```ignore
//! use todomvc_runtime::Store;
//!
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! store.send(TodoAction::LoadTodos).await?.wait().await;
//! let left = store.state(TodoState::remaining_count).await;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use todomvc_core::effect::{Effect, EffectId};
use todomvc_core::reducer::Reducer;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Store failures
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// `send` after `shutdown` began
        #[error("store is shutting down")]
        ShutdownInProgress,

        /// `shutdown` gave up with this many effects still running
        #[error("shutdown timed out, {0} effects still running")]
        ShutdownTimeout(usize),

        /// No matching action arrived within the timeout, or effects did not
        /// finish in time
        #[error("timed out")]
        Timeout,

        /// Every action sender is gone
        #[error("action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action. Cancelled effects count as complete.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle and the tracking context that feeds it
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Returns true once every tracked effect has finished
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.effects.load(Ordering::SeqCst) == 0
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Runs on normal completion, on panic, and when the task is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: one registered cancellable effect
struct InFlight {
    generation: u64,
    abort: AbortHandle,
}

/// Internal: cancellable effects currently running, keyed by id
#[derive(Default)]
struct Cancellations {
    next_generation: AtomicU64,
    tasks: Mutex<HashMap<EffectId, InFlight>>,
}

impl Cancellations {
    fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst)
    }

    /// Register a task under `id`, returning the task it displaced
    fn register(&self, id: EffectId, generation: u64, abort: AbortHandle) -> Option<AbortHandle> {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks
            .insert(id, InFlight { generation, abort })
            .map(|previous| previous.abort)
    }

    /// Forget `id` if it still belongs to `generation`
    fn release(&self, id: EffectId, generation: u64) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if tasks.get(&id).is_some_and(|entry| entry.generation == generation) {
            tasks.remove(&id);
        }
    }

    fn take(&self, id: EffectId) -> Option<AbortHandle> {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.remove(&id).map(|entry| entry.abort)
    }

    fn take_all(&self) -> Vec<(EffectId, AbortHandle)> {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.drain().map(|(id, entry)| (id, entry.abort)).collect()
    }

    fn is_running(&self, id: EffectId) -> bool {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.get(&id).is_some_and(|entry| !entry.abort.is_finished())
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, Cancellations, DecrementGuard,
        Duration, Effect, EffectHandle, EffectId, EffectTracking, Ordering, Reducer, RwLock,
        StoreError,
    };
    use std::future::Future;
    use std::pin::Pin;
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        cancellations: Arc<Cancellations>,
        /// Every action produced by an effect is broadcast here before it is
        /// fed back into the reducer.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Store with the default broadcast capacity of 16 actions. See
        /// [`Store::with_broadcast_capacity`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Store whose action broadcast keeps `capacity` unread actions
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellations: Arc::new(Cancellations::default()),
                action_broadcast,
            }
        }

        /// Reduce `action` under the write lock, then start its effects.
        ///
        /// Returns once the effects are spawned. The [`EffectHandle`] resolves
        /// when they finish, cancelled ones included.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            self.dispatch(action, |_| ()).await.map(|(handle, ())| handle)
        }

        /// Like [`send`](Self::send), but also reads the state the action
        /// produced before the write lock is released.
        ///
        /// No other action can be reduced between the two, so `inspect` sees
        /// exactly this action's result.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action, inspect), name = "store_send")]
        pub async fn send_and_inspect<F, T>(&self, action: A, inspect: F) -> Result<(EffectHandle, T), StoreError>
        where
            F: FnOnce(&S) -> T + Send,
        {
            self.dispatch(action, inspect).await
        }

        async fn dispatch<F, T>(&self, action: A, inspect: F) -> Result<(EffectHandle, T), StoreError>
        where
            F: FnOnce(&S) -> T + Send,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Store shutting down, action rejected");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.processed").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let (effects, inspected) = {
                let mut state = self.state.write().await;
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                (effects, inspect(&*state))
            };

            tracing::trace!(count = effects.len(), "Starting effects");
            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok((handle, inspected))
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, so a result
        /// produced immediately by an effect cannot be missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, {} actions skipped", skipped);
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Actions sent directly via `send` are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Returns true while a cancellable effect with `id` is running
        #[must_use]
        pub fn in_flight(&self, id: EffectId) -> bool {
            self.cancellations.is_running(id)
        }

        /// Number of effects currently executing
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Abort every in-flight cancellable effect
        pub fn cancel_all(&self) {
            for (id, abort) in self.cancellations.take_all() {
                tracing::debug!(effect_id = %id, "Cancelling effect");
                metrics::counter!("store.effects.cancelled").increment(1);
                abort.abort();
            }
        }

        /// Initiate graceful shutdown
        ///
        /// Rejects new actions, aborts cancellable effects (their results are
        /// no longer wanted once the owner is torn down), then waits for the
        /// remaining effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Store shutting down");
            self.shutdown.store(true, Ordering::Release);
            self.cancel_all();

            let start = tokio::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("Store drained");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        fn cancel(&self, id: EffectId) {
            if let Some(abort) = self.cancellations.take(id) {
                tracing::debug!(effect_id = %id, "Cancelling effect");
                metrics::counter!("store.effects.cancelled").increment(1);
                abort.abort();
            } else {
                tracing::trace!(effect_id = %id, "Cancel requested for effect that is not in flight");
            }
        }

        /// Start an effect
        ///
        /// - `None`: No-op
        /// - `Cancel`: Aborts the registered effect immediately
        /// - `Parallel`: Starts each child independently
        /// - `Cancellable`: Spawns the inner effect and registers it, aborting
        ///   any previous effect with the same id
        /// - `Future`, `Delay`, `Sequential`: Spawned onto the tokio runtime
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Cancel(id) => {
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                    self.cancel(id);
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Cancellable { id, effect } => {
                    tracing::trace!(effect_id = %id, "Executing Effect::Cancellable");
                    metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);

                    let generation = self.cancellations.next_generation();
                    let store = self.clone();
                    let task = self.spawn_tracked(tracking, async move {
                        store.run_effect(*effect).await;
                        store.cancellations.release(id, generation);
                    });

                    if let Some(previous) = self.cancellations.register(id, generation, task) {
                        tracing::debug!(effect_id = %id, "Replacing in-flight effect");
                        metrics::counter!("store.effects.cancelled").increment(1);
                        previous.abort();
                    }
                },
                effect => {
                    let store = self.clone();
                    let _ = self.spawn_tracked(tracking, async move {
                        store.run_effect(effect).await;
                    });
                },
            }
        }

        /// Spawn a task counted by both the caller's handle and shutdown tracking
        fn spawn_tracked<F>(&self, tracking: &EffectTracking, task: F) -> tokio::task::AbortHandle
        where
            F: Future<Output = ()> + Send + 'static,
        {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);

            let guard = DecrementGuard(tracking.clone());
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;
                task.await;
            })
            .abort_handle()
        }

        /// Run an effect to completion inside the current task
        fn run_effect(&self, effect: Effect<A>) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                        if let Some(action) = fut.await {
                            tracing::trace!("Future resolved with an action");
                            self.feed_back(action).await;
                        } else {
                            tracing::trace!("Future resolved without an action");
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tracing::trace!(?duration, "Delay started");
                        metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                        tokio::time::sleep(duration).await;
                        self.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        futures::future::join_all(effects.into_iter().map(|effect| self.run_effect(effect)))
                            .await;
                    },
                    Effect::Sequential(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                        for effect in effects {
                            self.run_effect(effect).await;
                        }
                    },
                    nested @ (Effect::Cancellable { .. } | Effect::Cancel(_)) => {
                        // Registered effects outlive the task that started them
                        let (_, tracking) = EffectHandle::new();
                        self.execute_effect(nested, &tracking);
                    },
                }
            })
        }

        async fn feed_back(&self, action: A) {
            let _ = self.action_broadcast.send(action.clone());

            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Dropped action produced by effect");
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellations: Arc::clone(&self.cancellations),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todomvc_core::{SmallVec, smallvec};

    const TICKER: EffectId = EffectId::new("ticker");

    #[derive(Clone, Debug, Default)]
    struct TestState {
        value: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Increment,
        ProduceIncrement,
        DelayedIncrement(Duration),
        CancellableIncrement(Duration),
        CancelIncrement,
        SequenceOfIncrements,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TestState,
            action: TestAction,
            _env: &(),
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    SmallVec::new()
                },
                TestAction::ProduceIncrement => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::DelayedIncrement(duration) => {
                    smallvec![Effect::delay(duration, TestAction::Increment)]
                },
                TestAction::CancellableIncrement(duration) => {
                    smallvec![Effect::delay(duration, TestAction::Increment).cancellable(TICKER)]
                },
                TestAction::CancelIncrement => smallvec![Effect::Cancel(TICKER)],
                TestAction::SequenceOfIncrements => smallvec![Effect::chain(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                ])],
            }
        }
    }

    fn store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::new(TestState::default(), TestReducer, ())
    }

    #[tokio::test]
    async fn future_effect_feeds_action_back() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceIncrement).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn sequential_effects_all_run() {
        let store = store();

        let mut handle = store.send(TestAction::SequenceOfIncrements).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_fires_after_duration() {
        let store = store();

        let mut handle = store
            .send(TestAction::DelayedIncrement(Duration::from_secs(3)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(2_999)).await;
        assert_eq!(store.state(|s| s.value).await, 0);

        handle.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_a_cancellable_effect_aborts_the_previous_one() {
        let store = store();

        let _ = store
            .send(TestAction::CancellableIncrement(Duration::from_secs(3)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let mut second = store
            .send(TestAction::CancellableIncrement(Duration::from_secs(3)))
            .await
            .unwrap();

        // The first timer would have fired at t=3s
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(store.state(|s| s.value).await, 0);

        second.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
        assert!(!store.in_flight(TICKER));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_in_flight_effect() {
        let store = store();

        let mut handle = store
            .send(TestAction::CancellableIncrement(Duration::from_secs(3)))
            .await
            .unwrap();
        tokio::task::yield_now().await;
        assert!(store.in_flight(TICKER));

        store.send(TestAction::CancelIncrement).await.unwrap();
        handle.wait().await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.state(|s| s.value).await, 0);
        assert!(!store.in_flight(TICKER));
    }

    #[tokio::test]
    async fn cancel_without_in_flight_effect_is_a_no_op() {
        let store = store();

        let handle = store.send(TestAction::CancelIncrement).await.unwrap();

        assert!(handle.is_complete());
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn send_and_wait_for_returns_effect_result() {
        let store = store();

        let result = store
            .send_and_wait_for(
                TestAction::ProduceIncrement,
                |a| matches!(a, TestAction::Increment),
                Duration::from_secs(1),
            )
            .await
            .unwrap();

        assert_eq!(result, TestAction::Increment);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_timers_and_rejects_new_actions() {
        let store = store();

        let _ = store
            .send(TestAction::CancellableIncrement(Duration::from_secs(3)))
            .await
            .unwrap();

        tokio_test::assert_ok!(store.shutdown(Duration::from_secs(1)).await);

        assert_eq!(store.pending_effects(), 0);
        assert!(matches!(
            store.send(TestAction::Increment).await,
            Err(StoreError::ShutdownInProgress)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn inspect_sees_only_its_own_action() {
        let store = store();

        let tasks: Vec<_> = (0..200)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .send_and_inspect(TestAction::Increment, |s| s.value)
                        .await
                        .map(|(_, value)| value)
                })
            })
            .collect();

        let mut seen = Vec::new();
        for task in tasks {
            seen.push(task.await.unwrap().unwrap());
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=200).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn inspect_is_rejected_after_shutdown() {
        let store = store();
        tokio_test::assert_ok!(store.shutdown(Duration::from_millis(10)).await);

        let result = store.send_and_inspect(TestAction::Increment, |s| s.value).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn completed_handle_does_not_block() {
        let mut handle = EffectHandle::completed();
        tokio_test::assert_ok!(handle.wait_with_timeout(Duration::from_millis(10)).await);
        assert!(handle.is_complete());
    }
}

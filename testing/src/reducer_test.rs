//! Given/when/then harness for reducers.
//!
//! The reducer runs synchronously; effects are collected, never executed.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use todomvc_core::{effect::Effect, reducer::Reducer};

type StateCheck<S> = Box<dyn FnOnce(&S)>;

type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Which step's effects an effect check looks at
enum Step {
    Last,
    Index(usize),
}

/// Builder that reduces a list of actions against a starting state.
///
/// State checks see the state after the final action. Effect checks see the
/// effects of the final action unless registered with
/// [`then_effects_of`](Self::then_effects_of).
///
/// ```ignore
/// ReducerTest::new(TodoReducer::new())
///     .with_env(env)
///     .given_state(TodoState::new())
///     .when_actions([
///         TodoAction::DraftChanged { text: "Buy milk".into() },
///         TodoAction::SubmitDraft,
///     ])
///     .then_state(|state| assert_eq!(state.count(), 1))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_checks: Vec<StateCheck<S>>,
    effect_checks: Vec<(Step, EffectCheck<A>)>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a test for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Environment handed to every `reduce` call
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Given
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// When: append one action
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// When: append actions, reduced in iteration order
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Then: check the final state
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Then: check the effects returned for the final action
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push((Step::Last, Box::new(check)));
        self
    }

    /// Then: check the effects returned for the action at `index`
    #[must_use]
    pub fn then_effects_of<F>(mut self, index: usize, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push((Step::Index(index), Box::new(check)));
        self
    }

    /// Reduce every action, run the checks, and hand back the final state.
    ///
    /// # Panics
    ///
    /// Panics when the state, environment or actions are missing, when an
    /// effect check names a step that was never reduced, or when a check fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) -> S {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let env = self
            .environment
            .expect("Environment must be set with with_env()");
        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let steps: Vec<Vec<Effect<A>>> = self
            .actions
            .into_iter()
            .map(|action| self.reducer.reduce(&mut state, action, &env).into_vec())
            .collect();

        for check in self.state_checks {
            check(&state);
        }

        for (step, check) in self.effect_checks {
            let index = match step {
                Step::Last => steps.len() - 1,
                Step::Index(index) => index,
            };
            let effects = steps
                .get(index)
                .unwrap_or_else(|| panic!("No step {index}: only {} actions reduced", steps.len()));
            check(effects);
        }

        state
    }
}

/// Effect checks for use with [`ReducerTest::then_effects`]
pub mod assertions {
    use std::time::Duration;
    use todomvc_core::effect::{Effect, EffectId};

    /// Every effect is `Effect::None` (or there are none)
    ///
    /// # Panics
    ///
    /// Panics if any effect does work.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, got {effects:?}"
        );
    }

    /// # Panics
    ///
    /// Panics if `effects.len() != expected`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "Unexpected number of effects");
    }

    /// # Panics
    ///
    /// Panics if no top-level `Effect::Future` is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected a Future effect"
        );
    }

    /// Some effect is registered under cancellation key `id`
    ///
    /// # Panics
    ///
    /// Panics if no `Cancellable` with that id is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_cancellable<A>(effects: &[Effect<A>], id: EffectId) {
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Cancellable { id: found, .. } if *found == id)),
            "Expected an effect registered as {id}"
        );
    }

    /// # Panics
    ///
    /// Panics if no `Effect::Cancel(id)` is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_cancels<A>(effects: &[Effect<A>], id: EffectId) {
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Cancel(found) if *found == id)),
            "Expected Effect::Cancel({id})"
        );
    }

    /// First delayed action among `effects`, looking through `Cancellable`
    /// wrappers and combinators.
    #[must_use]
    pub fn scheduled<A>(effects: &[Effect<A>]) -> Option<(Duration, &A)> {
        effects.iter().find_map(|effect| match effect {
            Effect::Delay { duration, action } => Some((*duration, action.as_ref())),
            Effect::Cancellable { effect, .. } => scheduled(std::slice::from_ref(effect.as_ref())),
            Effect::Parallel(inner) | Effect::Sequential(inner) => scheduled(inner),
            _ => None,
        })
    }

    /// `action` is scheduled to fire after `duration`
    ///
    /// # Panics
    ///
    /// Panics if nothing is scheduled, or if the delay or action differ.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_schedules<A>(effects: &[Effect<A>], duration: Duration, action: &A)
    where
        A: PartialEq + std::fmt::Debug,
    {
        let Some((found_duration, found_action)) = scheduled(effects) else {
            panic!("Expected {action:?} scheduled after {duration:?}, nothing scheduled");
        };
        assert_eq!(found_duration, duration, "Scheduled with the wrong delay");
        assert_eq!(found_action, action, "Scheduled the wrong action");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use todomvc_core::effect::{Effect, EffectId};
    use todomvc_core::reducer::Reducer;
    use todomvc_core::{SmallVec, smallvec};

    const NOTICE: EffectId = EffectId::new("notice");

    #[derive(Clone, Debug, Default)]
    struct Banner {
        text: Option<&'static str>,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum BannerAction {
        Show(&'static str),
        Hide,
        Expired,
    }

    struct BannerReducer;

    impl Reducer for BannerReducer {
        type State = Banner;
        type Action = BannerAction;
        type Environment = Duration;

        fn reduce(
            &self,
            state: &mut Banner,
            action: BannerAction,
            timeout: &Duration,
        ) -> SmallVec<[Effect<BannerAction>; 4]> {
            match action {
                BannerAction::Show(text) => {
                    state.text = Some(text);
                    smallvec![Effect::delay(*timeout, BannerAction::Expired).cancellable(NOTICE)]
                },
                BannerAction::Hide => {
                    state.text = None;
                    smallvec![Effect::Cancel(NOTICE)]
                },
                BannerAction::Expired => {
                    state.text = None;
                    SmallVec::new()
                },
            }
        }
    }

    fn banner_test() -> ReducerTest<BannerReducer, Banner, BannerAction, Duration> {
        ReducerTest::new(BannerReducer)
            .with_env(Duration::from_secs(3))
            .given_state(Banner::default())
    }

    #[test]
    fn show_schedules_expiry() {
        banner_test()
            .when_action(BannerAction::Show("saved"))
            .then_state(|state| assert_eq!(state.text, Some("saved")))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_cancellable(effects, NOTICE);
                assertions::assert_schedules(effects, Duration::from_secs(3), &BannerAction::Expired);
            })
            .run();
    }

    #[test]
    fn effect_checks_can_target_earlier_steps() {
        let state = banner_test()
            .when_actions([BannerAction::Show("saved"), BannerAction::Hide])
            .then_effects_of(0, |effects| assertions::assert_has_cancellable(effects, NOTICE))
            .then_effects(|effects| assertions::assert_cancels(effects, NOTICE))
            .run();

        assert_eq!(state.text, None);
    }

    #[test]
    fn expiry_has_no_effects() {
        banner_test()
            .when_action(BannerAction::Expired)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn scheduled_is_none_without_delay() {
        assert!(assertions::scheduled::<BannerAction>(&[Effect::Cancel(NOTICE), Effect::None]).is_none());
    }

    #[test]
    fn scheduled_looks_inside_combinators() {
        let effects = [Effect::chain(vec![
            Effect::None,
            Effect::delay(Duration::from_millis(5), BannerAction::Hide),
        ])];

        assert_eq!(
            assertions::scheduled(&effects),
            Some((Duration::from_millis(5), &BannerAction::Hide))
        );
    }

    #[test]
    #[should_panic(expected = "No step 4")]
    fn unknown_step_panics() {
        let _ = banner_test()
            .when_action(BannerAction::Hide)
            .then_effects_of(4, |_| {})
            .run();
    }
}

//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Run a child reducer on one field of a parent state,
//!   translating actions in both directions
//!
//! # Examples
//!
//! ## Scoping a child reducer
//!
//! ```
//! use faraway_admin_core::composition::scope_reducer;
//! use faraway_admin_core::{smallvec, Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! #[derive(Clone)]
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut CounterState, _action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     counter: CounterState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Counter(CounterAction),
//!     Other,
//! }
//!
//! fn counter(app: &mut AppState) -> &mut CounterState {
//!     &mut app.counter
//! }
//!
//! fn counter_action(action: AppAction) -> Option<CounterAction> {
//!     match action {
//!         AppAction::Counter(inner) => Some(inner),
//!         AppAction::Other => None,
//!     }
//! }
//!
//! let scoped = scope_reducer(CounterReducer, counter, counter_action, AppAction::Counter);
//!
//! let mut state = AppState::default();
//! let _ = scoped.reduce(&mut state, AppAction::Counter(CounterAction::Increment), &());
//! let _ = scoped.reduce(&mut state, AppAction::Other, &());
//! assert_eq!(state.counter.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::marker::PhantomData;
use std::sync::Arc;

/// A shareable, type-erased reducer.
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.iter().map(Arc::clone).collect(),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a child reducer to one field of a larger state.
///
/// - `state` projects the parent state onto the child's slot
/// - `extract` picks out the actions addressed to the child (others are ignored)
/// - `embed` lifts the child's result actions back into the parent action type
pub fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        _environment: PhantomData,
    }
}

/// A reducer focused on a subset of state and actions.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    _environment: PhantomData<fn(&E)>,
}

impl<S, SubS, A, SubA, E, R> Clone for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            extract: self.extract,
            embed: self.embed,
            _environment: PhantomData,
        }
    }
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    A: Send + 'static,
    SubA: Send + 'static,
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(sub_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let sub_state = (self.state)(state);
        self.reducer
            .reduce(sub_state, sub_action, env)
            .into_iter()
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;

    #[derive(Clone, Debug, Default)]
    struct AppState {
        count: i32,
        name: String,
        child: ChildState,
    }

    #[derive(Clone, Debug, Default)]
    struct ChildState {
        loads: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum AppAction {
        Increment,
        SetName(String),
        Child(ChildAction),
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ChildAction {
        Load,
        Loaded,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = AppState;
        type Action = AppAction;
        type Environment = ();

        fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
            if action == AppAction::Increment {
                state.count += 1;
            }
            smallvec![Effect::None]
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = AppState;
        type Action = AppAction;
        type Environment = ();

        fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
            if let AppAction::SetName(name) = action {
                state.name = name;
            }
            smallvec![Effect::None]
        }
    }

    #[derive(Clone)]
    struct ChildReducer;

    impl Reducer for ChildReducer {
        type State = ChildState;
        type Action = ChildAction;
        type Environment = ();

        fn reduce(&self, state: &mut ChildState, action: ChildAction, _env: &()) -> SmallVec<[Effect<ChildAction>; 4]> {
            match action {
                ChildAction::Load => {
                    smallvec![Effect::Future(Box::pin(async { Some(ChildAction::Loaded) }))]
                },
                ChildAction::Loaded => {
                    state.loads += 1;
                    SmallVec::new()
                },
            }
        }
    }

    fn child_scope() -> ScopedReducer<AppState, ChildState, AppAction, ChildAction, (), ChildReducer> {
        fn child(state: &mut AppState) -> &mut ChildState {
            &mut state.child
        }

        fn child_action(action: AppAction) -> Option<ChildAction> {
            match action {
                AppAction::Child(inner) => Some(inner),
                _ => None,
            }
        }

        scope_reducer(ChildReducer, child, child_action, AppAction::Child)
    }

    #[test]
    fn test_combine_runs_every_reducer() {
        let counter: SharedReducer<AppState, AppAction, ()> = Arc::new(CounterReducer);
        let name: SharedReducer<AppState, AppAction, ()> = Arc::new(NameReducer);
        let combined = combine_reducers(vec![counter, name]);

        let mut state = AppState::default();
        let effects = combined.reduce(&mut state, AppAction::Increment, &());
        assert_eq!(state.count, 1);
        assert_eq!(effects.len(), 2);

        let _ = combined.clone().reduce(&mut state, AppAction::SetName("tags".into()), &());
        assert_eq!(state.name, "tags");
        assert_eq!(state.count, 1);
    }

    #[test]
    fn test_scope_ignores_foreign_actions() {
        let scoped = child_scope();
        let mut state = AppState::default();

        let effects = scoped.reduce(&mut state, AppAction::Increment, &());
        assert!(effects.is_empty());
        assert_eq!(state.child.loads, 0);
    }

    #[tokio::test]
    async fn test_scope_embeds_child_effects() {
        let scoped = child_scope();
        let mut state = AppState::default();

        let mut effects = scoped.reduce(&mut state, AppAction::Child(ChildAction::Load), &());
        assert_eq!(effects.len(), 1);

        let Some(Effect::Future(fut)) = effects.pop() else {
            unreachable!("child load must produce a future");
        };
        let feedback = fut.await;
        assert_eq!(feedback, Some(AppAction::Child(ChildAction::Loaded)));

        let _ = scoped.reduce(&mut state, AppAction::Child(ChildAction::Loaded), &());
        assert_eq!(state.child.loads, 1);
    }
}

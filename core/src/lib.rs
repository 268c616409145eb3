//! # Faraway Admin Core
//!
//! Core traits and types for the admin client's state containers.
//!
//! Every piece of client state (the blog list, the tag cache, a yacht being
//! edited) lives in a plain state struct that only a reducer may change.
//! Network calls never happen inside a reducer: the reducer returns
//! [`Effect`](effect::Effect) descriptions and the runtime executes them,
//! feeding any resulting action back in.
//!
//! ## Core Concepts
//!
//! - **State**: Owned, cloneable data for one feature
//! - **Action**: Every input a reducer understands (user commands and API results)
//! - **Reducer**: `(State, Action, Environment) → Effects`, mutating state in place
//! - **Effect**: Description of asynchronous work, executed by the runtime
//! - **Environment**: Injected dependencies (API client, clock)
//!
//! ## Example
//!
//! ```
//! use faraway_admin_core::{smallvec, Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct DraftState {
//!     dirty: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum DraftAction {
//!     Edited,
//!     Saved,
//! }
//!
//! #[derive(Clone)]
//! struct DraftReducer;
//!
//! impl Reducer for DraftReducer {
//!     type State = DraftState;
//!     type Action = DraftAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut DraftState,
//!         action: DraftAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<DraftAction>; 4]> {
//!         state.dirty = matches!(action, DraftAction::Edited);
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = DraftState::default();
//! let _ = DraftReducer.reduce(&mut state, DraftAction::Edited, &());
//! assert!(state.dirty);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

pub use effect::Effect;
pub use environment::{Clock, SystemClock};
pub use reducer::Reducer;

/// Reducer composition (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Declarative helpers for building effects
pub mod effect_macros;

/// Reducer module - the core trait for client logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They are deterministic and testable without a network.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for client logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This function:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// Most actions produce zero or one effect, so the result is stored
        /// inline for up to four effects.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe work to be performed by the runtime. They are values,
/// not execution; a reducer returns them and the Store runs them.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Every admin operation is one HTTP exchange, so an effect is either
    /// nothing or a single future whose optional output is fed back into the
    /// reducer. A reducer that needs several requests returns several effects;
    /// the runtime starts them together.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Whether this effect does nothing when executed
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Transform the action this effect may produce
        ///
        /// Used to lift a child reducer's effects into its parent's action
        /// type.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            Action: Send + 'static,
            B: Send + 'static,
            F: FnOnce(Action) -> B + Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

//! # Faraway Admin Testing
//!
//! Testing utilities for the admin client.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers, plus effect assertions
//! - [`FixedClock`] for deterministic timestamps
//! - [`ScriptedTransport`], an in-memory content API that records requests
//! - [`run_effects`] to execute effect descriptions without a Store, concurrently
//! - proptest strategies for form inputs
//!
//! ## Example
//!
//! ```ignore
//! use faraway_admin_testing::{run_effects, test_clock, Reply, ScriptedTransport};
//!
//! #[tokio::test]
//! async fn loads_tags() {
//!     let transport = ScriptedTransport::new();
//!     transport.on(Method::Get, "/tags/all-tags", Reply::ok(json!({ "data": { "tags": [] } })));
//!     let env = AdminEnvironment::new(transport.client(), Arc::new(test_clock()));
//!
//!     let effects = EntityReducer::<Tags>::new().reduce(&mut state, load, &env);
//!     let feedback = run_effects(effects).await;
//! }
//! ```

use chrono::{DateTime, Utc};
use faraway_admin_core::environment::Clock;

pub mod transport;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use faraway_admin_testing::mocks::FixedClock;
    /// use faraway_admin_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
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
}

/// Executing effects outside a Store
pub mod effects {
    use faraway_admin_core::effect::Effect;

    /// Execute effects and collect every action they produce
    ///
    /// The futures run concurrently, as they would in a Store, and their
    /// actions are reported in declaration order. Produced actions are NOT
    /// fed back into any reducer.
    pub async fn run_effects<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let running = effects.into_iter().filter_map(|effect| match effect {
            Effect::None => None,
            Effect::Future(fut) => Some(fut),
        });
        futures::future::join_all(running).await.into_iter().flatten().collect()
    }
}

/// Property-based testing utilities
///
/// Strategies for the text inputs admin forms validate.
pub mod properties {
    use proptest::prelude::*;

    /// Slugs the server accepts: lowercase letters, digits and hyphens
    pub fn valid_slug() -> impl Strategy<Value = String> {
        "[a-z0-9-]{3,100}"
    }

    /// Slugs with at least one character outside `[a-z0-9-]`
    pub fn invalid_slug() -> impl Strategy<Value = String> {
        ("[a-z0-9-]{0,10}", "[A-Z !_.@#/]", "[a-z0-9-]{0,10}")
            .prop_map(|(head, bad, tail)| format!("{head}{bad}{tail}"))
    }

    /// Free text of bounded length, possibly empty
    pub fn text(max_len: usize) -> impl Strategy<Value = String> {
        proptest::collection::vec(proptest::char::range('a', 'z'), 0..=max_len)
            .prop_map(|chars| chars.into_iter().collect())
    }
}

// Re-export commonly used items
pub use effects::run_effects;
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
pub use transport::{Reply, ScriptedTransport, TEST_TOKEN};

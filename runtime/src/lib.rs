//! # Faraway Admin Runtime
//!
//! Runtime for the admin client's state containers.
//!
//! The [`Store`] owns one state value and the reducer that changes it. A
//! command sent to the store is reduced under a write lock; the effects the
//! reducer returns run on spawned tasks, and whatever action an effect
//! produces is reduced in turn and then published to observers.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state and runs the action → reducer → effects → action loop
//! - **`EffectHandle`**: Lets a caller wait until the effects of one action finished
//! - **Result broadcast**: Every action produced by an effect is published
//!   after it has been applied, which is how request/response style callers
//!   (forms, the CLI) learn the outcome of an API call
//!
//! ## Shutdown
//!
//! [`Store::shutdown`] stops accepting commands at once and then drains:
//! effects already running still deliver their results, and those results
//! are still reduced and published. A loading flag raised before shutdown is
//! therefore always lowered again.
//!
//! ## Example
//!
//! ```ignore
//! use faraway_admin_runtime::Store;
//!
//! let store = Store::new(AdminState::default(), admin_reducer(), environment);
//!
//! store.send(AdminAction::Blog(EntityAction::get_list(page, limit))).await?;
//!
//! let total = store.state(|s| s.blogs.list.total).await;
//! ```

use faraway_admin_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, broadcast, watch};

/// Metric names and descriptions emitted by the Store
pub mod metrics;

pub use error::StoreError;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new commands
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown gave up with effects still running
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// No matching result arrived in time
        #[error("Timeout waiting for action")]
        Timeout,

        /// Result broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use faraway_admin_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Results buffered for slow observers
    pub broadcast_capacity: usize,
    /// Drain time callers should allow on shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Configuration with explicit values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the result broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(16, Duration::from_secs(30))
    }
}

/// Waits for the effects started by one action
///
/// Returned by [`Store::send()`]. Actions fed back by those effects start
/// their own effects, which this handle does not wait for.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(action).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    running: Arc<AtomicUsize>,
    settled: watch::Receiver<()>,
}

impl EffectHandle {
    fn pair() -> (Self, Tracker) {
        let running = Arc::new(AtomicUsize::new(0));
        let (notify, settled) = watch::channel(());
        let handle = Self {
            running: Arc::clone(&running),
            settled,
        };
        (handle, Tracker { running, notify })
    }

    /// A handle with nothing to wait for
    #[must_use]
    pub fn completed() -> Self {
        Self::pair().0
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Wait until every effect finished
    pub async fn wait(&mut self) {
        while self.pending() > 0 {
            if self.settled.changed().await.is_err() {
                break;
            }
        }
    }

    /// [`wait`](Self::wait) bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when the
    /// timeout expires.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Sending side of an [`EffectHandle`]
struct Tracker {
    running: Arc<AtomicUsize>,
    notify: watch::Sender<()>,
}

/// One running effect, counted against its action's handle and the store
///
/// The counts drop when the guard does, including when the task panics.
struct InFlight {
    running: Arc<AtomicUsize>,
    notify: watch::Sender<()>,
    store_pending: Arc<AtomicUsize>,
}

impl InFlight {
    fn enter(tracker: &Tracker, store_pending: &Arc<AtomicUsize>) -> Self {
        tracker.running.fetch_add(1, Ordering::SeqCst);
        store_pending.fetch_add(1, Ordering::SeqCst);
        Self {
            running: Arc::clone(&tracker.running),
            notify: tracker.notify.clone(),
            store_pending: Arc::clone(store_pending),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.store_pending.fetch_sub(1, Ordering::SeqCst);
        if self.running.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notify.send(());
        }
    }
}

/// Store module - the runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, Duration, Effect, EffectHandle, InFlight, Instant, Ordering,
        Reducer, RwLock, StoreConfig, StoreError, Tracker, broadcast, metrics as names,
    };

    struct Shared<S, A, E, R> {
        state: RwLock<S>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        closing: AtomicBool,
        pending: Arc<AtomicUsize>,
        results: broadcast::Sender<A>,
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// Cloning a Store is cheap and yields a handle to the same state.
    pub struct Store<S, A, E, R> {
        shared: Arc<Shared<S, A, E, R>>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R> {
        fn clone(&self) -> Self {
            Self {
                shared: Arc::clone(&self.shared),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Store with the default configuration
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Store with an explicit configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (results, _) = broadcast::channel(config.broadcast_capacity.max(1));
            Self {
                shared: Arc::new(Shared {
                    state: RwLock::new(initial_state),
                    reducer,
                    environment,
                    config,
                    closing: AtomicBool::new(false),
                    pending: Arc::new(AtomicUsize::new(0)),
                    results,
                }),
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub fn config(&self) -> &StoreConfig {
            &self.shared.config
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.shared.pending.load(Ordering::Acquire)
        }

        /// Stop accepting commands and drain running effects
        ///
        /// Results of effects that were already running are still reduced
        /// and published while the store drains.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still
        /// running when `timeout` expires.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!(names::SHUTDOWN_INITIATED).increment(1);
            self.shared.closing.store(true, Ordering::Release);

            let deadline = Instant::now() + timeout;
            loop {
                let pending = self.pending_effects();
                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    metrics::counter!(names::SHUTDOWN_TIMEOUT).increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        /// Send a command to the store
        ///
        /// The command is reduced before this returns; its effects are only
        /// started. Concurrent sends serialize at the reducer, and effects
        /// complete in whatever order their I/O resolves.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] once shutdown began.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shared.closing.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!(names::REJECTED_ACTIONS).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }
            metrics::counter!(names::ACTIONS_TOTAL).increment(1);
            Ok(self.apply(action).await)
        }

        /// Send a command and wait for the first result matching `predicate`
        ///
        /// Subscribes before sending, so a result produced immediately is
        /// not missed. The returned action has already been reduced.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching result within `timeout`
        /// - [`StoreError::ChannelClosed`]: result broadcast closed
        /// - [`StoreError::ShutdownInProgress`]: the command was rejected
        pub async fn send_and_wait_for<F>(&self, action: A, predicate: F, timeout: Duration) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut results = self.shared.results.subscribe();
            self.send(action).await?;

            let wait = async {
                loop {
                    match results.recv().await {
                        Ok(result) if predicate(&result) => return Ok(result),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Result observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => return Err(StoreError::ChannelClosed),
                    }
                }
            };
            tokio::time::timeout(timeout, wait).await.map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to every action produced by an effect
        ///
        /// Commands passed to `send` are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.shared.results.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let loading = store.state(|s| s.blogs.flags.get_list).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&*self.shared.state.read().await)
        }

        /// Reduce `action` and start its effects; no shutdown gate
        async fn apply(&self, action: A) -> EffectHandle {
            let effects = {
                let mut state = self.shared.state.write().await;
                let started = Instant::now();
                let effects = self.shared.reducer.reduce(&mut *state, action, &self.shared.environment);
                metrics::histogram!(names::REDUCER_DURATION).record(started.elapsed().as_secs_f64());
                effects
            };
            tracing::trace!(effects = effects.len(), "Reduced");

            let (handle, tracker) = EffectHandle::pair();
            for effect in effects {
                self.start(effect, &tracker);
            }
            handle
        }

        /// Reduce an effect's result, then publish it
        ///
        /// Runs while the store drains, so a command accepted before
        /// shutdown always gets its result applied.
        async fn feed_back(&self, result: A) {
            metrics::counter!(names::FEEDBACK_TOTAL).increment(1);
            let published = result.clone();
            let _ = self.apply(result).await;
            let _ = self.shared.results.send(published);
        }

        fn start(&self, effect: Effect<A>, tracker: &Tracker) {
            let Effect::Future(work) = effect else {
                return;
            };
            metrics::counter!(names::EFFECTS_EXECUTED).increment(1);

            let guard = InFlight::enter(tracker, &self.shared.pending);
            let store = self.clone();
            tokio::spawn(async move {
                let _guard = guard;
                if let Some(result) = work.await {
                    store.feed_back(result).await;
                }
            });
        }
    }
}

pub use store::Store;

//! Metric names emitted by the Store.
//!
//! The Store records through the `metrics` facade only. Nothing is exported
//! unless the host application installs a recorder; call
//! [`describe_store_metrics`] once after installing one so the recorder
//! knows units and help text.

use metrics::{Unit, describe_counter, describe_histogram};

/// Actions processed by `Store::send`.
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Actions rejected because the store was shutting down.
pub const REJECTED_ACTIONS: &str = "store.shutdown.rejected_actions";

/// Time spent inside the reducer per action.
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Effects started.
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Effect results reduced, including those applied while draining.
pub const FEEDBACK_TOTAL: &str = "store.feedback.total";

/// Graceful shutdowns requested.
pub const SHUTDOWN_INITIATED: &str = "store.shutdown.initiated";

/// Graceful shutdowns that gave up with effects still running.
pub const SHUTDOWN_TIMEOUT: &str = "store.shutdown.timeout";

/// Register descriptions for every Store metric with the installed recorder.
pub fn describe_store_metrics() {
    describe_counter!(ACTIONS_TOTAL, Unit::Count, "Actions processed by the store");
    describe_counter!(
        REJECTED_ACTIONS,
        Unit::Count,
        "Actions rejected because the store was shutting down"
    );
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent running the reducer for one action"
    );
    describe_counter!(EFFECTS_EXECUTED, Unit::Count, "Effects started");
    describe_counter!(
        FEEDBACK_TOTAL,
        Unit::Count,
        "Effect results reduced and published"
    );
    describe_counter!(SHUTDOWN_INITIATED, Unit::Count, "Graceful shutdowns requested");
    describe_counter!(
        SHUTDOWN_TIMEOUT,
        Unit::Count,
        "Graceful shutdowns that timed out with effects still running"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_without_recorder_is_noop() {
        describe_store_metrics();
    }

    #[test]
    fn test_metric_names_are_namespaced() {
        for name in [
            ACTIONS_TOTAL,
            REJECTED_ACTIONS,
            REDUCER_DURATION,
            EFFECTS_EXECUTED,
            FEEDBACK_TOTAL,
            SHUTDOWN_INITIATED,
            SHUTDOWN_TIMEOUT,
        ] {
            assert!(name.starts_with("store."), "{name}");
        }
    }
}

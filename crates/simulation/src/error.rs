//! Engine error types.

use tycoon_types::{Duration, Time};

/// Violations of the scheduler's invariants.
///
/// These indicate a defect in a handler or in the engine itself, never a
/// recoverable runtime condition. A process that hits one aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// More processes reported suspension or completion than were runnable.
    #[error("runnable process counter would drop below zero")]
    RunnableUnderflow,

    /// An event was scheduled before the current simulated time.
    #[error("cannot schedule an event {delay} into the past")]
    NegativeDelay {
        /// The offending delay.
        delay: Duration,
    },

    /// An event was scheduled past the end of the representable timeline.
    #[error("cannot schedule an event {delay} after {now}")]
    ClockOverflow {
        /// Simulated time when the event was scheduled.
        now: Time,
        /// The offending delay.
        delay: Duration,
    },

    /// A parked process went away before its signal fired.
    #[error("waiter was dropped before it could be signaled")]
    WaiterGone,

    /// A signal was dropped without ever firing, so its waiter can never resume.
    #[error("signal was dropped without waking its waiter")]
    WaiterAbandoned,

    /// The runnable counter channel closed underneath the engine.
    #[error("process scheduler closed")]
    Closed,
}

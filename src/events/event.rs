//! # Runtime events emitted by the run controller.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run lifecycle**: a run starts, finds nothing, or finishes with an outcome
//! - **Step lifecycle**: a step starts, begins awaiting, fails to invoke, resolves
//! - **Control/infra**: stop requests, reentry, config reloads, subscriber trouble
//!
//! The [`Event`] struct carries the optional metadata (run id, step index,
//! target label, winning signal, outcome, reason).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use fixrunner::{Event, EventKind, StepSignal};
//!
//! let ev = Event::new(EventKind::StepResolved)
//!     .with_run(3)
//!     .with_index(1)
//!     .with_signal(StepSignal::DocumentChanged);
//!
//! assert_eq!(ev.kind, EventKind::StepResolved);
//! assert_eq!(ev.signal, Some(StepSignal::DocumentChanged));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::runner::{RunOutcome, StepSignal};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `target`: subscriber name
    /// - `reason`: panic info
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `target`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    // === Run lifecycle ===
    /// A run was admitted.
    ///
    /// Sets:
    /// - `run`: run id
    /// - `total`: number of targets after filtering
    RunStarted,

    /// A run found no targets; the fallback fix was invoked instead.
    ///
    /// Sets:
    /// - `run`: run id
    /// - `reason`: fallback failure message (only if it failed)
    NothingFound,

    /// A run ended.
    ///
    /// Sets:
    /// - `run`: run id
    /// - `outcome`: completed/stopped/nothing-found
    /// - `index`: number of steps visited
    /// - `total`: number of targets
    RunFinished,

    // === Step lifecycle ===
    /// Caret is being moved to a target.
    ///
    /// Sets:
    /// - `run`, `index`, `target`
    StepStarted,

    /// The fix UI was opened; the step now waits for a signal.
    ///
    /// Sets:
    /// - `run`, `index`, `target`
    StepAwaiting,

    /// A host call failed inside a step (treated as a timeout).
    ///
    /// Sets:
    /// - `run`, `index`
    /// - `reason`: host error message
    InvocationFailed,

    /// A step resolved and its resources were released.
    ///
    /// Sets:
    /// - `run`, `index`
    /// - `signal`: which race participant won
    StepResolved,

    // === Control ===
    /// Stop was requested for the active run.
    ///
    /// Sets:
    /// - `run`
    /// - `reason`: who asked (user, reentry, focus-lost, document-switched, timeout)
    StopRequested,

    /// A start request arrived while a run was active and was ignored.
    StartIgnored,

    /// A new configuration was picked up.
    ConfigReloaded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Run identifier (per controller, starting at 1).
    pub run: Option<u64>,
    /// Step index within the run (0-based), or visited count for `RunFinished`.
    pub index: Option<u32>,
    /// Number of targets in the run.
    pub total: Option<u32>,
    /// Human-readable target (`label@line:col`) or subscriber name.
    pub target: Option<Arc<str>>,
    /// Winning race participant.
    pub signal: Option<StepSignal>,
    /// Final outcome of a run.
    pub outcome: Option<RunOutcome>,
    /// Human-readable reason (errors, stop origin, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            run: None,
            index: None,
            total: None,
            target: None,
            signal: None,
            outcome: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_run(mut self, run: u64) -> Self {
        self.run = Some(run);
        self
    }

    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(clamp_u32(index));
        self
    }

    #[inline]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(clamp_u32(total));
        self
    }

    #[inline]
    pub fn with_target(mut self, target: impl Into<Arc<str>>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[inline]
    pub fn with_signal(mut self, signal: StepSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    #[inline]
    pub fn with_outcome(mut self, outcome: RunOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_target(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_target(subscriber)
            .with_reason(info)
    }
}

fn clamp_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::RunStarted);
        let b = Event::new(EventKind::RunStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_set_fields() {
        let ev = Event::new(EventKind::RunFinished)
            .with_run(2)
            .with_index(4)
            .with_total(7)
            .with_outcome(RunOutcome::Stopped)
            .with_reason("focus-lost");

        assert_eq!(ev.run, Some(2));
        assert_eq!(ev.index, Some(4));
        assert_eq!(ev.total, Some(7));
        assert_eq!(ev.outcome, Some(RunOutcome::Stopped));
        assert_eq!(ev.reason.as_deref(), Some("focus-lost"));
    }
}

//! # Reentry policy
//!
//! A controller runs at most **one** run at a time. When a start request arrives
//! while a run is active, the reentry policy decides what to do.
//!
//! ## Variants
//! - `StopRunning`: treat the second trigger as a **stop** for the active run.
//! - `Ignore`: drop the new request and leave the active run alone.
//!
//! ## Invariants
//! - A start request never queues; it either starts a run or it doesn't.
//! - Neither variant starts a second run in parallel.

/// Policy controlling start requests that arrive while a run is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReentryPolicy {
    /// Stop the active run; the request itself starts nothing.
    ///
    /// Use when the same key binding should toggle the runner on and off.
    #[default]
    StopRunning,

    /// Ignore the request.
    ///
    /// Use when triggers may fire repeatedly (e.g. from automation).
    Ignore,
}

impl ReentryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReentryPolicy::StopRunning => "stop-running",
            ReentryPolicy::Ignore => "ignore",
        }
    }
}

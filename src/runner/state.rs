//! # Run state and its vocabulary.
//!
//! [`RunState`] is the single mutable record of "what the controller is doing".
//! It is owned by [`RunController`](crate::RunController) and mutated only there,
//! always under a short, non-async lock.
//!
//! ## Transitions
//! ```text
//!          start()                 begin_step()
//!   Idle ──────────► Running ◄───────────────────► AwaitingStep
//!    ▲                  │          end_step()            │
//!    │                  │ stop()                         │ stop()
//!    │                  ▼                                ▼
//!    └─────────────── Stopping ◄─────────────────────────┘
//!        release()        (exhaustion also releases straight from Running)
//! ```
//!
//! ## Invariants
//! - At most one run is non-`Idle` per controller.
//! - `current_index` never decreases within a run.
//! - `step_token` is `Some` only while `phase == AwaitingStep`.

use tokio_util::sync::CancellationToken;

/// Observable controller phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No run in flight.
    Idle,
    /// A run is active and between steps.
    Running,
    /// A step is positioned/invoked and waiting for a signal.
    AwaitingStep,
    /// Stop was requested; the run is unwinding.
    Stopping,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::AwaitingStep => "awaiting-step",
            Phase::Stopping => "stopping",
        }
    }
}

/// The race participant that resolved a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepSignal {
    /// No user action within `wait_for` (or the fix could not be opened).
    Timeout,
    /// The target document was edited (after the debounce window).
    DocumentChanged,
    /// `request_next()` forced the step to resolve.
    Advance,
    /// The run was stopped.
    Stop,
}

impl StepSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepSignal::Timeout => "timeout",
            StepSignal::DocumentChanged => "document-changed",
            StepSignal::Advance => "advance",
            StepSignal::Stop => "stop",
        }
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every target was visited.
    Completed,
    /// The run halted early.
    Stopped,
    /// No targets; the fallback fix was invoked once instead.
    NothingFound,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Stopped => "stopped",
            RunOutcome::NothingFound => "nothing-found",
        }
    }

    /// Text of the status notification shown when a run ends.
    pub fn status_message(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "All Done",
            RunOutcome::Stopped => "Runner Stopped",
            RunOutcome::NothingFound => "Nothing Found",
        }
    }
}

/// Who asked a run to stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopOrigin {
    /// Explicit `request_stop()` / stop command.
    User,
    /// A second start while a run was active.
    Reentry,
    /// Step timed out in default menu mode.
    Timeout,
    /// The host window lost focus.
    FocusLost,
    /// The user switched documents.
    DocumentSwitched,
    /// The controller is shutting down.
    Shutdown,
}

impl StopOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopOrigin::User => "user",
            StopOrigin::Reentry => "reentry",
            StopOrigin::Timeout => "timeout",
            StopOrigin::FocusLost => "focus-lost",
            StopOrigin::DocumentSwitched => "document-switched",
            StopOrigin::Shutdown => "shutdown",
        }
    }
}

/// Mutable run record (one per controller).
#[derive(Debug)]
pub(crate) struct RunState {
    pub phase: Phase,
    /// Id of the current (or last) run; 0 before the first run.
    pub run_id: u64,
    pub current_index: Option<usize>,
    pub run_token: Option<CancellationToken>,
    pub step_token: Option<CancellationToken>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            run_id: 0,
            current_index: None,
            run_token: None,
            step_token: None,
        }
    }

    /// Idle → Running. Returns the new run id and its cancellation token.
    pub fn begin_run(&mut self) -> (u64, CancellationToken) {
        debug_assert_eq!(self.phase, Phase::Idle);
        let token = CancellationToken::new();
        self.run_id += 1;
        self.enter(Phase::Running);
        self.current_index = None;
        self.run_token = Some(token.clone());
        self.step_token = None;
        (self.run_id, token)
    }

    /// Running → AwaitingStep for `index`.
    ///
    /// Returns `None` if `run` is not the active run or it is stopping.
    pub fn begin_step(&mut self, run: u64, index: usize) -> Option<CancellationToken> {
        if run != self.run_id || self.phase != Phase::Running {
            return None;
        }
        debug_assert!(self.current_index.is_none_or(|cur| index > cur));
        let token = self.run_token.as_ref()?.child_token();
        self.enter(Phase::AwaitingStep);
        self.current_index = Some(index);
        self.step_token = Some(token.clone());
        Some(token)
    }

    /// AwaitingStep → Running (Stopping stays Stopping).
    pub fn end_step(&mut self, run: u64) {
        if run != self.run_id {
            return;
        }
        self.step_token = None;
        if self.phase == Phase::AwaitingStep {
            self.enter(Phase::Running);
        }
    }

    /// Any → Stopping. Returns the token to cancel, or `None` when idle.
    pub fn stop(&mut self) -> Option<(u64, CancellationToken)> {
        if self.phase == Phase::Idle {
            return None;
        }
        self.enter(Phase::Stopping);
        self.run_token.clone().map(|t| (self.run_id, t))
    }

    /// Ends `run` and returns to Idle. Idempotent.
    pub fn release(&mut self, run: u64) -> bool {
        if run != self.run_id || self.phase == Phase::Idle {
            return false;
        }
        self.enter(Phase::Idle);
        self.current_index = None;
        self.run_token = None;
        self.step_token = None;
        true
    }

    fn enter(&mut self, next: Phase) {
        if self.phase != next {
            tracing::trace!(run = self.run_id, from = self.phase.as_str(), to = next.as_str(), "phase");
        }
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut st = RunState::new();
        let (run, token) = st.begin_run();
        assert_eq!(run, 1);
        assert_eq!(st.phase, Phase::Running);

        let step = st.begin_step(run, 0).unwrap();
        assert_eq!(st.phase, Phase::AwaitingStep);
        st.end_step(run);
        assert_eq!(st.phase, Phase::Running);
        assert!(st.step_token.is_none());

        let (stopped, t) = st.stop().unwrap();
        assert_eq!(stopped, run);
        t.cancel();
        assert!(token.is_cancelled());
        assert!(step.is_cancelled());

        assert!(st.release(run));
        assert!(!st.release(run));
        assert_eq!(st.phase, Phase::Idle);
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let mut st = RunState::new();
        assert!(st.stop().is_none());
        assert_eq!(st.phase, Phase::Idle);
    }

    #[test]
    fn no_step_after_stop() {
        let mut st = RunState::new();
        let (run, _) = st.begin_run();
        st.stop();
        assert!(st.begin_step(run, 0).is_none());
    }

    #[test]
    fn stale_run_ids_are_ignored() {
        let mut st = RunState::new();
        let (first, _) = st.begin_run();
        st.release(first);
        let (second, _) = st.begin_run();

        assert!(st.begin_step(first, 0).is_none());
        assert!(!st.release(first));
        assert!(st.begin_step(second, 0).is_some());
    }

    #[test]
    fn stopping_survives_end_step() {
        let mut st = RunState::new();
        let (run, _) = st.begin_run();
        st.begin_step(run, 0);
        st.stop();
        st.end_step(run);
        assert_eq!(st.phase, Phase::Stopping);
    }
}

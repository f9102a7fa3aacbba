//! # Drives one run from start to report.
//!
//! ## Flow
//! ```text
//! drive(run)
//!   ├─► output preamble (debug only): show + clear, record raw diagnostics
//!   ├─► targets = filter/sort by origin, then reverse
//!   ├─► publish RunStarted
//!   ├─► empty? ─► guard.release() ─► invoke fallback fix once ─► NothingFound
//!   ├─► for each target (last position first):
//!   │     begin_step ─► run_step ─► end_step
//!   │     Timeout in default mode ─► stop(Timeout)
//!   ├─► hide UI
//!   ├─► guard.release(): phase = Idle, running flag = false (no-op if released)
//!   ├─► status notification
//!   └─► publish RunFinished ─► RunReport
//! ```
//!
//! ## Rules
//! - The running flag is cleared on every path out, including panics and the
//!   run task being dropped ([`RunGuard`]).
//! - `RunFinished` is published after the controller is back to `Idle`, so
//!   observers reacting to it can start the next run.

use std::sync::Arc;

use regex::Regex;
use tokio_util::sync::CancellationToken;

use crate::{
    config::{Config, MenuListMode},
    diagnostics::filter,
    events::{Event, EventKind},
};

use super::{
    controller::RunController,
    request::{Origin, RunReport, RunRequest},
    state::{RunOutcome, StepSignal, StopOrigin},
    step::{self, StepContext},
};

/// Inputs of an admitted run.
pub(super) struct ActiveRun {
    pub id: u64,
    pub token: CancellationToken,
    pub request: RunRequest,
    pub cfg: Arc<Config>,
    pub exclusion: Option<Regex>,
}

/// Returns the controller to `Idle` and clears the running flag exactly once.
pub(super) struct RunGuard {
    ctrl: Arc<RunController>,
    run: u64,
    flag: String,
    armed: bool,
}

impl RunGuard {
    /// Raises the running flag.
    pub fn arm(ctrl: &Arc<RunController>, run: u64, flag: &str) -> Self {
        ctrl.host().set_flag(flag, true);
        Self {
            ctrl: Arc::clone(ctrl),
            run,
            flag: flag.to_string(),
            armed: true,
        }
    }

    pub fn release(mut self) {
        self.disarm();
    }

    fn disarm(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        self.ctrl.release(self.run);
        self.ctrl.host().set_flag(&self.flag, false);
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Runs `run` to completion.
pub(super) async fn drive(ctrl: Arc<RunController>, run: ActiveRun, mut guard: RunGuard) -> RunReport {
    let ActiveRun {
        id,
        token,
        request,
        cfg,
        exclusion,
    } = run;
    let host = ctrl.host();
    let bus = ctrl.bus();

    let output = ctrl.output();
    output.begin_run();
    for d in &request.diagnostics {
        output.record(d);
    }

    let ascending = match request.origin {
        Origin::FullDocument => filter::select(&request.diagnostics, &cfg),
        Origin::SingleLine => filter::sort_by_position(request.diagnostics),
    };
    let targets = filter::traversal_order(ascending);
    let total = targets.len();

    bus.publish(Event::new(EventKind::RunStarted).with_run(id).with_total(total));
    tracing::debug!(run = id, total, origin = ?request.origin, document = %request.document.id, "run started");

    let (outcome, visited) = if targets.is_empty() {
        // The fallback runs outside the run: a trigger landing now starts afresh.
        guard.disarm();
        let mut ev = Event::new(EventKind::NothingFound).with_run(id);
        if let Err(err) = host.invoke(&cfg.default_fix_command).await {
            ev = ev.with_reason(err.to_string());
        }
        bus.publish(ev);
        (RunOutcome::NothingFound, 0)
    } else {
        let ctx = StepContext {
            host,
            cfg: &cfg,
            exclusion: exclusion.as_ref(),
            suggestions: ctrl.suggestions(),
            ledger: ctrl.ledger(),
            bus,
            run: id,
            document: &request.document,
        };

        let mut visited = 0;
        for (index, target) in targets.iter().enumerate() {
            let Some(step_token) = ctrl.begin_step(id, index) else {
                break;
            };
            visited += 1;
            let signal = step::run_step(&ctx, index, target, &token, &step_token).await;
            ctrl.end_step(id);

            if signal == StepSignal::Timeout && cfg.menu_list_mode == MenuListMode::Default {
                ctrl.stop_run(id, StopOrigin::Timeout);
            }
            if token.is_cancelled() {
                break;
            }
        }

        step::hide_ui(host.as_ref(), &cfg).await;
        let outcome = if token.is_cancelled() {
            RunOutcome::Stopped
        } else {
            RunOutcome::Completed
        };
        (outcome, visited)
    };

    output.line(&format!("{}: {visited}/{total}", outcome.as_str()));
    guard.release();
    host.notify(&format!("{}: {}", ctrl.title(), outcome.status_message()));

    bus.publish(
        Event::new(EventKind::RunFinished)
            .with_run(id)
            .with_outcome(outcome)
            .with_index(visited)
            .with_total(total),
    );

    RunReport {
        run: id,
        outcome,
        visited,
        total,
    }
}

//! # One step of a run: position, invoke, race, clean up.
//!
//! ## Flow
//! ```text
//! run_step(target)
//!   ├─► publish StepStarted
//!   ├─► subscribe to host events            (tracked)
//!   ├─► set_selection(range.end)
//!   ├─► open the fix UI
//!   │     Default:    invoke(default_fix_command)
//!   │     Suggestion: present(...) (tracked) → invoke(suggest_command)
//!   │   any host error ─► publish InvocationFailed ─► signal = Timeout
//!   ├─► publish StepAwaiting, arm timer     (tracked)
//!   ├─► race (biased):
//!   │     run token    ─► Stop
//!   │     step token   ─► Advance
//!   │     quiet window ─► DocumentChanged   (debounced edits of the target doc)
//!   │     timer        ─► Timeout
//!   ├─► cleanup: drop tracked handles, invoke hide commands
//!   └─► publish StepResolved(signal)
//! ```
//!
//! ## Rules
//! - Cleanup runs exactly once per step regardless of the winner.
//! - The change subscription is opened before the fix UI so edits applied by
//!   the UI are never missed.
//! - Host errors never escape a step.
//! - Lagging behind the host event stream is not an edit.

use std::{pin::Pin, sync::Arc};

use regex::Regex;
use tokio::{
    sync::broadcast::error::RecvError,
    time::{self, Instant, Sleep},
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::{Config, MenuListMode},
    diagnostics::Diagnostic,
    error::HostError,
    events::{Bus, Event, EventKind},
    host::{DocumentRef, HostBridge, HostEvent, Registration},
    suggest::SuggestionSource,
};

use super::{
    debounce::Debounce,
    ledger::{ResourceLedger, Tracked},
    state::StepSignal,
};

/// Everything a step borrows from its run.
pub(super) struct StepContext<'a> {
    pub host: &'a Arc<dyn HostBridge>,
    pub cfg: &'a Config,
    pub exclusion: Option<&'a Regex>,
    pub suggestions: &'a SuggestionSource,
    pub ledger: &'a Arc<ResourceLedger>,
    pub bus: &'a Bus,
    pub run: u64,
    pub document: &'a DocumentRef,
}

/// Runs the step for `target` and returns the signal that resolved it.
pub(super) async fn run_step(
    ctx: &StepContext<'_>,
    index: usize,
    target: &Diagnostic,
    run_token: &CancellationToken,
    step_token: &CancellationToken,
) -> StepSignal {
    let label = format!("{}@{}", target.label(), target.range.end);
    ctx.bus.publish(
        Event::new(EventKind::StepStarted)
            .with_run(ctx.run)
            .with_index(index)
            .with_target(label.as_str()),
    );

    let mut changes = ctx.ledger.track(ctx.host.subscribe());

    let signal = match open_fix_ui(ctx, target).await {
        Ok(registration) => {
            ctx.bus.publish(
                Event::new(EventKind::StepAwaiting)
                    .with_run(ctx.run)
                    .with_index(index)
                    .with_target(label.as_str()),
            );
            let timer: Tracked<Pin<Box<Sleep>>> =
                ctx.ledger.track(Box::pin(time::sleep(ctx.cfg.wait_for())));
            let signal = race(ctx, &mut changes, timer, run_token, step_token).await;
            drop(registration);
            signal
        }
        Err(err) => {
            tracing::debug!(run = ctx.run, index, error = %err, "fix UI could not be opened");
            ctx.bus.publish(
                Event::new(EventKind::InvocationFailed)
                    .with_run(ctx.run)
                    .with_index(index)
                    .with_reason(err.to_string()),
            );
            StepSignal::Timeout
        }
    };

    changes.release();
    hide_ui(ctx.host.as_ref(), ctx.cfg).await;

    ctx.bus.publish(
        Event::new(EventKind::StepResolved)
            .with_run(ctx.run)
            .with_index(index)
            .with_signal(signal),
    );
    signal
}

/// Positions the caret and opens the mode's fix UI.
///
/// Returns the completion registration in suggestion mode.
async fn open_fix_ui(
    ctx: &StepContext<'_>,
    target: &Diagnostic,
) -> Result<Option<Tracked<Registration>>, HostError> {
    ctx.host.set_selection(ctx.document, target.range.end)?;

    match ctx.cfg.menu_list_mode {
        MenuListMode::Default => {
            ctx.host.invoke(&ctx.cfg.default_fix_command).await?;
            Ok(None)
        }
        MenuListMode::Suggestion => {
            let registration = ctx
                .suggestions
                .present(ctx.document, target.range, &target.label(), ctx.exclusion)
                .await?;
            let registration = ctx.ledger.track(registration);
            ctx.host.invoke(&ctx.cfg.suggest_command).await?;
            Ok(Some(registration))
        }
    }
}

/// Waits for the first of stop, advance, a settled edit, or the timer.
async fn race(
    ctx: &StepContext<'_>,
    changes: &mut Tracked<tokio::sync::broadcast::Receiver<HostEvent>>,
    mut timer: Tracked<Pin<Box<Sleep>>>,
    run_token: &CancellationToken,
    step_token: &CancellationToken,
) -> StepSignal {
    let mut debounce = Debounce::new(ctx.cfg.debounce_window());
    let mut listening = true;

    loop {
        let quiet = debounce.deadline();

        tokio::select! {
            biased;

            _ = run_token.cancelled() => return StepSignal::Stop,
            _ = step_token.cancelled() => return StepSignal::Advance,
            _ = time::sleep_until(quiet.unwrap_or_else(Instant::now)), if debounce.is_pending() => {
                if debounce.fire_if_due(Instant::now()) {
                    return StepSignal::DocumentChanged;
                }
            }
            _ = &mut *timer => return StepSignal::Timeout,
            recv = changes.recv(), if listening => match recv {
                Ok(HostEvent::DocumentChanged { document, changes: ranges })
                    if document == ctx.document.id && !ranges.is_empty() =>
                {
                    debounce.push(Instant::now());
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    // Only an observed edit of the target resolves the step.
                    tracing::debug!(run = ctx.run, skipped, "host events lagged");
                }
                Err(RecvError::Closed) => listening = false,
            },
        }
    }
}

/// Closes any suggestion or action UI; failures are logged only.
pub(super) async fn hide_ui(host: &dyn HostBridge, cfg: &Config) {
    for command in &cfg.hide_commands {
        if let Err(err) = host.invoke(command).await {
            tracing::debug!(%command, error = %err, "hide command failed");
        }
    }
}

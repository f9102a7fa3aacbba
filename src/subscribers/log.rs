//! # LogWriter: event renderer
//!
//! A subscriber that turns incoming [`Event`]s into `tracing` records, so a run
//! shows up in whatever `tracing` subscriber the host installed.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO  [run-started] run=1 total=3
//! DEBUG [step-started] run=1 index=0 target="eslint@9:3"
//! DEBUG [step-resolved] run=1 index=0 signal=document-changed
//! WARN  [invocation-failed] run=1 index=1 reason="command 'x' failed: ..."
//! INFO  [run-finished] run=1 outcome=completed visited=3 total=3
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let run = e.run.unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("");
        let target = e.target.as_deref().unwrap_or("");

        match e.kind {
            EventKind::RunStarted => {
                info!("[run-started] run={run} total={:?}", e.total);
            }
            EventKind::NothingFound => {
                info!("[nothing-found] run={run} reason={reason:?}");
            }
            EventKind::RunFinished => {
                info!(
                    "[run-finished] run={run} outcome={} visited={:?} total={:?}",
                    e.outcome.map(|o| o.as_str()).unwrap_or("unknown"),
                    e.index,
                    e.total
                );
            }
            EventKind::StepStarted => {
                debug!("[step-started] run={run} index={:?} target={target:?}", e.index);
            }
            EventKind::StepAwaiting => {
                debug!("[step-awaiting] run={run} index={:?} target={target:?}", e.index);
            }
            EventKind::StepResolved => {
                debug!(
                    "[step-resolved] run={run} index={:?} signal={}",
                    e.index,
                    e.signal.map(|s| s.as_str()).unwrap_or("unknown")
                );
            }
            EventKind::InvocationFailed => {
                warn!("[invocation-failed] run={run} index={:?} reason={reason:?}", e.index);
            }
            EventKind::StopRequested => {
                info!("[stop-requested] run={run} reason={reason}");
            }
            EventKind::StartIgnored => {
                debug!("[start-ignored] run={run}");
            }
            EventKind::ConfigReloaded => {
                debug!("[config-reloaded]");
            }
            EventKind::SubscriberOverflow => {
                warn!("[subscriber-overflow] subscriber={target} reason={reason}");
            }
            EventKind::SubscriberPanicked => {
                warn!("[subscriber-panicked] subscriber={target} info={reason}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

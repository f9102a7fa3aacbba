//! # RunController: single-flight owner of the run state.
//!
//! ## Architecture
//! ```text
//!   host command ─► dispatch(Command)
//!                      │
//!        ┌─────────────┼──────────────┬────────────────┐
//!        ▼             ▼              ▼                ▼
//!      run()     run_for_line()   request_next()   request_stop()
//!        └──────┬──────┘              │                │
//!               ▼                     ▼                ▼
//!         start(request)        step token        run token
//!               │                 cancel()          cancel()
//!     Idle? ────┤
//!      no  ─► ReentryPolicy (stop / ignore)
//!      yes ─► spawn drive(run) ──► RunHandle
//!
//!   background:
//!     listener:     Bus ─► SubscriberSet
//!     host watcher: focus lost / document switched ─► stop
//!                   config replaced                ─► OutputSink::reset
//! ```
//!
//! ## Rules
//! - At most one run is active; the state lock is never held across an await.
//! - `request_next` and `request_stop` only fire tokens; the step observes them.
//! - A missing active editor is reported once and mutates nothing.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::{
    sync::{broadcast, oneshot, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::{Config, ConfigStore},
    diagnostics::filter,
    error::RunError,
    events::{Bus, Event, EventKind},
    host::{HostBridge, HostEvent},
    output::OutputSink,
    subscribers::{Subscribe, SubscriberSet},
    suggest::SuggestionSource,
};

use super::{
    commands::Command,
    ledger::ResourceLedger,
    reentry::ReentryPolicy,
    request::{Admission, RunHandle, RunRequest},
    run::{self, ActiveRun, RunGuard},
    state::{Phase, RunState, StopOrigin},
};

/// Builder for [`RunController`].
pub struct RunControllerBuilder {
    host: Arc<dyn HostBridge>,
    config: ConfigStore,
    subscribers: Vec<Arc<dyn Subscribe>>,
    reentry: ReentryPolicy,
    title: String,
}

impl RunControllerBuilder {
    /// Sets event subscribers.
    ///
    /// Each subscriber gets a dedicated worker with a bounded queue.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets what a start request does while a run is active.
    pub fn with_reentry(mut self, policy: ReentryPolicy) -> Self {
        self.reentry = policy;
        self
    }

    /// Sets the prefix of status notifications and the output channel name.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builds the controller and spawns its background listeners.
    ///
    /// Must be called within a Tokio runtime.
    pub fn build(self) -> Arc<RunController> {
        let cfg = self.config.snapshot();
        tracing::debug!(host = self.host.name(), reentry = self.reentry.as_str(), "building run controller");
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let output = OutputSink::new(Arc::clone(&self.host), self.title.clone());
        output.reset(cfg.debug);

        let ctrl = Arc::new(RunController {
            suggestions: SuggestionSource::new(Arc::clone(&self.host)),
            host: self.host,
            config: self.config,
            bus,
            output,
            ledger: ResourceLedger::new(),
            reentry: self.reentry,
            title: self.title,
            state: Mutex::new(RunState::new()),
            run_task: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            shutdown: CancellationToken::new(),
        });

        let mut listeners = Vec::with_capacity(2);
        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers, ctrl.bus.clone());
            listeners.push(spawn_subscriber_listener(
                ctrl.bus.subscribe(),
                set,
                ctrl.shutdown.clone(),
            ));
        }
        listeners.push(spawn_host_watcher(
            Arc::downgrade(&ctrl),
            ctrl.host.subscribe(),
            ctrl.config.subscribe(),
            ctrl.shutdown.clone(),
        ));
        *ctrl.listeners.lock() = listeners;

        ctrl
    }
}

/// Orchestrates runs over a document's diagnostics.
pub struct RunController {
    host: Arc<dyn HostBridge>,
    config: ConfigStore,
    bus: Bus,
    output: OutputSink,
    suggestions: SuggestionSource,
    ledger: Arc<ResourceLedger>,
    reentry: ReentryPolicy,
    title: String,

    state: Mutex<RunState>,
    run_task: Mutex<Option<JoinHandle<()>>>,
    listeners: Mutex<Vec<JoinHandle<()>>>,
    shutdown: CancellationToken,
}

impl RunController {
    /// Starts building a controller over `host` with `config`.
    pub fn builder(host: Arc<dyn HostBridge>, config: ConfigStore) -> RunControllerBuilder {
        RunControllerBuilder {
            host,
            config,
            subscribers: Vec::new(),
            reentry: ReentryPolicy::default(),
            title: OutputSink::DEFAULT_NAME.to_string(),
        }
    }

    /// Runs over every enabled diagnostic of the active document.
    ///
    /// Fails with [`RunError::NoActiveEditor`] (after one notification) when no
    /// editor is focused.
    pub fn run(self: &Arc<Self>) -> Result<Admission, RunError> {
        let editor = self.require_editor()?;
        let diagnostics = self.host.diagnostics(&editor.document);
        self.start(RunRequest::full_document(editor.document, diagnostics))
    }

    /// Runs over the diagnostics touching the caret line.
    ///
    /// A multi-line selection yields no targets (and so the fallback fix).
    pub fn run_for_line(self: &Arc<Self>) -> Result<Admission, RunError> {
        let editor = self.require_editor()?;
        let raw = self.host.diagnostics(&editor.document);
        let on_line = filter::on_line(&raw, editor.selection);
        self.start(RunRequest::single_line(editor.document, on_line))
    }

    /// Starts a run over `request`, or applies the reentry policy if one is active.
    pub fn start(self: &Arc<Self>, request: RunRequest) -> Result<Admission, RunError> {
        let cfg = self.config.snapshot();
        let exclusion = cfg.exclusion()?;

        let admitted = {
            let mut st = self.state.lock();
            if st.phase == Phase::Idle {
                Some(st.begin_run())
            } else {
                None
            }
        };

        let Some((id, token)) = admitted else {
            tracing::debug!(policy = self.reentry.as_str(), "start while a run is active");
            return Ok(match self.reentry {
                ReentryPolicy::StopRunning => {
                    self.request_stop_from(StopOrigin::Reentry);
                    Admission::StopRequested
                }
                ReentryPolicy::Ignore => {
                    self.bus.publish(Event::new(EventKind::StartIgnored));
                    Admission::Ignored
                }
            });
        };

        let guard = RunGuard::arm(self, id, &cfg.running_flag);
        let active = ActiveRun {
            id,
            token,
            request,
            cfg,
            exclusion,
        };

        let (report_tx, report_rx) = oneshot::channel();
        let ctrl = Arc::clone(self);
        let task = tokio::spawn(async move {
            let report = run::drive(ctrl, active, guard).await;
            let _ = report_tx.send(report);
        });
        *self.run_task.lock() = Some(task);

        Ok(Admission::Started(RunHandle::new(id, report_rx)))
    }

    /// Resolves the awaiting step without stopping the run.
    ///
    /// No-op when no step is awaiting.
    pub fn request_next(&self) {
        let token = self.state.lock().step_token.clone();
        if let Some(token) = token {
            token.cancel();
        }
    }

    /// Stops the active run. No-op when idle.
    pub fn request_stop(&self) {
        self.request_stop_from(StopOrigin::User);
    }

    /// Executes a host command.
    ///
    /// Returns the start admission for `Run` / `RunForLine`, `None` otherwise.
    pub fn dispatch(self: &Arc<Self>, command: Command) -> Result<Option<Admission>, RunError> {
        match command {
            Command::Run => self.run().map(Some),
            Command::RunForLine => self.run_for_line().map(Some),
            Command::Next => {
                self.request_next();
                Ok(None)
            }
            Command::Stop => {
                self.request_stop();
                Ok(None)
            }
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Index of the step being processed (position in traversal order).
    pub fn current_index(&self) -> Option<usize> {
        self.state.lock().current_index
    }

    pub fn is_running(&self) -> bool {
        self.phase() != Phase::Idle
    }

    /// Subscribes to runtime events.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Step-handle accounting.
    pub fn ledger(&self) -> &Arc<ResourceLedger> {
        &self.ledger
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Stops any run, waits for it to finish, then stops the listeners and
    /// drains subscriber queues.
    pub async fn shutdown(&self) {
        self.request_stop_from(StopOrigin::Shutdown);

        let task = self.run_task.lock().take();
        if let Some(task) = task
            && let Err(err) = task.await
        {
            tracing::warn!(error = %err, "run task ended abnormally");
        }

        self.shutdown.cancel();
        let listeners = std::mem::take(&mut *self.listeners.lock());
        for listener in listeners {
            let _ = listener.await;
        }
    }

    // ---- crate-internal, used by the run task ----

    pub(super) fn host(&self) -> &Arc<dyn HostBridge> {
        &self.host
    }

    pub(super) fn bus(&self) -> &Bus {
        &self.bus
    }

    pub(super) fn output(&self) -> &OutputSink {
        &self.output
    }

    pub(super) fn suggestions(&self) -> &SuggestionSource {
        &self.suggestions
    }

    pub(super) fn title(&self) -> &str {
        &self.title
    }

    pub(super) fn begin_step(&self, run: u64, index: usize) -> Option<CancellationToken> {
        self.state.lock().begin_step(run, index)
    }

    pub(super) fn end_step(&self, run: u64) {
        self.state.lock().end_step(run);
    }

    pub(super) fn release(&self, run: u64) {
        self.state.lock().release(run);
    }

    /// Stops `run` if it is still the active one.
    pub(super) fn stop_run(&self, run: u64, origin: StopOrigin) {
        let stopping = {
            let mut st = self.state.lock();
            if st.run_id != run {
                return;
            }
            st.stop()
        };
        self.fire_stop(stopping, origin);
    }

    fn request_stop_from(&self, origin: StopOrigin) {
        let stopping = self.state.lock().stop();
        self.fire_stop(stopping, origin);
    }

    fn fire_stop(&self, stopping: Option<(u64, CancellationToken)>, origin: StopOrigin) {
        let Some((run, token)) = stopping else {
            return;
        };
        if token.is_cancelled() {
            return;
        }
        token.cancel();
        tracing::debug!(run, origin = origin.as_str(), "stop requested");
        self.bus.publish(
            Event::new(EventKind::StopRequested)
                .with_run(run)
                .with_reason(origin.as_str()),
        );
    }

    fn require_editor(&self) -> Result<crate::host::ActiveEditor, RunError> {
        self.host.active_editor().ok_or_else(|| {
            let err = RunError::NoActiveEditor;
            self.host
                .notify(&format!("{}: {}", self.title, err.as_message()));
            err
        })
    }

    fn on_config(&self, cfg: &Config) {
        self.output.reset(cfg.debug);
        self.bus.publish(Event::new(EventKind::ConfigReloaded));
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Forwards bus events to the subscriber workers until shutdown.
fn spawn_subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;

                ev = rx.recv() => match ev {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = token.cancelled() => break,
            }
        }
        set.shutdown().await;
    })
}

/// Turns host and config notifications into controller actions.
fn spawn_host_watcher(
    ctrl: Weak<RunController>,
    mut host_rx: broadcast::Receiver<HostEvent>,
    mut cfg_rx: watch::Receiver<Arc<Config>>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut host_open = true;
        let mut cfg_open = true;

        while host_open || cfg_open {
            tokio::select! {
                _ = token.cancelled() => break,

                ev = host_rx.recv(), if host_open => {
                    let origin = match ev {
                        Ok(HostEvent::FocusChanged { focused: false }) => Some(StopOrigin::FocusLost),
                        Ok(HostEvent::ActiveDocumentChanged { .. }) => Some(StopOrigin::DocumentSwitched),
                        Ok(_) => None,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "host watcher lagged");
                            None
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            host_open = false;
                            None
                        }
                    };
                    if let Some(origin) = origin {
                        let Some(ctrl) = ctrl.upgrade() else { break };
                        ctrl.request_stop_from(origin);
                    }
                }

                changed = cfg_rx.changed(), if cfg_open => {
                    if changed.is_err() {
                        cfg_open = false;
                        continue;
                    }
                    let cfg = Arc::clone(&cfg_rx.borrow_and_update());
                    let Some(ctrl) = ctrl.upgrade() else { break };
                    ctrl.on_config(&cfg);
                }
            }
        }
    })
}

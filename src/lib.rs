//! # fixrunner
//!
//! **fixrunner** walks the problems an editor reports for a document and, one at
//! a time, moves the caret to each of them and opens a quick-fix UI. It waits
//! until the user applies a fix (the document changes), asks for the next
//! problem, stops the run, or lets the step time out.
//!
//! The crate owns the run-loop state machine only. Everything it needs from the
//! editor goes through the [`HostBridge`] trait, so it runs headless against
//! [`MemoryHost`] in tests and demos.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   host command ──► RunController::dispatch(Command)
//!                           │
//!                           ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  RunController (single-flight)                                    │
//! │  - RunState (phase, current index, run/step tokens)               │
//! │  - ConfigStore snapshot (read once per run)                       │
//! │  - ReentryPolicy (second trigger stops or is ignored)             │
//! │  - ResourceLedger (step handles created/disposed)                 │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!  select/traversal   run task (one)      host watcher
//!  (diagnostics)      step race           focus/doc switch ─► stop
//!                        │                config change    ─► OutputSink
//!                        ▼
//!               HostBridge (editor) ◄──── SuggestionSource (suggestion mode)
//!                        │
//!                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                           (per-sub queues)
//!                        ┌──────────┼──────────┐
//!                        ▼          ▼          ▼
//!                    LogWriter   worker2    workerN
//! ```
//!
//! ### Lifecycle
//! ```text
//! run() ──► start(RunRequest) ──► spawn drive(run)
//!
//! drive {
//!   ├─► running flag = true, output preamble (debug)
//!   ├─► targets = select(raw) reversed (last position first)
//!   ├─► no targets ─► invoke fallback fix once ─► NothingFound
//!   ├─► for each target:
//!   │     set_selection(range.end) ─► open fix UI
//!   │     race: stop │ next │ edit (debounced) │ timeout
//!   │     cleanup: timer, subscription, completion list, hide UI
//!   │     timeout in default mode ─► stop
//!   └─► hide UI, phase = Idle, running flag = false,
//!       "All Done" / "Runner Stopped", publish RunFinished
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                        |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------|
//! | **Controller**    | Start, advance and stop runs; host command ids.              | [`RunController`], [`Command`]            |
//! | **Diagnostics**   | Problem snapshots, filtering and traversal order.            | [`Diagnostic`], [`select`]                |
//! | **Host**          | Editor integration surface and an in-memory implementation. | [`HostBridge`], [`MemoryHost`]            |
//! | **Suggestions**   | Quick fixes as a transient completion list.                  | [`SuggestionSource`]                      |
//! | **Subscriber API**| Hook into run and step events.                               | [`Subscribe`], [`Event`]                  |
//! | **Configuration** | TOML settings and a live store.                              | [`Config`], [`ConfigStore`]               |
//! | **Errors**        | Typed errors for triggers, host calls and config.            | [`RunError`], [`HostError`], [`ConfigError`] |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use fixrunner::{
//!     Config, ConfigStore, Diagnostic, DocumentRef, MemoryHost, Range, RunController, RunOutcome,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = Arc::new(MemoryHost::new());
//!     let doc = DocumentRef::new("file:///demo.ts", "typescript");
//!     host.open(doc.clone(), Range::default());
//!     host.set_diagnostics(&doc, Vec::<Diagnostic>::new());
//!
//!     let config = ConfigStore::new(Config::default())?;
//!     let ctrl = RunController::builder(host.clone(), config).build();
//!
//!     let handle = ctrl.run()?.into_handle().expect("idle controller starts a run");
//!     let report = handle.wait().await.expect("run reports");
//!     assert_eq!(report.outcome, RunOutcome::NothingFound);
//!
//!     ctrl.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;
mod diagnostics;
mod error;
mod events;
mod host;
mod output;
mod runner;
mod subscribers;
mod suggest;

// ---- Public re-exports ----

pub use config::{Config, ConfigStore, MenuListMode};
pub use diagnostics::{
    Diagnostic, DiagnosticCode, Position, Range, Severity, on_line, select, sort_by_position,
    traversal_order,
};
pub use error::{ConfigError, HostError, RunError};
pub use events::{Bus, Event, EventKind};
pub use host::{
    ActiveEditor, CodeAction, CompletionEntry, DocumentRef, HostBridge, HostEvent, MemoryHost,
    OutputChannel, Registration,
};
pub use output::OutputSink;
pub use runner::{
    Admission, Command, Debounce, Origin, Phase, ResourceLedger, ReentryPolicy, RunController,
    RunControllerBuilder, RunHandle, RunOutcome, RunReport, RunRequest, StepSignal, StopOrigin,
    Tracked,
};
pub use subscribers::{Subscribe, SubscriberSet};
pub use suggest::{SuggestionSource, completion_entries};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

//! # Run controller and its state machine.
//!
//! A run walks the filtered diagnostics of one document from the last position
//! to the first. Each step moves the caret to a target, opens a fix UI and
//! waits until the user edits the document, asks for the next target, stops the
//! run, or lets the step time out.
//!
//! ## Contents
//! - [`RunController`] single-flight owner of the run state; entry point for hosts
//! - [`Command`] host command ids and [`RunController::dispatch`]
//! - [`ReentryPolicy`] what a start request does while a run is active
//! - [`Phase`], [`StepSignal`], [`RunOutcome`], [`StopOrigin`] run vocabulary
//! - [`RunRequest`], [`RunHandle`], [`RunReport`], [`Admission`] inputs and results
//! - [`Debounce`] trailing-edge coalescing of document edits
//! - [`ResourceLedger`] accounting of step-scoped handles

mod commands;
mod controller;
mod debounce;
mod ledger;
mod reentry;
mod request;
mod run;
mod state;
mod step;

pub use commands::Command;
pub use controller::{RunController, RunControllerBuilder};
pub use debounce::Debounce;
pub use ledger::{ResourceLedger, Tracked};
pub use reentry::ReentryPolicy;
pub use request::{Admission, Origin, RunHandle, RunReport, RunRequest};
pub use state::{Phase, RunOutcome, StepSignal, StopOrigin};

//! Inputs and results of a run.

use tokio::sync::oneshot;

use crate::{diagnostics::Diagnostic, host::DocumentRef};

use super::state::RunOutcome;

/// Where a run's diagnostics came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Every diagnostic of the document, subject to the enabled-id filter.
    FullDocument,
    /// Diagnostics on the caret line only; the enabled-id filter is bypassed.
    SingleLine,
}

/// A request to start a run over `diagnostics` in `document`.
#[derive(Clone, Debug)]
pub struct RunRequest {
    pub document: DocumentRef,
    pub diagnostics: Vec<Diagnostic>,
    pub origin: Origin,
}

impl RunRequest {
    pub fn full_document(document: DocumentRef, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            document,
            diagnostics,
            origin: Origin::FullDocument,
        }
    }

    pub fn single_line(document: DocumentRef, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            document,
            diagnostics,
            origin: Origin::SingleLine,
        }
    }
}

/// Summary of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub run: u64,
    pub outcome: RunOutcome,
    /// Steps that were entered.
    pub visited: usize,
    /// Targets after filtering.
    pub total: usize,
}

/// Handle to a started run.
///
/// Dropping it does not affect the run.
#[derive(Debug)]
pub struct RunHandle {
    run: u64,
    report: oneshot::Receiver<RunReport>,
}

impl RunHandle {
    pub(crate) fn new(run: u64, report: oneshot::Receiver<RunReport>) -> Self {
        Self { run, report }
    }

    pub fn id(&self) -> u64 {
        self.run
    }

    /// Waits for the run to end.
    ///
    /// Returns `None` if the run task was torn down before reporting.
    pub async fn wait(self) -> Option<RunReport> {
        self.report.await.ok()
    }
}

/// Result of a start request.
#[derive(Debug)]
pub enum Admission {
    /// A new run was started.
    Started(RunHandle),
    /// A run was active; it was asked to stop.
    StopRequested,
    /// A run was active; the request was ignored.
    Ignored,
}

impl Admission {
    /// The handle, if a run was started.
    pub fn into_handle(self) -> Option<RunHandle> {
        match self {
            Admission::Started(h) => Some(h),
            _ => None,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, Admission::Started(_))
    }
}

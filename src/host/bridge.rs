//! # Host collaborator surface.
//!
//! [`HostBridge`] is implemented once per editor integration. Calls that the
//! host may need to suspend on (command execution, code-action queries) are
//! async; the rest are synchronous so they can also run from `Drop` paths.
//!
//! ## Contract
//! - `invoke` must tolerate commands whose UI is not open (no-op, `Ok`).
//! - `subscribe` returns an **independent** receiver that only sees events sent
//!   after the call.
//! - `set_flag` is used on every terminal path of a run, including unwinding, so
//!   it must not block.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::{
    diagnostics::{Diagnostic, Position, Range},
    error::HostError,
    host::Registration,
};

/// Identity of an open document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    /// Stable document identifier (usually a URI).
    pub id: Arc<str>,
    /// Language identifier, used to scope completion registrations.
    pub language: Arc<str>,
}

impl DocumentRef {
    pub fn new(id: impl Into<Arc<str>>, language: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            language: language.into(),
        }
    }
}

/// The focused editor at trigger time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveEditor {
    pub document: DocumentRef,
    /// Current selection; a caret is an empty range.
    pub selection: Range,
}

/// A fix the host can apply at a range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeAction {
    pub title: String,
    /// Hierarchical kind, e.g. `quickfix` or `refactor.extract`.
    pub kind: Option<String>,
}

impl CodeAction {
    pub fn new(title: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            title: title.into(),
            kind: kind.map(str::to_string),
        }
    }

    pub fn quickfix(title: impl Into<String>) -> Self {
        Self::new(title, Some("quickfix"))
    }

    /// True for `quickfix` and any `quickfix.*` sub-kind.
    pub fn is_quickfix(&self) -> bool {
        match self.kind.as_deref() {
            Some(kind) => kind == "quickfix" || kind.starts_with("quickfix."),
            None => false,
        }
    }
}

/// One selectable entry of a transient completion list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionEntry {
    pub label: String,
    /// Diagnostic source/code the entry belongs to.
    pub detail: String,
    pub documentation: String,
}

/// Notifications the host pushes to the runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A document received an edit; may fire several times per logical edit.
    DocumentChanged {
        document: Arc<str>,
        changes: Vec<Range>,
    },
    /// The host window gained or lost focus.
    FocusChanged { focused: bool },
    /// The user switched to another document (or none).
    ActiveDocumentChanged { document: Option<Arc<str>> },
}

/// Backing channel for debug output.
pub trait OutputChannel: Send + Sync {
    fn append_line(&self, line: &str);
    fn clear(&self);
    fn show(&self, preserve_focus: bool);
    fn dispose(self: Box<Self>);
}

/// Contract for editor integrations.
#[async_trait]
pub trait HostBridge: Send + Sync + 'static {
    /// Returns the focused editor, if any.
    fn active_editor(&self) -> Option<ActiveEditor>;

    /// Snapshot of the diagnostics currently reported for `document`.
    fn diagnostics(&self, document: &DocumentRef) -> Vec<Diagnostic>;

    /// Moves the caret (empty selection) to `at`.
    fn set_selection(&self, document: &DocumentRef, at: Position) -> Result<(), HostError>;

    /// Executes a host command.
    async fn invoke(&self, command: &str) -> Result<(), HostError>;

    /// Lists the code actions available at `range`.
    async fn code_actions(
        &self,
        document: &DocumentRef,
        range: Range,
    ) -> Result<Vec<CodeAction>, HostError>;

    /// Registers a completion list for `document`'s language.
    ///
    /// The list stays visible to completion requests until the returned
    /// [`Registration`] is disposed or dropped.
    fn register_completions(
        &self,
        document: &DocumentRef,
        entries: Vec<CompletionEntry>,
    ) -> Result<Registration, HostError>;

    /// Sets a context flag used for conditional command enablement.
    fn set_flag(&self, name: &str, value: bool);

    /// Shows a short status notification.
    fn notify(&self, message: &str);

    /// Creates a named output channel.
    fn create_output_channel(&self, name: &str) -> Box<dyn OutputChannel>;

    /// Subscribes to host notifications.
    fn subscribe(&self) -> broadcast::Receiver<HostEvent>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

//! # In-memory host.
//!
//! [`MemoryHost`] implements [`HostBridge`] over plain data. It records every
//! call the runner makes (selections, invocations, flags, notifications,
//! completion registrations, output lines) and lets the caller push synthetic
//! [`HostEvent`]s. Used by the scripted demo and by the controller tests.
//!
//! ## Example
//! ```rust
//! use fixrunner::{Diagnostic, DocumentRef, HostBridge, MemoryHost, Range};
//!
//! let host = MemoryHost::new();
//! let doc = DocumentRef::new("file:///a.rs", "rust");
//! host.open(doc.clone(), Range::default());
//! host.set_diagnostics(&doc, vec![Diagnostic::new(Range::from_coords(1, 0, 1, 4))]);
//!
//! assert_eq!(host.diagnostics(&doc).len(), 1);
//! ```

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::{
    diagnostics::{Diagnostic, Position, Range},
    error::HostError,
    host::{
        ActiveEditor, CodeAction, CompletionEntry, DocumentRef, HostBridge, HostEvent,
        OutputChannel, Registration,
    },
};

const EVENT_CAPACITY: usize = 256;

#[derive(Default)]
struct State {
    active: Option<ActiveEditor>,
    diagnostics: HashMap<Arc<str>, Vec<Diagnostic>>,
    code_actions: Vec<CodeAction>,
    failing: HashSet<String>,

    selections: Vec<Position>,
    invocations: Vec<String>,
    flags: HashMap<String, bool>,
    flag_history: Vec<(String, bool)>,
    calls: Vec<String>,
    notifications: Vec<String>,

    next_registration: u64,
    completions: BTreeMap<u64, Vec<CompletionEntry>>,
    registrations_created: usize,
    registrations_disposed: usize,

    output_lines: Vec<String>,
    output_channels_live: usize,
    output_channels_created: usize,
}

/// Editor host backed by in-process data.
pub struct MemoryHost {
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<HostEvent>,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(State::default())),
            events,
        }
    }

    // ---- scripting ----

    /// Makes `document` the active editor with the given selection.
    pub fn open(&self, document: DocumentRef, selection: Range) {
        self.state.lock().active = Some(ActiveEditor {
            document,
            selection,
        });
    }

    /// Removes the active editor.
    pub fn close_active(&self) {
        self.state.lock().active = None;
    }

    pub fn set_diagnostics(&self, document: &DocumentRef, diagnostics: Vec<Diagnostic>) {
        self.state
            .lock()
            .diagnostics
            .insert(Arc::clone(&document.id), diagnostics);
    }

    /// Code actions returned for any range.
    pub fn set_code_actions(&self, actions: Vec<CodeAction>) {
        self.state.lock().code_actions = actions;
    }

    /// Makes `command` fail on every invocation.
    pub fn fail_command(&self, command: impl Into<String>) {
        self.state.lock().failing.insert(command.into());
    }

    /// Emits a document edit notification.
    pub fn edit(&self, document: &str, changes: Vec<Range>) {
        self.emit(HostEvent::DocumentChanged {
            document: document.into(),
            changes,
        });
    }

    /// Emits a window focus notification.
    pub fn set_focus(&self, focused: bool) {
        self.emit(HostEvent::FocusChanged { focused });
    }

    /// Switches the active document and emits the notification.
    pub fn switch_document(&self, document: Option<DocumentRef>) {
        let id = document.as_ref().map(|d| Arc::clone(&d.id));
        {
            let mut st = self.state.lock();
            st.active = document.map(|document| ActiveEditor {
                document,
                selection: Range::default(),
            });
        }
        self.emit(HostEvent::ActiveDocumentChanged { document: id });
    }

    pub fn emit(&self, event: HostEvent) {
        let _ = self.events.send(event);
    }

    // ---- inspection ----

    pub fn selections(&self) -> Vec<Position> {
        self.state.lock().selections.clone()
    }

    pub fn invocations(&self) -> Vec<String> {
        self.state.lock().invocations.clone()
    }

    /// Number of times `command` was invoked.
    pub fn invocation_count(&self, command: &str) -> usize {
        self.state
            .lock()
            .invocations
            .iter()
            .filter(|c| c.as_str() == command)
            .count()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.state.lock().flags.get(name).copied()
    }

    /// Invocations and flag changes interleaved in call order,
    /// as `invoke <command>` and `flag <name>=<value>`.
    pub fn call_log(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Every `set_flag` call in order.
    pub fn flag_history(&self) -> Vec<(String, bool)> {
        self.state.lock().flag_history.clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.state.lock().notifications.clone()
    }

    /// Entries of all completion lists still registered, in registration order.
    pub fn completion_entries(&self) -> Vec<CompletionEntry> {
        self.state
            .lock()
            .completions
            .values()
            .flatten()
            .cloned()
            .collect()
    }

    /// `(created, disposed)` completion registrations.
    pub fn registration_counts(&self) -> (usize, usize) {
        let st = self.state.lock();
        (st.registrations_created, st.registrations_disposed)
    }

    pub fn output_lines(&self) -> Vec<String> {
        self.state.lock().output_lines.clone()
    }

    /// `(live, created)` output channels.
    pub fn output_channel_counts(&self) -> (usize, usize) {
        let st = self.state.lock();
        (st.output_channels_live, st.output_channels_created)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostBridge for MemoryHost {
    fn active_editor(&self) -> Option<ActiveEditor> {
        self.state.lock().active.clone()
    }

    fn diagnostics(&self, document: &DocumentRef) -> Vec<Diagnostic> {
        self.state
            .lock()
            .diagnostics
            .get(&document.id)
            .cloned()
            .unwrap_or_default()
    }

    fn set_selection(&self, document: &DocumentRef, at: Position) -> Result<(), HostError> {
        let mut st = self.state.lock();
        match st.active.as_mut() {
            Some(editor) if editor.document.id == document.id => {
                editor.selection = Range::new(at, at);
                st.selections.push(at);
                Ok(())
            }
            _ => Err(HostError::DocumentUnavailable(document.id.to_string())),
        }
    }

    async fn invoke(&self, command: &str) -> Result<(), HostError> {
        let mut st = self.state.lock();
        st.invocations.push(command.to_string());
        st.calls.push(format!("invoke {command}"));
        if st.failing.contains(command) {
            return Err(HostError::Command {
                command: command.to_string(),
                reason: "rejected by host".to_string(),
            });
        }
        Ok(())
    }

    async fn code_actions(
        &self,
        _document: &DocumentRef,
        _range: Range,
    ) -> Result<Vec<CodeAction>, HostError> {
        Ok(self.state.lock().code_actions.clone())
    }

    fn register_completions(
        &self,
        _document: &DocumentRef,
        entries: Vec<CompletionEntry>,
    ) -> Result<Registration, HostError> {
        let id = {
            let mut st = self.state.lock();
            let id = st.next_registration;
            st.next_registration += 1;
            st.registrations_created += 1;
            st.completions.insert(id, entries);
            id
        };

        let state = Arc::clone(&self.state);
        Ok(Registration::new(move || {
            let mut st = state.lock();
            if st.completions.remove(&id).is_some() {
                st.registrations_disposed += 1;
            }
        }))
    }

    fn set_flag(&self, name: &str, value: bool) {
        let mut st = self.state.lock();
        st.flags.insert(name.to_string(), value);
        st.flag_history.push((name.to_string(), value));
        st.calls.push(format!("flag {name}={value}"));
    }

    fn notify(&self, message: &str) {
        self.state.lock().notifications.push(message.to_string());
    }

    fn create_output_channel(&self, _name: &str) -> Box<dyn OutputChannel> {
        {
            let mut st = self.state.lock();
            st.output_channels_live += 1;
            st.output_channels_created += 1;
        }
        Box::new(MemoryChannel {
            state: Arc::clone(&self.state),
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.events.subscribe()
    }

    fn name(&self) -> &'static str {
        "MemoryHost"
    }
}

struct MemoryChannel {
    state: Arc<Mutex<State>>,
}

impl OutputChannel for MemoryChannel {
    fn append_line(&self, line: &str) {
        self.state.lock().output_lines.push(line.to_string());
    }

    fn clear(&self) {
        self.state.lock().output_lines.clear();
    }

    fn show(&self, _preserve_focus: bool) {}

    fn dispose(self: Box<Self>) {
        let mut st = self.state.lock();
        st.output_channels_live = st.output_channels_live.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> DocumentRef {
        DocumentRef::new("mem://a", "rust")
    }

    #[test]
    fn selection_requires_active_document() {
        let host = MemoryHost::new();
        let err = host.set_selection(&doc(), Position::new(1, 1)).unwrap_err();
        assert_eq!(err.as_label(), "host_document_unavailable");

        host.open(doc(), Range::default());
        host.set_selection(&doc(), Position::new(1, 1)).unwrap();
        assert_eq!(host.selections(), vec![Position::new(1, 1)]);
    }

    #[tokio::test]
    async fn failing_commands_are_still_recorded() {
        let host = MemoryHost::new();
        host.fail_command("boom");

        assert!(host.invoke("boom").await.is_err());
        assert!(host.invoke("fine").await.is_ok());
        assert_eq!(host.invocations(), vec!["boom".to_string(), "fine".to_string()]);
    }

    #[test]
    fn dropping_a_registration_unlists_entries() {
        let host = MemoryHost::new();
        let entry = CompletionEntry {
            label: "Fix".into(),
            detail: "E1".into(),
            documentation: "Fix".into(),
        };
        let reg = host.register_completions(&doc(), vec![entry]).unwrap();
        assert_eq!(host.completion_entries().len(), 1);

        drop(reg);
        assert!(host.completion_entries().is_empty());
        assert_eq!(host.registration_counts(), (1, 1));
    }

    #[tokio::test]
    async fn subscribers_receive_scripted_events() {
        let host = MemoryHost::new();
        let mut rx = host.subscribe();

        host.set_focus(false);
        assert_eq!(rx.recv().await.unwrap(), HostEvent::FocusChanged { focused: false });
    }
}

//! Host bridge: everything the runner needs from the editor.
//!
//! The controller never talks to an editor directly. It positions the caret,
//! invokes commands, lists code actions, registers transient completion lists and
//! listens for notifications through [`HostBridge`]. This keeps the state machine
//! testable without any live UI.
//!
//! ## Contents
//! - [`HostBridge`] the collaborator surface (async where the host may suspend)
//! - [`HostEvent`] document/focus/active-document notifications
//! - [`Registration`] RAII handle for anything the host must unregister
//! - [`OutputChannel`] backing channel for debug output
//! - [`MemoryHost`] complete in-memory implementation (demos, tests, headless use)

mod bridge;
mod memory;
mod registration;

pub use bridge::{
    ActiveEditor, CodeAction, CompletionEntry, DocumentRef, HostBridge, HostEvent, OutputChannel,
};
pub use memory::MemoryHost;
pub use registration::Registration;

//! Suggestion-list adapter.
//!
//! In [`MenuListMode::Suggestion`](crate::MenuListMode::Suggestion) the runner does
//! not open the host's quick-fix menu. Instead it lists the quick fixes available
//! at the target as a transient completion list and triggers the completion UI.
//!
//! ## Contents
//! - [`SuggestionSource`] builds and registers the list; returns a [`Registration`](crate::Registration)
//! - [`completion_entries`] the pure action → entry mapping

mod source;

pub use source::{SuggestionSource, completion_entries};

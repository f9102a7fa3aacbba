//! # Transient completion list of quick fixes.
//!
//! ## Flow
//! ```text
//! present(doc, range, label, exclusion)
//!   ├─► host.code_actions(doc, range)
//!   ├─► keep kind == quickfix (or quickfix.*)
//!   ├─► drop titles matching `exclusion`
//!   └─► host.register_completions(doc, entries) ──► Registration
//! ```
//!
//! ## Rules
//! - Entries carry the diagnostic label in `detail` for display only.
//! - Picking an entry does **not** apply the underlying fix: the host would apply
//!   it against the completion's replacement range, not the diagnostic's.
//! - Disposing the returned registration removes the list so it never leaks into
//!   unrelated completion requests.

use std::sync::Arc;

use regex::Regex;

use crate::{
    diagnostics::Range,
    error::HostError,
    host::{CodeAction, CompletionEntry, DocumentRef, HostBridge, Registration},
};

/// Presents quick fixes as a selectable completion list.
#[derive(Clone)]
pub struct SuggestionSource {
    host: Arc<dyn HostBridge>,
}

impl SuggestionSource {
    pub fn new(host: Arc<dyn HostBridge>) -> Self {
        Self { host }
    }

    /// Registers the quick fixes available at `range` as completion entries.
    pub async fn present(
        &self,
        document: &DocumentRef,
        range: Range,
        filter_label: &str,
        exclusion: Option<&Regex>,
    ) -> Result<Registration, HostError> {
        let actions = self.host.code_actions(document, range).await?;
        let entries = completion_entries(&actions, filter_label, exclusion);
        tracing::trace!(
            document = %document.id,
            %range,
            offered = actions.len(),
            listed = entries.len(),
            "presenting suggestions"
        );
        self.host.register_completions(document, entries)
    }
}

/// Maps code actions to completion entries (quick fixes only, exclusions dropped).
pub fn completion_entries(
    actions: &[CodeAction],
    filter_label: &str,
    exclusion: Option<&Regex>,
) -> Vec<CompletionEntry> {
    actions
        .iter()
        .filter(|a| a.is_quickfix())
        .filter(|a| !exclusion.is_some_and(|re| re.is_match(&a.title)))
        .map(|a| CompletionEntry {
            label: a.title.clone(),
            detail: filter_label.to_string(),
            documentation: a.title.clone(),
        })
        .collect()
}

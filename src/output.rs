//! # Debug output sink.
//!
//! [`OutputSink`] owns the (optional) host output channel that receives a trace
//! of every run when `debug` is on. The channel exists iff debug output is
//! enabled; [`OutputSink::reset`] creates or tears it down when the flag flips, so
//! at most one backing channel is alive at any time.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    diagnostics::Diagnostic,
    host::{HostBridge, OutputChannel},
};

/// Conditional debug log backed by a host output channel.
pub struct OutputSink {
    host: Arc<dyn HostBridge>,
    name: String,
    channel: Mutex<Option<Box<dyn OutputChannel>>>,
}

impl OutputSink {
    /// Channel title used by [`RunController`](crate::RunController).
    pub const DEFAULT_NAME: &'static str = "Problems Fix Runner";

    /// Creates a sink; the channel is created by the first `reset(true)`.
    pub fn new(host: Arc<dyn HostBridge>, name: impl Into<String>) -> Self {
        Self {
            host,
            name: name.into(),
            channel: Mutex::new(None),
        }
    }

    /// Aligns the backing channel with `debug`.
    ///
    /// No-op if the channel state already matches.
    pub fn reset(&self, debug: bool) {
        let mut slot = self.channel.lock();
        match (slot.is_some(), debug) {
            (false, true) => {
                *slot = Some(self.host.create_output_channel(&self.name));
                tracing::debug!(channel = %self.name, "debug output enabled");
            }
            (true, false) => {
                if let Some(channel) = slot.take() {
                    channel.dispose();
                }
                tracing::debug!(channel = %self.name, "debug output disabled");
            }
            _ => {}
        }
    }

    /// True if a backing channel exists.
    pub fn is_enabled(&self) -> bool {
        self.channel.lock().is_some()
    }

    /// Brings the channel up (without stealing focus) and clears the previous run.
    pub fn begin_run(&self) {
        if let Some(channel) = self.channel.lock().as_ref() {
            channel.show(true);
            channel.clear();
        }
    }

    /// Appends a formatted diagnostic; no-op when debug output is off.
    pub fn record(&self, d: &Diagnostic) {
        let slot = self.channel.lock();
        let Some(channel) = slot.as_ref() else {
            return;
        };
        channel.append_line(&format!("source: {}", d.source.as_deref().unwrap_or("")));
        channel.append_line(&format!("code: {}", d.code_text().unwrap_or_default()));
        channel.append_line(&format!("message: {}", d.message));
        channel.append_line(&format!("severity: {}", d.severity.as_str()));
        channel.append_line("--------------------");
    }

    /// Appends a free-form line; no-op when debug output is off.
    pub fn line(&self, text: &str) {
        if let Some(channel) = self.channel.lock().as_ref() {
            channel.append_line(text);
        }
    }
}

impl Drop for OutputSink {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.get_mut().take() {
            channel.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::{Range, Severity},
        host::MemoryHost,
    };
    use pretty_assertions::assert_eq;

    fn sink() -> (Arc<MemoryHost>, OutputSink) {
        let host = Arc::new(MemoryHost::new());
        let sink = OutputSink::new(host.clone(), OutputSink::DEFAULT_NAME);
        (host, sink)
    }

    #[test]
    fn record_is_noop_without_debug() {
        let (host, sink) = sink();
        sink.record(&Diagnostic::new(Range::default()).with_message("x"));
        assert!(host.output_lines().is_empty());
        assert_eq!(host.output_channel_counts(), (0, 0));
    }

    #[test]
    fn records_formatted_diagnostic() {
        let (host, sink) = sink();
        sink.reset(true);
        sink.record(
            &Diagnostic::new(Range::default())
                .with_source("eslint")
                .with_code("semi")
                .with_severity(Severity::Warning)
                .with_message("Missing semicolon."),
        );

        assert_eq!(
            host.output_lines(),
            vec![
                "source: eslint".to_string(),
                "code: semi".to_string(),
                "message: Missing semicolon.".to_string(),
                "severity: warning".to_string(),
                "--------------------".to_string(),
            ]
        );
    }

    #[test]
    fn at_most_one_channel_across_flips() {
        let (host, sink) = sink();
        sink.reset(true);
        sink.reset(true);
        assert_eq!(host.output_channel_counts(), (1, 1));

        sink.reset(false);
        assert_eq!(host.output_channel_counts(), (0, 1));
        assert!(!sink.is_enabled());

        sink.reset(true);
        assert_eq!(host.output_channel_counts(), (1, 2));

        drop(sink);
        assert_eq!(host.output_channel_counts(), (0, 2));
    }

    #[test]
    fn begin_run_clears_previous_trace() {
        let (host, sink) = sink();
        sink.reset(true);
        sink.line("old");
        sink.begin_run();
        sink.line("new");
        assert_eq!(host.output_lines(), vec!["new".to_string()]);
    }
}

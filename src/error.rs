//! Error types used by the fix runner and its host collaborators.
//!
//! This module defines three error enums:
//!
//! - [`RunError`] errors surfaced at the trigger boundary (`run`, `run_for_line`).
//! - [`HostError`] failures reported by the editor host; absorbed inside a step.
//! - [`ConfigError`] malformed configuration, raised when a config is read.
//!
//! All of them provide `as_label` / `as_message` helpers for logs and status lines.

use std::path::PathBuf;

use thiserror::Error;

/// # Errors surfaced to whoever triggered a run.
///
/// Only precondition and configuration failures cross this boundary; everything
/// that happens inside a step is folded into the run's state transitions.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RunError {
    /// There is no active editor/document to process.
    #[error("no active editor")]
    NoActiveEditor,

    /// Configuration could not be used for this run.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RunError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fixrunner::RunError;
    ///
    /// assert_eq!(RunError::NoActiveEditor.as_label(), "run_no_active_editor");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunError::NoActiveEditor => "run_no_active_editor",
            RunError::Config(_) => "run_config",
        }
    }

    /// Returns a short human-readable message suitable for a status notification.
    pub fn as_message(&self) -> String {
        match self {
            RunError::NoActiveEditor => "No active editor".to_string(),
            RunError::Config(e) => e.as_message(),
        }
    }
}

/// # Errors reported by the editor host.
///
/// Commands must tolerate being invoked with no matching UI open, so these are
/// genuine failures (command rejected, document gone, host shut down).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A command invocation threw or was rejected.
    #[error("command '{command}' failed: {reason}")]
    Command {
        /// Command identifier.
        command: String,
        /// Host-provided reason.
        reason: String,
    },

    /// The target document is no longer available.
    #[error("document '{0}' unavailable")]
    DocumentUnavailable(String),
}

impl HostError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HostError::Command { .. } => "host_command_failed",
            HostError::DocumentUnavailable(_) => "host_document_unavailable",
        }
    }
}

/// # Configuration errors.
///
/// Raised when configuration is parsed or replaced, never in the middle of a run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid TOML for [`Config`](crate::Config).
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but out of range.
    #[error("invalid config value for '{field}': {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fixrunner::ConfigError;
    ///
    /// let err = ConfigError::Invalid { field: "wait_for_secs", reason: "must be > 0".into() };
    /// assert_eq!(err.as_label(), "config_invalid");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "config_read",
            ConfigError::Parse(_) => "config_parse",
            ConfigError::Invalid { .. } => "config_invalid",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::Read { path, .. } => format!("cannot read {}", path.display()),
            ConfigError::Parse(e) => format!("malformed config: {}", e.message()),
            ConfigError::Invalid { field, reason } => format!("{field}: {reason}"),
        }
    }
}

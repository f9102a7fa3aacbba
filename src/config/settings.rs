//! # Runner settings.
//!
//! Provides [`Config`], the settings a run is driven by.
//!
//! Config is used in three ways:
//! 1. **Target selection**: `enabled_ids` feeds [`select`](crate::diagnostics::select)
//! 2. **Step behavior**: wait time, menu mode, debounce window, command ids
//! 3. **Debug output**: `debug` decides whether the output channel exists
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use fixrunner::{Config, MenuListMode};
//!
//! let cfg = Config::from_toml_str(r#"
//!     enabled_ids = ["eslint", "E501"]
//!     wait_for_secs = 2.5
//!     menu_list_mode = "suggestion"
//! "#).unwrap();
//!
//! assert_eq!(cfg.wait_for(), Duration::from_millis(2500));
//! assert_eq!(cfg.menu_list_mode, MenuListMode::Suggestion);
//! ```

use std::{path::Path, time::Duration};

use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;

/// How a fix is offered at each diagnostic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuListMode {
    /// Open the host's interactive quick-fix menu directly.
    #[default]
    Default,
    /// Present the available fixes as a transient completion list.
    Suggestion,
}

/// Settings consumed by the run controller.
///
/// ## Field semantics
/// - `enabled_ids`: diagnostic sources/codes the runner acts on
/// - `wait_for_secs`: per-step wait before giving up on a user action (`> 0`)
/// - `menu_list_mode`: direct quick-fix menu or suggestion list
/// - `debug`: keep a debug output channel and trace every run into it
/// - `default_fix_command`: interactive fix command, also the "nothing found" fallback
/// - `suggest_command`: command that opens the completion list in suggestion mode
/// - `hide_commands`: commands that close any open suggestion/action UI
/// - `exclude_patterns`: regex alternatives; matching fix titles are not listed
/// - `debounce_ms`: quiet window that coalesces multi-part document edits (`> 0`)
/// - `running_flag`: context flag name exposed to the host while a run is active
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub enabled_ids: Vec<String>,
    pub wait_for_secs: f64,
    pub menu_list_mode: MenuListMode,
    pub debug: bool,
    pub default_fix_command: String,
    pub suggest_command: String,
    pub hide_commands: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub debounce_ms: u64,
    pub running_flag: String,
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - nothing enabled (every full-document run reports "nothing found")
    /// - `wait_for_secs = 5.0`
    /// - `menu_list_mode = default`
    /// - `debounce_ms = 50`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            enabled_ids: Vec::new(),
            wait_for_secs: 5.0,
            menu_list_mode: MenuListMode::Default,
            debug: false,
            default_fix_command: "editor.action.quickFix".to_string(),
            suggest_command: "editor.action.triggerSuggest".to_string(),
            hide_commands: vec!["hideSuggestWidget".to_string()],
            exclude_patterns: Vec::new(),
            debounce_ms: 50,
            running_flag: "fixRunnerIsRunning".to_string(),
            bus_capacity: 256,
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every value a run depends on.
    ///
    /// Called whenever a config is read or replaced so that bad values fail
    /// fast instead of surfacing halfway through a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.wait_for_secs.is_finite() || self.wait_for_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "wait_for_secs",
                reason: format!("must be a positive number of seconds, got {}", self.wait_for_secs),
            });
        }
        if Duration::try_from_secs_f64(self.wait_for_secs).is_err() {
            return Err(ConfigError::Invalid {
                field: "wait_for_secs",
                reason: format!("{} seconds does not fit in a duration", self.wait_for_secs),
            });
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "debounce_ms",
                reason: "must be > 0".to_string(),
            });
        }
        for (field, value) in [
            ("default_fix_command", &self.default_fix_command),
            ("suggest_command", &self.suggest_command),
            ("running_flag", &self.running_flag),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        self.exclusion()?;
        Ok(())
    }

    /// Per-step wait as a [`Duration`].
    #[inline]
    pub fn wait_for(&self) -> Duration {
        Duration::from_secs_f64(self.wait_for_secs)
    }

    /// Debounce quiet window as a [`Duration`].
    #[inline]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Compiles `exclude_patterns` into one alternation.
    ///
    /// - `Ok(None)` → nothing is excluded
    /// - `Ok(Some(re))` → titles matching `re` are dropped
    pub fn exclusion(&self) -> Result<Option<Regex>, ConfigError> {
        if self.exclude_patterns.is_empty() {
            return Ok(None);
        }
        let alternation = self
            .exclude_patterns
            .iter()
            .map(|p| format!("(?:{p})"))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternation)
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                field: "exclude_patterns",
                reason: e.to_string(),
            })
    }

    /// True if `id` names an enabled source or code.
    #[inline]
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled_ids.iter().any(|e| e == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn parses_all_fields() {
        let cfg = Config::from_toml_str(
            r#"
            enabled_ids = ["eslint"]
            wait_for_secs = 1
            menu_list_mode = "suggestion"
            debug = true
            default_fix_command = "fix"
            suggest_command = "suggest"
            hide_commands = ["hide.a", "hide.b"]
            exclude_patterns = ["^Disable", "Ignore"]
            debounce_ms = 20
            running_flag = "busy"
            bus_capacity = 8
            "#,
        )
        .unwrap();

        assert_eq!(cfg.enabled_ids, vec!["eslint".to_string()]);
        assert_eq!(cfg.wait_for(), Duration::from_secs(1));
        assert_eq!(cfg.menu_list_mode, MenuListMode::Suggestion);
        assert!(cfg.debug);
        assert_eq!(cfg.hide_commands.len(), 2);
        assert_eq!(cfg.debounce_window(), Duration::from_millis(20));
        assert_eq!(cfg.running_flag, "busy");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg = Config::from_toml_str("debug = true").unwrap();
        assert_eq!(cfg.wait_for_secs, 5.0);
        assert_eq!(cfg.default_fix_command, "editor.action.quickFix");
    }

    #[test]
    fn rejects_non_positive_wait() {
        for text in ["wait_for_secs = 0", "wait_for_secs = -3.0", "wait_for_secs = nan"] {
            let err = Config::from_toml_str(text).unwrap_err();
            assert_eq!(err.as_label(), "config_invalid", "input: {text}");
        }
    }

    #[test]
    fn rejects_overflowing_wait() {
        let err = Config::from_toml_str("enabled_ids = [\"E1\"]\nwait_for_secs = 1e20").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "wait_for_secs", .. }));

        let cfg = Config {
            wait_for_secs: f64::MAX,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_debounce() {
        let err = Config::from_toml_str("debounce_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "debounce_ms", .. }));
    }

    #[test]
    fn rejects_empty_command() {
        let err = Config::from_toml_str("default_fix_command = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "default_fix_command", .. }));
    }

    #[test]
    fn rejects_bad_exclusion_pattern() {
        let err = Config::from_toml_str("exclude_patterns = [\"(unclosed\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "exclude_patterns", .. }));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = Config::from_toml_str("wait_for = 3").unwrap_err();
        assert_eq!(err.as_label(), "config_parse");
    }

    #[test]
    fn empty_exclusion_excludes_nothing() {
        assert!(Config::default().exclusion().unwrap().is_none());
    }

    #[test]
    fn exclusion_is_an_alternation() {
        let cfg = Config {
            exclude_patterns: vec!["^Disable".into(), "for this line$".into()],
            ..Config::default()
        };
        let re = cfg.exclusion().unwrap().unwrap();
        assert!(re.is_match("Disable no-unused-vars"));
        assert!(re.is_match("Ignore for this line"));
        assert!(!re.is_match("Remove unused variable"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enabled_ids = [\"clippy\"]\nwait_for_secs = 0.5").unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert!(cfg.is_enabled("clippy"));
        assert_eq!(cfg.wait_for(), Duration::from_millis(500));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert_eq!(err.as_label(), "config_read");
    }
}

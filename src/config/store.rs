//! # Live configuration cell.
//!
//! [`ConfigStore`] wraps a [`tokio::sync::watch`] channel holding `Arc<Config>`.
//! Hosts call [`ConfigStore::replace`] when their settings change; the controller
//! takes a [`snapshot`](ConfigStore::snapshot) at the start of every run and its
//! host watcher reacts to [`subscribe`](ConfigStore::subscribe) notifications.
//!
//! ## Rules
//! - Only validated configs are ever published.
//! - Readers never block writers (watch semantics: latest value wins).

use std::sync::Arc;

use tokio::sync::watch;

use crate::{config::Config, error::ConfigError};

/// Shared, validated configuration with change notifications.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    tx: Arc<watch::Sender<Arc<Config>>>,
}

impl ConfigStore {
    /// Creates a store after validating the initial value.
    pub fn new(initial: Config) -> Result<Self, ConfigError> {
        initial.validate()?;
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Ok(Self { tx: Arc::new(tx) })
    }

    /// Returns the config currently in effect.
    pub fn snapshot(&self) -> Arc<Config> {
        self.tx.borrow().clone()
    }

    /// Validates and publishes a new config.
    ///
    /// On error the previous value stays in effect.
    pub fn replace(&self, next: Config) -> Result<(), ConfigError> {
        next.validate()?;
        self.tx.send_replace(Arc::new(next));
        Ok(())
    }

    /// Creates a receiver that observes subsequent replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Config>> {
        self.tx.subscribe()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Config::default()));
        Self { tx: Arc::new(tx) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_initial_value() {
        let bad = Config {
            wait_for_secs: 0.0,
            ..Config::default()
        };
        assert!(ConfigStore::new(bad).is_err());
    }

    #[test]
    fn failed_replace_keeps_previous_value() {
        let store = ConfigStore::default();
        let bad = Config {
            debounce_ms: 0,
            ..Config::default()
        };

        assert!(store.replace(bad).is_err());
        assert_eq!(store.snapshot().debounce_ms, 50);
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let store = ConfigStore::default();
        let mut rx = store.subscribe();

        store
            .replace(Config {
                debug: true,
                ..Config::default()
            })
            .unwrap();

        rx.changed().await.unwrap();
        assert!(rx.borrow().debug);
        assert!(store.snapshot().debug);
    }
}

//! Runner configuration: values and the live store.
//!
//! ## Contents
//! - [`Config`] user-facing settings (TOML, validated on read)
//! - [`MenuListMode`] how a fix is offered at each step
//! - [`ConfigStore`] a `watch`-backed cell that publishes validated replacements
//!
//! ## Snapshot rule
//! A run reads the store **once** at its start and uses that snapshot until it
//! finishes. Replacing the config mid-run only affects the next run (and the
//! debug output channel, which is reset immediately).

mod settings;
mod store;

pub use settings::{Config, MenuListMode};
pub use store::ConfigStore;

//! # Event subscribers for the fix runner.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used by the controller to deliver [`Event`](crate::events::Event)s.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   run task ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                          │
//!                                                ┌─────────┼─────────┐
//!                                                ▼         ▼         ▼
//!                                            LogWriter  Metrics   Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use fixrunner::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct StopCounter;
//!
//! #[async_trait]
//! impl Subscribe for StopCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::StopRequested {
//!             // increment counter
//!         }
//!     }
//!     fn name(&self) -> &'static str { "stop-counter" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;

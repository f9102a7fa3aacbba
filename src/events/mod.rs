//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the run controller.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `RunController` (start/stop/reentry/config), the run task
//!   (step and run lifecycle), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the controller's subscriber listener (fans out to
//!   `SubscriberSet`) and anyone holding a receiver from `RunController::events`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

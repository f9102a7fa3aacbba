//! # Accounting for per-step host handles.
//!
//! Every handle a step acquires (timer, change subscription, completion
//! registration) is wrapped in a [`Tracked`] guard. The guard bumps `created`
//! on acquisition and `disposed` on drop, so after any number of runs
//! `created == disposed` holds iff nothing leaked.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters of acquired and released step handles.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    created: AtomicUsize,
    disposed: AtomicUsize,
}

impl ResourceLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wraps `value`; the ledger counts its release when the guard drops.
    pub fn track<T>(self: &Arc<Self>, value: T) -> Tracked<T> {
        self.created.fetch_add(1, Ordering::Relaxed);
        Tracked {
            value,
            ledger: Arc::clone(self),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn disposed(&self) -> usize {
        self.disposed.load(Ordering::Relaxed)
    }

    /// Handles currently alive.
    pub fn live(&self) -> usize {
        self.created().saturating_sub(self.disposed())
    }
}

/// A handle whose lifetime is recorded in a [`ResourceLedger`].
pub struct Tracked<T> {
    value: T,
    ledger: Arc<ResourceLedger>,
}

impl<T> Tracked<T> {
    /// Releases the handle now.
    pub fn release(self) {
        drop(self);
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.ledger.disposed.fetch_add(1, Ordering::Relaxed);
    }
}

//! # Disposable host registration.
//!
//! [`Registration`] owns the undo action for something registered with the host
//! (a completion list, a listener). Disposal runs **at most once**: either via
//! [`Registration::dispose`] or when the value is dropped.

use std::fmt;

type Disposer = Box<dyn FnOnce() + Send + 'static>;

/// RAII handle that unregisters on dispose/drop.
pub struct Registration {
    disposer: Option<Disposer>,
}

impl Registration {
    /// Wraps the action that undoes the registration.
    pub fn new(disposer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// A registration with nothing to undo.
    pub fn noop() -> Self {
        Self { disposer: None }
    }

    /// Unregisters now.
    pub fn dispose(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(f) = self.disposer.take() {
            f();
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("live", &self.disposer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn disposes_exactly_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let reg = Registration::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        reg.dispose();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_disposes() {
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let h = Arc::clone(&hits);
            let _reg = Registration::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

//! # Trailing-edge debounce for document edits.
//!
//! A burst of edits (one keystroke often arrives as several change events)
//! collapses into a single signal that fires `window` after the **last** edit.
//!
//! ```text
//! edits:    x  x x        x
//! time:   ──┼──┼─┼────────┼──────────►
//! fires:                 (skipped: reset)   ▲ last + window
//! ```
//!
//! [`Debounce`] is clock-agnostic: callers pass `now` and race
//! [`Debounce::deadline`] against their other signals.

use std::time::Duration;

use tokio::time::Instant;

/// Trailing-edge debounce state.
#[derive(Clone, Debug)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Records an edit at `now`, pushing the deadline out.
    pub fn push(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Instant at which the pending burst fires, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the pending burst if its deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    #[test]
    fn idle_never_fires() {
        let mut d = Debounce::new(WINDOW);
        assert!(!d.is_pending());
        assert!(!d.fire_if_due(Instant::now() + Duration::from_secs(10)));
    }

    #[test]
    fn fires_once_after_window() {
        let t0 = Instant::now();
        let mut d = Debounce::new(WINDOW);
        d.push(t0);

        assert!(!d.fire_if_due(t0 + Duration::from_millis(49)));
        assert!(d.fire_if_due(t0 + WINDOW));
        assert!(!d.fire_if_due(t0 + WINDOW * 2));
    }

    #[test]
    fn burst_collapses_to_last_edit() {
        let t0 = Instant::now();
        let mut d = Debounce::new(WINDOW);
        d.push(t0);
        d.push(t0 + Duration::from_millis(30));
        d.push(t0 + Duration::from_millis(60));

        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(110)));
        assert!(!d.fire_if_due(t0 + Duration::from_millis(100)));
        assert!(d.fire_if_due(t0 + Duration::from_millis(110)));
    }
}

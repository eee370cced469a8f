//! Trailing-edge debouncing for editor change events.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces bursts of changes into one action after a quiet period.
///
/// Driven by polling: every [`trigger`](Self::trigger) pushes the deadline
/// out, and [`poll`](Self::poll) reports `true` once when it passes. At most
/// one deadline is ever pending.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the deadline, superseding any pending one.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarm and report whether anything was pending, regardless of time.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_new_debouncer_is_idle() {
        let mut debouncer = Debouncer::default();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(Instant::now()));
        assert_eq!(debouncer.delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(100 * MS);

        debouncer.trigger(start);

        assert!(!debouncer.poll(start + 99 * MS));
        assert!(debouncer.poll(start + 100 * MS));
        assert!(!debouncer.poll(start + 500 * MS));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_retrigger_supersedes_pending_deadline() {
        // Given changes 0ms, 80ms and 160ms apart with a 100ms window
        let start = Instant::now();
        let mut debouncer = Debouncer::new(100 * MS);
        debouncer.trigger(start);
        debouncer.trigger(start + 80 * MS);
        debouncer.trigger(start + 160 * MS);

        // Then nothing fires until 100ms after the last one, and only once
        assert!(!debouncer.poll(start + 200 * MS));
        assert!(debouncer.poll(start + 260 * MS));
        assert!(!debouncer.poll(start + 1000 * MS));
    }

    #[test]
    fn test_cancel_drops_pending_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(100 * MS);
        debouncer.trigger(start);

        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + 1000 * MS));
    }

    #[test]
    fn test_take_reports_and_clears() {
        let mut debouncer = Debouncer::default();
        assert!(!debouncer.take());

        debouncer.trigger(Instant::now());

        assert!(debouncer.take());
        assert!(!debouncer.is_pending());
    }
}

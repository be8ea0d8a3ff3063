//! Cancel-and-reschedule deadline used after IME composition ends.
//!
//! The timer never fires on its own. Callers pass the current instant and ask
//! whether the window is still open, which keeps the conversation state
//! machine deterministic under test.

use std::time::{Duration, Instant};

/// A single restartable quiet window.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    /// Create an idle timer with the given window length.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Start the window at `now`, replacing any pending one.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Drop any pending window.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether the window is still open at `now`.
    pub fn is_pending(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    #[test]
    fn test_idle_timer_is_not_pending() {
        let timer = Debounce::new(WINDOW);
        assert!(!timer.is_pending(Instant::now()));
    }

    #[test]
    fn test_window_closes_after_duration() {
        let start = Instant::now();
        let mut timer = Debounce::new(WINDOW);
        timer.restart(start);

        assert!(timer.is_pending(start));
        assert!(timer.is_pending(start + Duration::from_millis(49)));
        assert!(!timer.is_pending(start + WINDOW));
        assert!(!timer.is_pending(start + Duration::from_millis(120)));
    }

    #[test]
    fn test_restart_extends_window() {
        let start = Instant::now();
        let mut timer = Debounce::new(WINDOW);
        timer.restart(start);
        timer.restart(start + Duration::from_millis(30));

        assert!(timer.is_pending(start + Duration::from_millis(60)));
        assert!(!timer.is_pending(start + Duration::from_millis(80)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timer = Debounce::new(WINDOW);
        timer.restart(start);
        timer.cancel();
        assert!(!timer.is_pending(start));
    }
}

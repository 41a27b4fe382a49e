//! Timed notifications
//!
//! The "meeting canceled" toast and the game-over notice each own one
//! dismissal timer. Showing a notice while one is pending replaces both the
//! text and the deadline, so an older timer can never dismiss a newer notice.
//! Deadlines are host milliseconds, the same clock the engine ticks on.

use serde::{Deserialize, Serialize};

/// Toast shown after a meeting is canceled
pub const DEFAULT_TOAST_MS: f64 = 1200.0;
/// Game-over notice before returning to the entry form
pub const DEFAULT_GAME_OVER_MS: f64 = 2500.0;

pub const GAME_OVER_MESSAGE: &str = "Game over. You now have to attend the remaining meetings :D";
pub const CLEARED_MESSAGE: &str = "All meetings canceled. You own your calendar again.";

/// A cancelable one-shot timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    deadline: Option<f64>,
}

impl Timer {
    /// Arm (or re-arm) to fire at `now + duration_ms`
    pub fn arm(&mut self, now: f64, duration_ms: f64) {
        self.deadline = Some(now + duration_ms);
    }

    /// Cancel. Canceling an idle timer is a no-op.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once, on the first call at or after the deadline
    pub fn fire_if_due(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A message that dismisses itself after a fixed duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    text: Option<String>,
    duration_ms: f64,
    timer: Timer,
}

impl Notice {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            text: None,
            duration_ms,
            timer: Timer::default(),
        }
    }

    /// Show `text`, replacing any pending notice and its timer
    pub fn show(&mut self, text: impl Into<String>, now: f64) {
        self.text = Some(text.into());
        self.timer.arm(now, self.duration_ms);
    }

    pub fn dismiss(&mut self) {
        self.text = None;
        self.timer.cancel();
    }

    /// Advance the timer. Returns true if the notice was dismissed by this call.
    pub fn update(&mut self, now: f64) -> bool {
        if self.timer.fire_if_due(now) {
            self.text = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_duration(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once() {
        let mut timer = Timer::default();
        timer.arm(0.0, 100.0);
        assert!(!timer.fire_if_due(99.0));
        assert!(timer.fire_if_due(100.0));
        assert!(!timer.fire_if_due(200.0));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timer = Timer::default();
        timer.cancel();
        assert_eq!(timer, Timer::default());

        timer.arm(0.0, 50.0);
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.fire_if_due(100.0));
    }

    #[test]
    fn test_replacing_notice_rearms_timer() {
        let mut toast = Notice::new(DEFAULT_TOAST_MS);
        toast.show("Daily Standup", 0.0);
        toast.show("Sprint Planning", 1000.0);

        // The first toast's deadline has passed, but it was replaced
        assert!(!toast.update(1200.0));
        assert_eq!(toast.current(), Some("Sprint Planning"));

        assert!(toast.update(2200.0));
        assert_eq!(toast.current(), None);
    }

    #[test]
    fn test_dismiss() {
        let mut notice = Notice::new(DEFAULT_GAME_OVER_MS);
        notice.show(GAME_OVER_MESSAGE, 0.0);
        assert_eq!(notice.current(), Some(GAME_OVER_MESSAGE));
        notice.dismiss();
        assert_eq!(notice.current(), None);
        assert!(!notice.timer().is_pending());
    }
}

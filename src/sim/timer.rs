//! Level countdown
//!
//! Remaining time is derived from wall-clock timestamps rather than summed
//! frame deltas, so a dropped or late frame never stretches the level.

use serde::{Deserialize, Serialize};

/// Result of feeding a timestamp to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerStatus {
    /// Not started, cancelled, or already expired
    Idle,
    /// Time still on the clock
    Running,
    /// Reached zero on this update (reported once)
    Expired,
}

/// Countdown for a single level attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    /// Full length of a level (seconds)
    pub duration_secs: f64,
    /// Timestamp (ms) the level started; `None` when not running
    started_at_ms: Option<f64>,
    /// Seconds left, clamped to `[0, duration_secs]`
    remaining_secs: f64,
}

impl Countdown {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            started_at_ms: None,
            remaining_secs: duration_secs,
        }
    }

    /// Begin counting down from the full duration at `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.started_at_ms = Some(now_ms);
        self.remaining_secs = self.duration_secs;
    }

    /// Stop counting; remaining time is frozen at its last value
    pub fn cancel(&mut self) {
        self.started_at_ms = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    #[inline]
    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    /// Remaining time as a fraction of the full duration (for the progress ring)
    pub fn fraction_remaining(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.remaining_secs / self.duration_secs).clamp(0.0, 1.0)
    }

    /// Recompute remaining time from `now_ms`.
    ///
    /// Remaining time never increases, even if `now_ms` goes backwards.
    pub fn update(&mut self, now_ms: f64) -> TimerStatus {
        let Some(started_at) = self.started_at_ms else {
            return TimerStatus::Idle;
        };

        let elapsed_secs = ((now_ms - started_at) / 1000.0).max(0.0);
        let remaining = (self.duration_secs - elapsed_secs).max(0.0);
        self.remaining_secs = remaining.min(self.remaining_secs);

        if self.remaining_secs > 0.0 {
            TimerStatus::Running
        } else {
            self.started_at_ms = None;
            TimerStatus::Expired
        }
    }
}

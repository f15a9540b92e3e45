//! Smooth scrolling of the thread.

use crate::state::Millis;

/// An in-flight smooth scroll from one offset to another.
///
/// Eases out cubically so the thread decelerates into place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    from: f64,
    to: f64,
    started: Millis,
    duration_ms: u64,
}

impl SmoothScroll {
    /// Animate from `from` to `to` over `duration_ms`, starting at `started`.
    pub fn new(from: f64, to: f64, started: Millis, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            started,
            duration_ms,
        }
    }

    /// Where the animation ends.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Whether the animation has ended by `now`.
    pub fn is_finished(&self, now: Millis) -> bool {
        now.since(self.started) >= self.duration_ms
    }

    /// Offset at `now`. Exactly `to` once finished.
    pub fn position(&self, now: Millis) -> f64 {
        if self.is_finished(now) {
            return self.to;
        }
        let t = now.since(self.started) as f64 / self.duration_ms as f64;
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }
}

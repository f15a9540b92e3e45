//! Virtual clock and deferred timers.
//!
//! The viewport never sleeps. Callers supply the current time on every
//! event and the component re-invokes itself for timers that have come
//! due. Scheduling a timer of a kind that is already pending replaces it,
//! so the newest debounced trigger always supersedes the older one.

use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// Milliseconds on the caller's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(u64);

impl Millis {
    /// Start of the clock.
    pub const ZERO: Self = Self(0);

    /// `ms` milliseconds after the start of the clock.
    pub fn new(ms: u64) -> Self {
        Self(ms)
    }

    /// Milliseconds since the start of the clock.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// `ms` later, saturating at the end of the clock.
    pub fn saturating_add(&self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Time elapsed since `earlier`, zero if `earlier` is later.
    pub fn since(&self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl From<Duration> for Millis {
    fn from(d: Duration) -> Self {
        Self(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl Add<u64> for Millis {
    type Output = Millis;

    fn add(self, ms: u64) -> Millis {
        self.saturating_add(ms)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Every deferred action the viewport can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Measure geometry once layout has settled.
    GeometrySettle,
    /// Debounced resolution after scrolling.
    ResolveAfterScroll,
    /// Scroll a newly completed pair into place.
    ScrollToLatest,
    /// End of the transition-in suppression window.
    TransitionInEnd,
    /// First position measurement after entering focus.
    PositionSettle,
    /// Debounced position update after scrolling.
    PositionAfterScroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    kind: TimerKind,
    due: Millis,
    seq: u64,
}

/// Pending timers, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerQueue {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl TimerQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `due`, replacing any pending timer of the
    /// same kind.
    pub fn schedule(&mut self, kind: TimerKind, due: Millis) {
        self.pending.retain(|p| p.kind != kind);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending { kind, due, seq });
    }

    /// Cancel a pending timer. Returns whether one was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.kind != kind);
        self.pending.len() != before
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Whether a timer of `kind` is pending.
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|p| p.kind == kind)
    }

    /// When the pending timer of `kind` fires.
    pub fn due_at(&self, kind: TimerKind) -> Option<Millis> {
        self.pending.iter().find(|p| p.kind == kind).map(|p| p.due)
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time among pending timers.
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Kinds currently pending, in no particular order.
    pub fn pending_kinds(&self) -> Vec<TimerKind> {
        self.pending.iter().map(|p| p.kind).collect()
    }

    /// Remove and return the earliest timer due at or before `now`.
    ///
    /// Timers due at the same instant come out in scheduling order.
    pub fn pop_due(&mut self, now: Millis) -> Option<TimerKind> {
        let at = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(at).kind)
    }
}

//! Outputs of the viewport to its surroundings.

use crate::model::PairIndex;
use crate::view_state::FocusedPosition;
use std::sync::mpsc::Sender;
use tracing::debug;

/// How a scroll request should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Animated scroll.
    #[default]
    Smooth,
    /// Jump straight to the target.
    Instant,
}

/// Ask the host to scroll the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Target scroll offset of the container content.
    pub top: f64,
    /// How the host should get there.
    pub behavior: ScrollBehavior,
    /// Pair the scroll is meant to reveal.
    pub pair_index: PairIndex,
}

/// Everything the viewport reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportSignal {
    /// Where the avatar should sit, or `None` to release it.
    FocusPositionChanged(Option<FocusedPosition>),
    /// Start (`true`) or end (`false`) of the transition-in window.
    TransitioningInChanged(bool),
    /// The host should scroll the thread.
    ScrollRequested(ScrollRequest),
}

/// Sending half of the signal channel.
///
/// A dropped receiver only means nobody is listening any more; sends after
/// that are discarded.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: Sender<ViewportSignal>,
}

impl SignalSender {
    /// Sender over `tx`.
    pub fn new(tx: Sender<ViewportSignal>) -> Self {
        Self { tx }
    }

    /// Send `signal`, dropping it quietly if the host has gone away.
    pub fn send(&self, signal: ViewportSignal) {
        if self.tx.send(signal).is_err() {
            debug!(?signal, "Signal receiver dropped, discarding");
        }
    }
}

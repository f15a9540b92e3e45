//! Focus state machine.
//!
//! `FocusMachine` stores the inputs that decide focus (visibility, the
//! waiting flag, the tracked pair and the last pair) and derives
//! `FocusState` from them on demand. Deriving instead of storing keeps the
//! state consistent with its inputs: there is no transition to forget.

use crate::model::PairIndex;
use std::fmt;
use tracing::debug;

/// What the viewport is currently doing with focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    /// Nothing focused; the avatar is released.
    #[default]
    Idle,
    /// The last pair is focused and its position is broadcast.
    Tracking(PairIndex),
    /// The thread just opened on the last pair. Position updates are held
    /// back until layout has settled.
    TransitioningIn(PairIndex),
    /// A response is pending. The focused position is frozen.
    WaitingForResponse(Option<PairIndex>),
}

impl FocusState {
    /// The pair whose position is broadcast, if any.
    pub fn tracked_pair(&self) -> Option<PairIndex> {
        match self {
            FocusState::Tracking(pair) => Some(*pair),
            _ => None,
        }
    }

    /// Whether nothing is focused.
    pub fn is_idle(&self) -> bool {
        matches!(self, FocusState::Idle)
    }

    /// Whether a response is pending.
    pub fn is_waiting(&self) -> bool {
        matches!(self, FocusState::WaitingForResponse(_))
    }
}

impl fmt::Display for FocusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusState::Idle => write!(f, "idle"),
            FocusState::Tracking(pair) => write!(f, "tracking pair {pair}"),
            FocusState::TransitioningIn(pair) => write!(f, "transitioning in on pair {pair}"),
            FocusState::WaitingForResponse(Some(pair)) => write!(f, "waiting on pair {pair}"),
            FocusState::WaitingForResponse(None) => write!(f, "waiting"),
        }
    }
}

/// Inputs the focus state is derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusMachine {
    visible: bool,
    waiting: bool,
    current: Option<PairIndex>,
    last: Option<PairIndex>,
    transitioning: bool,
}

impl FocusMachine {
    /// Hidden, with no pairs and nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the current state.
    ///
    /// Waiting wins over everything, then visibility, then whether the
    /// tracked pair is the last one.
    pub fn state(&self) -> FocusState {
        if self.waiting {
            return FocusState::WaitingForResponse(self.current);
        }
        if !self.visible {
            return FocusState::Idle;
        }
        match (self.current, self.last) {
            (Some(current), Some(last)) if current == last => {
                if self.transitioning {
                    FocusState::TransitioningIn(last)
                } else {
                    FocusState::Tracking(last)
                }
            }
            _ => FocusState::Idle,
        }
    }

    /// Pair the resolver last settled on.
    pub fn current_pair(&self) -> Option<PairIndex> {
        self.current
    }

    /// The latest complete pair.
    pub fn last_pair(&self) -> Option<PairIndex> {
        self.last
    }

    /// Whether the thread is on screen.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a response is pending.
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Whether a transition-in is running.
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Focus mode: the tracked pair is the last pair of a visible thread.
    pub fn is_focus_active(&self) -> bool {
        self.visible && self.current.is_some() && self.current == self.last
    }

    /// Record a new pairing.
    ///
    /// A newly completed pair forces focus onto it. Returns `true` when the
    /// caller should scroll the latest pair into place.
    pub fn pairs_changed(&mut self, last: Option<PairIndex>, new_pair_completed: bool) -> bool {
        self.last = last;

        if new_pair_completed {
            if let Some(last) = last {
                debug!(pair = %last, "New pair completed, focusing latest");
                self.current = Some(last);
                return true;
            }
        }

        // Pairs can disappear when the message list is replaced.
        if let (Some(current), Some(last)) = (self.current, self.last) {
            if current > last {
                self.current = Some(last);
            }
        } else if self.last.is_none() {
            self.current = None;
        }
        false
    }

    /// Update visibility. Returns `true` when a transition-in starts, i.e.
    /// the thread opened while already tracking the last pair.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;

        if !visible {
            self.transitioning = false;
            return false;
        }

        let opening_in_focus = self.current.is_some() && self.current == self.last;
        if opening_in_focus {
            debug!("Thread opened in focus mode, transitioning in");
            self.transitioning = true;
        }
        opening_in_focus
    }

    /// End the transition-in.
    pub fn finish_transition_in(&mut self) {
        self.transitioning = false;
    }

    /// Raise or clear the waiting-for-response flag.
    pub fn set_waiting(&mut self, waiting: bool) {
        self.waiting = waiting;
    }

    /// Apply a resolver result. Returns whether the tracked pair changed.
    pub fn resolved(&mut self, pair: PairIndex) -> bool {
        if self.current == Some(pair) {
            return false;
        }
        debug!(from = ?self.current.map(|p| p.display()), to = %pair, "Centered pair changed");
        self.current = Some(pair);
        true
    }
}

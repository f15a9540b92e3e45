//! Avatar position broadcasting.

use super::signal::{SignalSender, ViewportSignal};
use crate::model::MessageId;
use crate::view_state::{Bounds, FocusTuning, FocusedPosition, LayoutSnapshot};
use tracing::debug;

/// Fixed offsets between the AI message content and the avatar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarOffsets {
    /// Gap between the avatar and the content.
    pub gap: f64,
    /// Half the avatar's width.
    pub half_width: f64,
    /// Half the avatar's height.
    pub half_height: f64,
}

impl AvatarOffsets {
    /// Offsets taken from `tuning`.
    pub fn from_tuning(tuning: &FocusTuning) -> Self {
        Self {
            gap: tuning.avatar_gap_px,
            half_width: tuning.avatar_half_width_px,
            half_height: tuning.avatar_half_height_px,
        }
    }
}

impl Default for AvatarOffsets {
    fn default() -> Self {
        Self::from_tuning(&FocusTuning::default())
    }
}

/// Avatar position for AI content at `rect`: left of the content, centered
/// on it vertically.
pub fn compute_position(rect: &Bounds, offsets: &AvatarOffsets) -> FocusedPosition {
    FocusedPosition::new(
        rect.left - offsets.gap - offsets.half_width,
        rect.top + rect.height / 2.0 - offsets.half_height,
    )
}

/// Publishes `FocusedPosition` changes over the signal channel.
///
/// # Invariants
/// - A value equal to the last published one is never resent
/// - Nothing is published while frozen
#[derive(Debug, Clone)]
pub struct PositionBroadcaster {
    signals: SignalSender,
    offsets: AvatarOffsets,
    /// `None` until the first publish; then the last value sent.
    last_published: Option<Option<FocusedPosition>>,
    frozen: bool,
}

impl PositionBroadcaster {
    /// Broadcaster that has published nothing yet.
    pub fn new(signals: SignalSender, offsets: AvatarOffsets) -> Self {
        Self {
            signals,
            offsets,
            last_published: None,
            frozen: false,
        }
    }

    /// Last position sent, `None` if nothing or `None` was sent.
    pub fn last_published(&self) -> Option<FocusedPosition> {
        self.last_published.flatten()
    }

    /// Whether publishes are held.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Hold the current position; later publishes are dropped until `thaw`.
    pub fn freeze(&mut self) {
        if !self.frozen {
            debug!(position = ?self.last_published(), "Position frozen");
            self.frozen = true;
        }
    }

    /// Let publishes through again.
    pub fn thaw(&mut self) {
        if self.frozen {
            debug!("Position thawed");
            self.frozen = false;
        }
    }

    /// Send `position` unless frozen or unchanged. Returns whether a
    /// signal was sent.
    pub fn publish(&mut self, position: Option<FocusedPosition>) -> bool {
        if self.frozen {
            debug!(?position, "Position update suppressed while frozen");
            return false;
        }
        if self.last_published == Some(position) {
            return false;
        }
        debug!(?position, "Focus position changed");
        self.last_published = Some(position);
        self.signals.send(ViewportSignal::FocusPositionChanged(position));
        true
    }

    /// Release the avatar.
    pub fn clear(&mut self) -> bool {
        self.publish(None)
    }

    /// Measure the AI content of `ai_message` in `snapshot` and publish its
    /// position. Content that is not rendered is skipped and the previous
    /// position kept.
    pub fn recompute(&mut self, snapshot: &LayoutSnapshot, ai_message: &MessageId) -> bool {
        let Some(rect) = snapshot.ai_content(ai_message) else {
            debug!(message = %ai_message, "AI content not rendered, keeping previous position");
            return false;
        };
        let position = compute_position(rect, &self.offsets);
        self.publish(Some(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};

    fn broadcaster() -> (PositionBroadcaster, Receiver<ViewportSignal>) {
        let (tx, rx) = mpsc::channel();
        (
            PositionBroadcaster::new(SignalSender::new(tx), AvatarOffsets::default()),
            rx,
        )
    }

    fn positions(rx: &Receiver<ViewportSignal>) -> Vec<Option<FocusedPosition>> {
        rx.try_iter()
            .filter_map(|signal| match signal {
                ViewportSignal::FocusPositionChanged(position) => Some(position),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn position_sits_left_of_content_centered_vertically() {
        let rect = Bounds::new(600.0, 300.0, 400.0, 120.0);
        let position = compute_position(&rect, &AvatarOffsets::default());
        assert_eq!(position, FocusedPosition::new(350.0, 260.0));
    }

    #[test]
    fn first_publish_of_none_is_sent() {
        let (mut broadcaster, rx) = broadcaster();
        assert!(broadcaster.clear());
        assert_eq!(positions(&rx), vec![None]);
    }

    #[test]
    fn duplicate_values_are_not_resent() {
        let (mut broadcaster, rx) = broadcaster();
        let position = Some(FocusedPosition::new(1.0, 2.0));
        assert!(broadcaster.publish(position));
        assert!(!broadcaster.publish(position));
        assert!(broadcaster.clear());
        assert!(!broadcaster.clear());
        assert_eq!(positions(&rx), vec![position, None]);
    }

    #[test]
    fn frozen_broadcaster_publishes_nothing() {
        let (mut broadcaster, rx) = broadcaster();
        let held = Some(FocusedPosition::new(1.0, 2.0));
        broadcaster.publish(held);
        broadcaster.freeze();

        assert!(!broadcaster.publish(Some(FocusedPosition::new(5.0, 5.0))));
        assert!(!broadcaster.clear());
        assert_eq!(broadcaster.last_published(), held);

        broadcaster.thaw();
        assert!(broadcaster.clear());
        assert_eq!(positions(&rx), vec![held, None]);
    }

    #[test]
    fn recompute_skips_missing_content() {
        let (mut broadcaster, rx) = broadcaster();
        let id = MessageId::new("2").unwrap();
        assert!(!broadcaster.recompute(&LayoutSnapshot::detached(), &id));
        assert!(positions(&rx).is_empty());
    }

    #[test]
    fn recompute_publishes_measured_content() {
        let (mut broadcaster, rx) = broadcaster();
        let id = MessageId::new("2").unwrap();
        let mut snapshot = LayoutSnapshot::detached();
        snapshot.insert_ai_content(id.clone(), Bounds::new(500.0, 100.0, 300.0, 400.0));

        assert!(broadcaster.recompute(&snapshot, &id));
        assert_eq!(
            positions(&rx),
            vec![Some(FocusedPosition::new(250.0, 200.0))]
        );
    }
}

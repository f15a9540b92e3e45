//! Vertical stacking layout for a message thread.
//!
//! Places pairs top to bottom inside a scroll container and produces the
//! `LayoutSnapshot` a renderer would report after drawing them.

use super::layout::{ContainerBox, LayoutSnapshot, PairBox};
use super::types::Bounds;
use crate::model::MessagePair;

/// Heights of the two messages in a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairHeights {
    /// Height of the user message.
    pub user: f64,
    /// Height of the AI message.
    pub ai: f64,
}

impl PairHeights {
    /// Heights of a user message and its reply.
    pub fn new(user: f64, ai: f64) -> Self {
        Self { user, ai }
    }
}

/// Layout parameters for stacking pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedLayout {
    /// Client-space bounds of the scroll container.
    pub container: Bounds,
    /// Space above the first pair.
    pub top_padding: f64,
    /// Space between consecutive pairs.
    pub pair_gap: f64,
    /// Space between the user and AI message inside a pair.
    pub message_gap: f64,
    /// Horizontal inset of the AI content element within its wrapper.
    pub ai_content_inset: f64,
}

impl StackedLayout {
    /// Pairs stacked flush from the top of `container`.
    pub fn new(container: Bounds) -> Self {
        Self {
            container,
            top_padding: 0.0,
            pair_gap: 0.0,
            message_gap: 0.0,
            ai_content_inset: 0.0,
        }
    }

    /// Set the gap between pairs and the gap inside a pair.
    pub fn with_gaps(mut self, pair_gap: f64, message_gap: f64) -> Self {
        self.pair_gap = pair_gap;
        self.message_gap = message_gap;
        self
    }

    /// Set the space above the first pair.
    pub fn with_top_padding(mut self, top_padding: f64) -> Self {
        self.top_padding = top_padding;
        self
    }

    /// Set the inset of AI content within its message.
    pub fn with_ai_content_inset(mut self, inset: f64) -> Self {
        self.ai_content_inset = inset;
        self
    }

    fn pair_height(&self, heights: &PairHeights) -> f64 {
        heights.user + self.message_gap + heights.ai
    }

    /// Offsets of each pair from the top of the scroll content.
    pub fn pair_offsets(&self, heights: &[PairHeights]) -> Vec<f64> {
        let mut offsets = Vec::with_capacity(heights.len());
        let mut cursor = self.top_padding;
        for (i, h) in heights.iter().enumerate() {
            if i > 0 {
                cursor += self.pair_gap;
            }
            offsets.push(cursor);
            cursor += self.pair_height(h);
        }
        offsets
    }

    /// Total scrollable height including the dynamic bottom padding.
    pub fn content_height(&self, heights: &[PairHeights], bottom_padding: f64) -> f64 {
        let stacked = match (self.pair_offsets(heights).last(), heights.last()) {
            (Some(offset), Some(last)) => offset + self.pair_height(last),
            _ => self.top_padding,
        };
        stacked + bottom_padding
    }

    /// Largest scroll offset that does not scroll past the content.
    pub fn max_scroll_top(&self, heights: &[PairHeights], bottom_padding: f64) -> f64 {
        (self.content_height(heights, bottom_padding) - self.container.height).max(0.0)
    }

    /// Measure `pairs` stacked with the given heights at `scroll_top`.
    ///
    /// Pairs without a matching height entry are treated as not rendered.
    pub fn measure(
        &self,
        pairs: &[MessagePair],
        heights: &[PairHeights],
        scroll_top: f64,
    ) -> LayoutSnapshot {
        let mut snapshot =
            LayoutSnapshot::with_container(ContainerBox::new(self.container, scroll_top));
        let offsets = self.pair_offsets(heights);

        for ((pair, h), offset_top) in pairs.iter().zip(heights).zip(offsets) {
            let top = self.container.top + offset_top - scroll_top;
            let left = self.container.left;
            let width = self.container.width;

            snapshot.push_pair(PairBox {
                pair_index: pair.pair_index,
                bounds: Bounds::new(left, top, width, self.pair_height(h)),
                offset_top,
            });

            snapshot.insert_message(pair.user.id().clone(), Bounds::new(left, top, width, h.user));

            let ai_top = top + h.user + self.message_gap;
            snapshot.insert_message(pair.ai.id().clone(), Bounds::new(left, ai_top, width, h.ai));
            snapshot.insert_ai_content(
                pair.ai.id().clone(),
                Bounds::new(
                    left + self.ai_content_inset,
                    ai_top,
                    (width - self.ai_content_inset).max(0.0),
                    h.ai,
                ),
            );
        }

        snapshot
    }
}

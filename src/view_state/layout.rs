//! Layout snapshots: measurements captured after a render pass.
//!
//! A snapshot plays the role of the handles a renderer collects while
//! drawing. The geometry, resolver and broadcaster functions take it as
//! plain data, so they never reach into a live widget tree. An element
//! missing from the snapshot is treated exactly like an element that has
//! not been rendered yet.

use super::types::Bounds;
use crate::model::{MessageId, PairIndex};
use std::collections::HashMap;

/// The scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBox {
    /// Client-space bounds of the visible area.
    pub bounds: Bounds,
    /// Current vertical scroll offset of the content.
    pub scroll_top: f64,
}

impl ContainerBox {
    /// Container at `bounds` scrolled to `scroll_top`.
    pub fn new(bounds: Bounds, scroll_top: f64) -> Self {
        Self { bounds, scroll_top }
    }

    /// Height of the visible area.
    pub fn client_height(&self) -> f64 {
        self.bounds.height
    }

    /// Vertical center of the visible area.
    pub fn center_y(&self) -> f64 {
        self.bounds.center_y()
    }
}

/// A rendered message pair, tagged with its pair index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairBox {
    /// Which pair this box renders.
    pub pair_index: PairIndex,
    /// Client-space bounds (already shifted by the scroll offset).
    pub bounds: Bounds,
    /// Distance from the top of the scroll content, independent of scrolling.
    pub offset_top: f64,
}

impl PairBox {
    /// Rendered height of the pair.
    pub fn height(&self) -> f64 {
        self.bounds.height
    }
}

/// Everything measured after one render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSnapshot {
    container: Option<ContainerBox>,
    pairs: Vec<PairBox>,
    messages: HashMap<MessageId, Bounds>,
    ai_content: HashMap<MessageId, Bounds>,
}

impl LayoutSnapshot {
    /// Snapshot with a container and nothing rendered inside it yet.
    pub fn with_container(container: ContainerBox) -> Self {
        Self {
            container: Some(container),
            ..Self::default()
        }
    }

    /// Snapshot taken while the thread is not rendered at all.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Add a rendered pair. Pairs are kept ordered by pair index.
    pub fn push_pair(&mut self, pair: PairBox) {
        let at = self
            .pairs
            .partition_point(|existing| existing.pair_index < pair.pair_index);
        if self.pairs.get(at).map(|p| p.pair_index) == Some(pair.pair_index) {
            self.pairs[at] = pair;
        } else {
            self.pairs.insert(at, pair);
        }
    }

    /// Record the bounds of a rendered message wrapper.
    pub fn insert_message(&mut self, id: MessageId, bounds: Bounds) {
        self.messages.insert(id, bounds);
    }

    /// Record the bounds of an AI message's content element.
    pub fn insert_ai_content(&mut self, id: MessageId, bounds: Bounds) {
        self.ai_content.insert(id, bounds);
    }

    /// The scroll container, if it was rendered.
    pub fn container(&self) -> Option<&ContainerBox> {
        self.container.as_ref()
    }

    /// Rendered pairs in conversation order.
    pub fn pairs(&self) -> &[PairBox] {
        &self.pairs
    }

    /// Box of pair `index`, if rendered.
    pub fn pair(&self, index: PairIndex) -> Option<&PairBox> {
        self.pairs
            .binary_search_by_key(&index, |p| p.pair_index)
            .ok()
            .map(|at| &self.pairs[at])
    }

    /// Box of the latest rendered pair.
    pub fn last_pair(&self) -> Option<&PairBox> {
        self.pairs.last()
    }

    /// Bounds of the message element tagged `id`.
    pub fn message(&self, id: &MessageId) -> Option<&Bounds> {
        self.messages.get(id)
    }

    /// Every rendered message element.
    pub fn messages(&self) -> impl Iterator<Item = (&MessageId, &Bounds)> {
        self.messages.iter()
    }

    /// Bounds of the content element inside AI message `id`.
    pub fn ai_content(&self, id: &MessageId) -> Option<&Bounds> {
        self.ai_content.get(id)
    }

    /// Container scroll offset, if the container was rendered.
    pub fn scroll_top(&self) -> Option<f64> {
        self.container.map(|c| c.scroll_top)
    }
}

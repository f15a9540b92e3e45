//! Registry of event listeners the viewport has attached.
//!
//! Events from the host are only acted on while the matching listener is
//! attached, which makes teardown cleanliness checkable: an empty registry
//! means no scroll, resize or intersection callback can reach the
//! component.

use std::collections::BTreeSet;
use tracing::debug;

/// Listeners the viewport attaches to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Listener {
    /// Window resize, for geometry measurement.
    Resize,
    /// Container scroll, for debounced centered-pair resolution.
    ResolverScroll,
    /// Visibility-ratio crossings of rendered pairs.
    Intersection,
    /// Container scroll, for debounced avatar position updates.
    PositionScroll,
}

/// Set of currently attached listeners.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listeners {
    attached: BTreeSet<Listener>,
}

impl Listeners {
    /// Nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `listener`. Attaching twice is a no-op.
    pub fn attach(&mut self, listener: Listener) {
        if self.attached.insert(listener) {
            debug!(?listener, "Listener attached");
        }
    }

    /// Detach `listener` if attached.
    pub fn detach(&mut self, listener: Listener) {
        if self.attached.remove(&listener) {
            debug!(?listener, "Listener detached");
        }
    }

    /// Whether `listener` is attached.
    pub fn is_attached(&self, listener: Listener) -> bool {
        self.attached.contains(&listener)
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Attached listeners in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Listener> + '_ {
        self.attached.iter().copied()
    }

    /// Detach everything.
    pub fn detach_all(&mut self) {
        for listener in std::mem::take(&mut self.attached) {
            debug!(?listener, "Listener detached");
        }
    }
}

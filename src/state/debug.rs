//! Diagnostic overlay model.

use crate::model::PairIndex;

/// What the debug overlay shows. Reading it never affects focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugOverlay {
    /// Pair the resolver last settled on.
    pub current_pair: Option<PairIndex>,
    /// Number of complete pairs.
    pub total_pairs: usize,
    /// Whether focus mode is on.
    pub focus_active: bool,
}

impl DebugOverlay {
    /// The three lines the overlay draws.
    pub fn lines(&self) -> [String; 3] {
        let current = self
            .current_pair
            .map_or_else(|| "None".to_string(), |pair| pair.display().to_string());
        [
            format!("Current Pair: {current}"),
            format!("Total Pairs: {}", self.total_pairs),
            format!("Focus: {}", if self.focus_active { "ON" } else { "OFF" }),
        ]
    }
}

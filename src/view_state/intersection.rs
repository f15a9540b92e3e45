//! Visibility-ratio watching for rendered pairs and messages.

use super::layout::LayoutSnapshot;
use crate::model::{MessageId, PairIndex};
use std::collections::{BTreeSet, HashMap};

/// Reports when a pair's visible fraction crosses one of a set of
/// thresholds.
///
/// A pair seen for the first time always counts as a crossing, so a
/// freshly reset watcher notifies on its first observation.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionWatcher {
    thresholds: Vec<f64>,
    bands: HashMap<PairIndex, usize>,
}

impl IntersectionWatcher {
    /// Watch crossings of `thresholds`. Non-finite values are dropped.
    pub fn new(mut thresholds: Vec<f64>) -> Self {
        thresholds.retain(|t| t.is_finite());
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        Self {
            thresholds,
            bands: HashMap::new(),
        }
    }

    /// Stop watching everything; the next observation notifies afresh.
    pub fn reset(&mut self) {
        self.bands.clear();
    }

    /// Number of pairs seen since the last reset.
    pub fn watched(&self) -> usize {
        self.bands.len()
    }

    fn band(&self, ratio: f64) -> usize {
        let ratio = ratio.clamp(0.0, 1.0);
        self.thresholds.iter().take_while(|t| ratio >= **t).count()
    }

    /// Observe a new snapshot. Returns `true` if any pair crossed a
    /// threshold since the previous observation.
    pub fn observe(&mut self, snapshot: &LayoutSnapshot) -> bool {
        let Some(container) = snapshot.container() else {
            return false;
        };

        let mut crossed = false;
        let mut next = HashMap::with_capacity(snapshot.pairs().len());

        for pair in snapshot.pairs() {
            let ratio = pair
                .bounds
                .visible_fraction_in(&container.bounds)
                .unwrap_or(0.0);
            let band = self.band(ratio);
            if self.bands.get(&pair.pair_index) != Some(&band) {
                crossed = true;
            }
            next.insert(pair.pair_index, band);
        }

        self.bands = next;
        crossed
    }
}

/// Messages at least `threshold` visible inside the container.
///
/// Drives the in-view fade of individual message wrappers.
pub fn messages_in_view(snapshot: &LayoutSnapshot, threshold: f64) -> BTreeSet<MessageId> {
    let Some(container) = snapshot.container() else {
        return BTreeSet::new();
    };

    snapshot
        .messages()
        .filter(|(_, bounds)| {
            bounds
                .visible_fraction_in(&container.bounds)
                .is_some_and(|ratio| ratio >= threshold)
        })
        .map(|(id, _)| id.clone())
        .collect()
}

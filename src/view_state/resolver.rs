//! Centered-pair resolution.
//!
//! Picks the single pair that best represents what the user is looking
//! at, using a weighted distance to the viewport center with a
//! scroll-direction bias and a minimum-visibility gate.

use super::layout::LayoutSnapshot;
use super::tuning::FocusTuning;
use crate::model::PairIndex;

/// Direction of the most recent scroll movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// Toward earlier messages.
    Up,
    /// Also used when the offset did not change.
    #[default]
    Down,
}

impl ScrollDirection {
    /// `Up` iff `current` is strictly above `previous`.
    pub fn between(previous: f64, current: f64) -> Self {
        if current < previous {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// Weights applied by [`resolve_centered_pair`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverWeights {
    /// Distance multiplier for pairs above center while scrolling up.
    pub up_bias: f64,
    /// Distance multiplier for pairs below center while scrolling down.
    pub down_bias: f64,
    /// Visible fraction a pair must exceed while scrolling up.
    pub min_visibility_up: f64,
    /// Visible fraction a pair must exceed while scrolling down.
    pub min_visibility_down: f64,
}

impl ResolverWeights {
    /// Weights taken from `tuning`.
    pub fn from_tuning(tuning: &FocusTuning) -> Self {
        Self {
            up_bias: tuning.up_bias,
            down_bias: tuning.down_bias,
            min_visibility_up: tuning.min_visibility_up,
            min_visibility_down: tuning.min_visibility_down,
        }
    }

    fn min_visibility(&self, direction: ScrollDirection) -> f64 {
        match direction {
            ScrollDirection::Up => self.min_visibility_up,
            ScrollDirection::Down => self.min_visibility_down,
        }
    }
}

impl Default for ResolverWeights {
    fn default() -> Self {
        Self::from_tuning(&FocusTuning::default())
    }
}

/// Choose the pair closest to the viewport center.
///
/// Pairs whose visible fraction does not exceed the direction's minimum are
/// never chosen, however close they are. Ties go to the lowest index.
/// Returns `None` when nothing is rendered or nothing is visible enough.
pub fn resolve_centered_pair(
    snapshot: &LayoutSnapshot,
    direction: ScrollDirection,
    weights: &ResolverWeights,
) -> Option<PairIndex> {
    let container = snapshot.container()?;
    let viewport = container.bounds;
    let viewport_center = container.center_y();
    let min_visibility = weights.min_visibility(direction);

    let mut best: Option<(PairIndex, f64)> = None;

    for pair in snapshot.pairs() {
        let Some(visibility) = pair.bounds.visible_fraction_in(&viewport) else {
            continue;
        };
        if visibility <= min_visibility {
            continue;
        }

        let pair_center = pair.bounds.center_y();
        let mut distance = (pair_center - viewport_center).abs();
        match direction {
            ScrollDirection::Up if pair_center < viewport_center => distance *= weights.up_bias,
            ScrollDirection::Down if pair_center > viewport_center => distance *= weights.down_bias,
            _ => {}
        }

        // strict comparison keeps the lowest index on ties
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((pair.pair_index, distance));
        }
    }

    best.map(|(index, _)| index)
}

/// Stateful wrapper that tracks scroll direction between resolutions.
#[derive(Debug, Clone, PartialEq)]
pub struct CenteredPairResolver {
    weights: ResolverWeights,
    last_scroll_top: Option<f64>,
}

impl CenteredPairResolver {
    /// Resolver that starts out scrolling down.
    pub fn new(weights: ResolverWeights) -> Self {
        Self {
            weights,
            last_scroll_top: None,
        }
    }

    /// Forget the remembered scroll offset, e.g. when the thread is hidden.
    pub fn reset(&mut self) {
        self.last_scroll_top = None;
    }

    /// Resolve against `snapshot`, updating the remembered scroll offset.
    pub fn resolve(&mut self, snapshot: &LayoutSnapshot) -> Option<PairIndex> {
        let scroll_top = snapshot.scroll_top()?;
        let direction = self
            .last_scroll_top
            .map_or(ScrollDirection::Down, |previous| {
                ScrollDirection::between(previous, scroll_top)
            });
        self.last_scroll_top = Some(scroll_top);
        resolve_centered_pair(snapshot, direction, &self.weights)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

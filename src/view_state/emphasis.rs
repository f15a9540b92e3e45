//! Visual emphasis of pairs while focus mode is active.

use super::tuning::FocusTuning;
use crate::model::PairIndex;

/// Scale and opacity a renderer should apply to one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairEmphasis {
    /// Size multiplier.
    pub scale: f64,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f64,
}

impl PairEmphasis {
    /// Full size, fully opaque.
    pub const NEUTRAL: Self = Self {
        scale: 1.0,
        opacity: 1.0,
    };

    /// Whether the pair is drawn dimmed (de-emphasized).
    pub fn is_dimmed(&self) -> bool {
        self.opacity < 1.0
    }

    /// Whether the pair is drawn enlarged.
    pub fn is_enlarged(&self) -> bool {
        self.scale > 1.0
    }
}

/// Emphasis for `pair` out of `total` pairs.
///
/// With focus mode active the latest pair is enlarged and every earlier
/// pair nearly faded out; otherwise every pair is neutral.
pub fn pair_emphasis(pair: PairIndex, total: usize, focus_active: bool, tuning: &FocusTuning) -> PairEmphasis {
    if !focus_active || total == 0 {
        return PairEmphasis::NEUTRAL;
    }
    if pair.get() + 1 == total {
        PairEmphasis {
            scale: tuning.focus_scale,
            opacity: 1.0,
        }
    } else {
        PairEmphasis {
            scale: 1.0,
            opacity: tuning.dimmed_opacity,
        }
    }
}

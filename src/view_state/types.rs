//! Core view-state geometry types.
//!
//! All coordinates are in pixels. "Client space" means relative to the
//! top-left of the screen, the way bounding rectangles are reported after
//! a layout pass.

/// An axis-aligned rectangle in client space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Bounds {
    /// Rectangle with its top-left at (`left`, `top`).
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Same rectangle moved vertically by `dy`.
    pub fn offset_y(&self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            ..*self
        }
    }

    /// Fraction of this rectangle's height that lies inside `viewport`
    /// vertically.
    ///
    /// Returns `None` for zero or negative heights, where a fraction is
    /// meaningless. The result may be negative when the rectangle lies
    /// entirely outside the viewport.
    pub fn visible_fraction_in(&self, viewport: &Bounds) -> Option<f64> {
        if self.height <= 0.0 {
            return None;
        }
        let visible_top = (self.top - viewport.top).max(0.0);
        let visible_bottom = (self.bottom() - viewport.top).min(viewport.height);
        Some((visible_bottom - visible_top) / self.height)
    }
}

/// Screen-space position for the avatar, derived from the focused AI
/// message's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FocusedPosition {
    /// Left edge of the avatar.
    pub left: f64,
    /// Top edge of the avatar.
    pub top: f64,
}

impl FocusedPosition {
    /// Position with the avatar's top-left at (`left`, `top`).
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

//! Viewport geometry: bottom padding and scroll targets.

use super::layout::LayoutSnapshot;
use tracing::debug;

/// Current measurements of the scroll viewport.
///
/// # Invariants
/// - `computed_padding >= padding_floor` of the observer that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// Visible height of the scroll container.
    pub viewport_height: f64,
    /// Height of the latest pair.
    pub last_pair_height: f64,
    /// Bottom padding below the latest pair.
    pub computed_padding: f64,
}

/// Bottom padding that lets the last pair sit centered when the thread is
/// scrolled to the bottom.
///
/// `max(floor, ((viewport_height - last_pair_height) / 2) * modifier)`,
/// rounded to whole pixels. The result is never below `floor`, even for
/// pairs taller than the viewport.
pub fn compute_padding(viewport_height: f64, last_pair_height: f64, modifier: f64, floor: f64) -> f64 {
    let base = (viewport_height - last_pair_height) / 2.0;
    let ideal = (base * modifier).max(floor);
    if ideal.is_finite() {
        ideal.round().max(floor)
    } else {
        floor
    }
}

/// Scroll offset that puts the last pair's top `fraction` of the viewport
/// height below the container top. Clamped at 0.
///
/// Returns `None` when the container or the last pair is not rendered.
pub fn scroll_to_latest_target(snapshot: &LayoutSnapshot, fraction: f64) -> Option<f64> {
    let container = snapshot.container()?;
    let last = snapshot.last_pair()?;
    Some((last.offset_top - container.client_height() * fraction).max(0.0))
}

/// Keeps `ViewportGeometry` current from successive snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryObserver {
    geometry: ViewportGeometry,
    padding_modifier: f64,
    padding_floor: f64,
}

impl GeometryObserver {
    /// Observer starting at `padding_floor` until the first measurement.
    pub fn new(padding_modifier: f64, padding_floor: f64) -> Self {
        Self {
            geometry: ViewportGeometry {
                viewport_height: 0.0,
                last_pair_height: 0.0,
                computed_padding: padding_floor,
            },
            padding_modifier,
            padding_floor,
        }
    }

    /// Latest measurements.
    pub fn geometry(&self) -> ViewportGeometry {
        self.geometry
    }

    /// Latest bottom padding.
    pub fn padding(&self) -> f64 {
        self.geometry.computed_padding
    }

    /// Recompute from `snapshot`.
    ///
    /// Returns `false` and keeps the previous geometry when the container
    /// or the last pair is not rendered.
    pub fn measure(&mut self, snapshot: &LayoutSnapshot) -> bool {
        let (Some(container), Some(last)) = (snapshot.container(), snapshot.last_pair()) else {
            debug!("Geometry measurement skipped: nothing rendered");
            return false;
        };

        let viewport_height = container.client_height();
        let last_pair_height = last.height();
        let computed_padding = compute_padding(
            viewport_height,
            last_pair_height,
            self.padding_modifier,
            self.padding_floor,
        );

        let next = ViewportGeometry {
            viewport_height,
            last_pair_height,
            computed_padding,
        };
        if next != self.geometry {
            debug!(
                viewport_height,
                last_pair_height, computed_padding, "Viewport geometry updated"
            );
            self.geometry = next;
        }
        true
    }
}

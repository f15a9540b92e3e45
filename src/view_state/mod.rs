//! View-state layer - pure geometry for the focus-tracking thread
//!
//! Everything here operates on plain `LayoutSnapshot` data and has no
//! knowledge of timers, listeners or the terminal.
//!
//! # Module Structure
//!
//! - `types`: Bounds and FocusedPosition
//! - `layout`: LayoutSnapshot - measurements captured after a render pass
//! - `stacked`: StackedLayout - vertical pair stacking producing snapshots
//! - `geometry`: ViewportGeometry, bottom padding and scroll targets
//! - `resolver`: centered-pair resolution with direction bias
//! - `intersection`: threshold-crossing watcher and in-view messages
//! - `emphasis`: per-pair scale/opacity in focus mode
//! - `tuning`: FocusTuning reference constants

pub mod emphasis;
pub mod geometry;
pub mod intersection;
pub mod layout;
pub mod resolver;
pub mod stacked;
pub mod tuning;
pub mod types;

pub use emphasis::{pair_emphasis, PairEmphasis};
pub use geometry::{compute_padding, scroll_to_latest_target, GeometryObserver, ViewportGeometry};
pub use intersection::{messages_in_view, IntersectionWatcher};
pub use layout::{ContainerBox, LayoutSnapshot, PairBox};
pub use resolver::{resolve_centered_pair, CenteredPairResolver, ResolverWeights, ScrollDirection};
pub use stacked::{PairHeights, StackedLayout};
pub use tuning::FocusTuning;
pub use types::{Bounds, FocusedPosition};

//! Stateful core of the focus-tracking viewport.
//!
//! Everything here runs on the caller's event loop against a virtual
//! clock; nothing sleeps or spawns.

pub mod broadcaster;
pub mod debug;
pub mod focus;
pub mod listeners;
pub mod signal;
pub mod timers;
pub mod viewport;

pub use broadcaster::{compute_position, AvatarOffsets, PositionBroadcaster};
pub use debug::DebugOverlay;
pub use focus::{FocusMachine, FocusState};
pub use listeners::{Listener, Listeners};
pub use signal::{ScrollBehavior, ScrollRequest, SignalSender, ViewportSignal};
pub use timers::{Millis, TimerKind, TimerQueue};
pub use viewport::{Lifecycle, ThreadProps, ThreadViewport};

//! Layout dimension constants for TUI rendering.

/// Height of the chat input box in lines (border + content).
pub const INPUT_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Rows taken by the author label above every message.
pub const MESSAGE_HEADER_ROWS: usize = 1;

/// Blank rows between the user and AI message of a pair.
pub const MESSAGE_GAP_ROWS: usize = 1;

/// Blank rows between consecutive pairs.
pub const PAIR_GAP_ROWS: usize = 1;

/// Columns the AI message text is indented by.
pub const AI_INDENT_COLS: u16 = 2;

/// Width of the debug overlay box, borders included.
pub const DEBUG_OVERLAY_WIDTH: u16 = 24;

/// Height of the debug overlay box, borders included.
pub const DEBUG_OVERLAY_HEIGHT: u16 = 5;

/// How long a smooth scroll takes.
pub const SMOOTH_SCROLL_MS: u64 = 300;

/// Frame interval while something is animating.
pub const ANIMATION_FRAME_MS: u64 = 16;

/// Longest the event loop sleeps when nothing is scheduled.
pub const IDLE_POLL_MS: u64 = 250;

//! Coach Focus
//!
//! A focus-tracking message viewport: it works out which message pair is
//! centered in a scrolling thread, runs the focus-mode state machine and
//! reports where the avatar should sit beside the active AI reply.
//!
//! Follows a Pure Core / Impure Shell architecture. `model`, `view_state`
//! and `state` are pure and run on a virtual clock; `view` owns the
//! terminal.

pub mod config;
pub mod conversation;
pub mod logging;
pub mod model;
pub mod speech;
pub mod state;
pub mod view;
pub mod view_state;

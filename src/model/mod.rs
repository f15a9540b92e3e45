//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod message;
pub mod pair;
pub mod transcript;

// Re-export for convenience
pub use error::{AppError, TranscriptError};
pub use identifiers::{InvalidMessageId, MessageId, MessageIdAllocator};
pub use key_action::KeyAction;
pub use message::{Message, Role};
pub use pair::{pair_messages, MessagePair, PairIndex, Pairing};

//! Identifier newtypes with smart constructors.
//!
//! Raw constructors are never exported - use smart constructors only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a message in the conversation.
///
/// Used as the queryable tag that lets geometry lookups find a rendered
/// message after a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(String);

impl MessageId {
    /// Smart constructor: validates non-empty id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidMessageId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidMessageId::Empty);
        }
        Ok(Self(raw))
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MessageId {
    type Error = InvalidMessageId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

/// Hands out monotonically increasing message ids.
///
/// Ids are decimal strings, so a transcript seeded with "1".."N" can be
/// continued by starting the allocator at N + 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageIdAllocator {
    next: u64,
}

impl MessageIdAllocator {
    /// Start allocating at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first.max(1) }
    }

    /// Continue after the highest numeric id in `ids`.
    ///
    /// Non-numeric ids are ignored.
    pub fn after<'a>(ids: impl IntoIterator<Item = &'a MessageId>) -> Self {
        let highest = ids
            .into_iter()
            .filter_map(|id| id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self::starting_at(highest.saturating_add(1))
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> MessageId {
        let id = MessageId(self.next.to_string());
        self.next = self.next.saturating_add(1);
        id
    }
}

impl Default for MessageIdAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

// ===== Error Types =====

/// Why a raw string is not a valid [`MessageId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMessageId {
    /// The id was empty.
    #[error("Message ID cannot be empty")]
    Empty,
}

// ===== Tests =====

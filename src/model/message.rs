//! Conversation messages.

use super::identifiers::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A message the user typed.
    User,
    /// A reply from the coach.
    Ai,
}

/// A single conversation message.
///
/// Immutable once created, except `is_streaming` which goes from `true`
/// to `false` exactly once via [`Message::finish_streaming`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    is_streaming: bool,
}

impl Message {
    /// A completed user message.
    pub fn user(id: MessageId, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            created_at,
            is_streaming: false,
        }
    }

    /// An AI message. `is_streaming` is the initial streaming flag.
    pub fn ai(
        id: MessageId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        is_streaming: bool,
    ) -> Self {
        Self {
            id,
            role: Role::Ai,
            content: content.into(),
            created_at,
            is_streaming,
        }
    }

    /// Identifier used to find the message after layout.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Who wrote the message.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Text of the message.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the message was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the reply is still being revealed.
    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    /// Whether the user wrote the message.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Whether the coach wrote the message.
    pub fn is_ai(&self) -> bool {
        self.role == Role::Ai
    }

    /// Mark streaming as finished.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn finish_streaming(&mut self) -> bool {
        std::mem::replace(&mut self.is_streaming, false)
    }
}

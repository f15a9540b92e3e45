//! Seed transcripts: the conversation the thread opens with.

use super::error::TranscriptError;
use super::identifiers::MessageId;
use super::message::Message;
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::path::Path;

/// Load a transcript from a JSON array of messages.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or
/// contains duplicate message ids.
pub fn load_transcript(path: impl AsRef<Path>) -> Result<Vec<Message>, TranscriptError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| TranscriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let messages: Vec<Message> =
        serde_json::from_str(&contents).map_err(|source| TranscriptError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut seen = HashSet::new();
    for message in &messages {
        if !seen.insert(message.id().clone()) {
            return Err(TranscriptError::DuplicateId {
                path: path.to_path_buf(),
                id: message.id().to_string(),
            });
        }
    }

    Ok(messages)
}

const SEED_TURNS: &[(&str, &str)] = &[
    (
        "Lately every week feels the same and I can't tell if I'm growing.",
        "That sameness can be heavy. When did you last feel like you were learning something that stretched you?",
    ),
    (
        "Probably when I led the migration project last spring.",
        "What about leading that project gave you energy? Was it the problem, the people, or the stakes?",
    ),
    (
        "The people, honestly. Helping the team get unstuck felt great.",
        "So helping others move forward matters to you. Where in your current week could a little more of that fit?",
    ),
    (
        "Maybe I could offer to pair with the new hires.",
        "That is a concrete, small step. What would make it easy to start this week rather than someday?",
    ),
];

/// The built-in coaching conversation used when no transcript is given.
///
/// Ids are "1".."N" and timestamps step back one minute per message.
pub fn seed_conversation() -> Vec<Message> {
    let total = SEED_TURNS.len() * 2;
    let now = Utc::now();
    let mut messages = Vec::with_capacity(total);

    for (turn, (user_text, ai_text)) in SEED_TURNS.iter().enumerate() {
        let user_n = turn * 2 + 1;
        let ai_n = user_n + 1;
        let user_at = now - Duration::minutes((total - user_n + 1) as i64);
        let ai_at = now - Duration::minutes((total - ai_n + 1) as i64);

        // ids are non-empty decimal literals
        if let (Ok(user_id), Ok(ai_id)) = (
            MessageId::new(user_n.to_string()),
            MessageId::new(ai_n.to_string()),
        ) {
            messages.push(Message::user(user_id, *user_text, user_at));
            messages.push(Message::ai(ai_id, *ai_text, ai_at, false));
        }
    }

    messages
}

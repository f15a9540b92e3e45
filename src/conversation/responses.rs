//! Canned coach replies.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Where AI replies come from.
pub trait ResponseSource: Send {
    /// Reply to `prompt`.
    fn next_response(&mut self, prompt: &str) -> String;
}

const COACH_REPLIES: &[&str] = &[
    "Feeling stuck is often a sign you have outgrown something. What is one small thing you used to enjoy that has slipped out of your week?",
    "You sound ready for a change without knowing where it starts. Picture an ordinary Tuesday that felt right to you. What is different about it?",
    "That kind of tiredness is real, and naming it matters. When did you last do something purely because you wanted to?",
    "A lot of people feel a gap between who they are and who they are expected to be. Which part of yourself would you like to bring back?",
    "Wanting more meaning is a strong place to start from. If you changed one thing about tomorrow morning, what would it be?",
    "Admitting something is not working takes nerve. If nobody else had an opinion, what would success look like for you?",
    "Questioning things usually means growth has already begun. Is there a boundary you keep wishing you had set?",
    "You do not need every answer today. How would it feel to let yourself be unfinished for a while?",
];

/// Picks uniformly at random from a fixed list of replies.
#[derive(Debug, Clone)]
pub struct CannedResponses<R = StdRng> {
    replies: Vec<String>,
    rng: R,
}

impl CannedResponses<StdRng> {
    /// The built-in coaching replies with an entropy-seeded generator.
    pub fn coach() -> Self {
        Self::with_rng(
            COACH_REPLIES.iter().map(|reply| reply.to_string()).collect(),
            StdRng::from_entropy(),
        )
    }
}

impl<R: Rng> CannedResponses<R> {
    /// An empty `replies` list falls back to the built-in replies.
    pub fn with_rng(replies: Vec<String>, rng: R) -> Self {
        let replies = if replies.is_empty() {
            COACH_REPLIES.iter().map(|reply| reply.to_string()).collect()
        } else {
            replies
        };
        Self { replies, rng }
    }

    /// The replies drawn from.
    pub fn replies(&self) -> &[String] {
        &self.replies
    }
}

impl<R: Rng + Send> ResponseSource for CannedResponses<R> {
    fn next_response(&mut self, _prompt: &str) -> String {
        self.replies
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }
}

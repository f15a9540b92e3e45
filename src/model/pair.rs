//! Grouping of a flat message list into conversational turns.

use super::message::Message;
use std::fmt;

/// Index of a message pair within the current pairing. 0-indexed internally,
/// 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PairIndex(usize);

impl PairIndex {
    /// Wrap a 0-based index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The 0-based index.
    pub fn get(&self) -> usize {
        self.0
    }

    /// 1-based index for user-facing display.
    pub fn display(&self) -> usize {
        self.0 + 1
    }
}

impl From<usize> for PairIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for PairIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A user message immediately followed by an AI message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagePair {
    /// The user message that opens the pair.
    pub user: Message,
    /// The AI reply that directly follows it.
    pub ai: Message,
    /// Position of this pair in the pairing.
    pub pair_index: PairIndex,
}

/// Result of pairing a message sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pairing {
    /// Complete pairs in conversation order.
    pub pairs: Vec<MessagePair>,
    /// Messages that did not form a pair (e.g. a trailing user message
    /// still waiting for its reply). Never rendered as pairs.
    pub unpaired: Vec<Message>,
}

impl Pairing {
    /// Index of the latest pair, if any pair exists.
    pub fn last_index(&self) -> Option<PairIndex> {
        self.pairs.last().map(|pair| pair.pair_index)
    }

    /// Number of complete pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair is complete.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair at `index`, if it exists.
    pub fn get(&self, index: PairIndex) -> Option<&MessagePair> {
        self.pairs.get(index.get())
    }
}

/// Group `messages` into (user, ai) pairs.
///
/// Scans left to right: a user message followed directly by an AI message
/// forms a pair and both are consumed; anything else is left unpaired and
/// the scan advances by one.
pub fn pair_messages(messages: &[Message]) -> Pairing {
    let mut pairing = Pairing::default();
    let mut i = 0;

    while i < messages.len() {
        let current = &messages[i];
        match messages.get(i + 1) {
            Some(next) if current.is_user() && next.is_ai() => {
                pairing.pairs.push(MessagePair {
                    user: current.clone(),
                    ai: next.clone(),
                    pair_index: PairIndex::new(pairing.pairs.len()),
                });
                i += 2;
            }
            _ => {
                pairing.unpaired.push(current.clone());
                i += 1;
            }
        }
    }

    pairing
}

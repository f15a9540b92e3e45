//! Conversation controller.
//!
//! Owns the message list the viewport renders. Sending a message appends
//! it, raises the waiting flag and schedules a canned reply; the reply is
//! spoken, the waiting flag drops shortly after, and the reply stops
//! streaming once its reveal has finished. Like the viewport, the
//! controller runs on the caller's virtual clock.

pub mod responses;

pub use responses::{CannedResponses, ResponseSource};

use crate::model::{Message, MessageId, MessageIdAllocator};
use crate::speech::{AudioLevels, SpeechHandle, Speaker};
use crate::state::{Millis, ThreadProps};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, info};

/// Timing and speech settings of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationSettings {
    /// Delay between a user message and the reply.
    pub reply_delay_ms: u64,
    /// Delay between the reply and clearing the waiting flag.
    pub waiting_clear_delay_ms: u64,
    /// How long a reply streams before it is complete.
    pub streaming_duration_ms: u64,
    /// Whether replies are spoken.
    pub speech_enabled: bool,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
            waiting_clear_delay_ms: 200,
            streaming_duration_ms: 2500,
            speech_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scheduled {
    Reply { prompt: String },
    ClearWaiting,
    FinishStreaming(MessageId),
}

/// Message list, pending reply and speech for one chat session.
pub struct Conversation {
    messages: Vec<Message>,
    ids: MessageIdAllocator,
    responses: Box<dyn ResponseSource>,
    speaker: Box<dyn Speaker>,
    settings: ConversationSettings,
    speech_enabled: bool,
    speaking: Option<SpeechHandle>,
    levels: AudioLevels,
    levels_rx: Receiver<AudioLevels>,
    waiting: bool,
    scheduled: BTreeMap<(Millis, u64), Scheduled>,
    next_seq: u64,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("messages", &self.messages.len())
            .field("waiting", &self.waiting)
            .field("speech_enabled", &self.speech_enabled)
            .field("levels", &self.levels)
            .field("scheduled", &self.scheduled)
            .finish_non_exhaustive()
    }
}

impl Conversation {
    /// Start from `messages`, with ids continuing after the highest numeric one.
    pub fn new(
        messages: Vec<Message>,
        responses: Box<dyn ResponseSource>,
        mut speaker: Box<dyn Speaker>,
        settings: ConversationSettings,
    ) -> Self {
        let ids = MessageIdAllocator::after(messages.iter().map(Message::id));
        let (levels_tx, levels_rx) = mpsc::channel();
        speaker.on_levels(Box::new(move |levels| {
            if levels_tx.send(levels).is_err() {
                debug!("Conversation dropped, discarding audio levels");
            }
        }));
        Self {
            messages,
            ids,
            responses,
            speaker,
            speech_enabled: settings.speech_enabled,
            settings,
            speaking: None,
            levels: AudioLevels::SILENT,
            levels_rx,
            waiting: false,
            scheduled: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Every message, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a reply is still pending.
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Whether replies are spoken.
    pub fn speech_enabled(&self) -> bool {
        self.speech_enabled
    }

    /// Whether an utterance is in progress.
    pub fn is_speaking(&self) -> bool {
        self.speaking.is_some()
    }

    /// Latest audio levels reported by the speaker.
    pub fn audio_levels(&self) -> AudioLevels {
        self.levels
    }

    /// Props for the thread viewport.
    pub fn thread_props(&self, is_visible: bool) -> ThreadProps {
        ThreadProps::new(self.messages.clone())
            .visible(is_visible)
            .waiting(self.waiting)
    }

    /// Append a user message and schedule the reply. Blank input is
    /// ignored. Returns whether a message was sent.
    pub fn send(&mut self, text: &str, now: Millis) -> bool {
        let content = text.trim();
        if content.is_empty() {
            return false;
        }

        let id = self.ids.allocate();
        info!(%id, chars = content.chars().count(), "User message sent");
        self.messages.push(Message::user(id, content, Utc::now()));
        self.waiting = true;
        self.schedule(
            now + self.settings.reply_delay_ms,
            Scheduled::Reply {
                prompt: content.to_string(),
            },
        );
        true
    }

    /// Turn speech on or off. Turning it off stops the current utterance.
    pub fn set_speech_enabled(&mut self, enabled: bool) {
        self.speech_enabled = enabled;
        if !enabled {
            self.stop_speech();
        }
        info!(enabled, "Speech toggled");
    }

    /// Flip [`Conversation::set_speech_enabled`].
    pub fn toggle_speech(&mut self) {
        self.set_speech_enabled(!self.speech_enabled);
    }

    /// Stop the current utterance, if any.
    pub fn stop_speech(&mut self) {
        if let Some(handle) = self.speaking.take() {
            self.speaker.stop(handle);
        }
        self.drain_levels();
    }

    /// When the next scheduled event is due.
    pub fn next_due(&self) -> Option<Millis> {
        self.scheduled.keys().next().map(|(due, _)| *due)
    }

    /// Run everything due at `now`. Returns whether the message list
    /// changed (a message was added or finished streaming) or the waiting
    /// flag flipped.
    pub fn advance(&mut self, now: Millis) -> bool {
        let mut changed = false;
        while let Some(entry) = self.scheduled.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let event = entry.remove();
            changed |= self.run(event, now);
        }
        self.drain_levels();
        changed
    }

    fn drain_levels(&mut self) {
        if let Some(latest) = self.levels_rx.try_iter().last() {
            self.levels = latest;
        }
    }

    fn schedule(&mut self, due: Millis, event: Scheduled) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.scheduled.insert((due, seq), event);
    }

    fn run(&mut self, event: Scheduled, now: Millis) -> bool {
        match event {
            Scheduled::Reply { prompt } => {
                let reply = self.responses.next_response(&prompt);
                let id = self.ids.allocate();
                debug!(%id, "AI reply arrived");
                self.messages
                    .push(Message::ai(id.clone(), reply.clone(), Utc::now(), true));

                if self.speech_enabled {
                    self.speaking = Some(self.speaker.speak(&reply));
                }
                self.schedule(now + self.settings.waiting_clear_delay_ms, Scheduled::ClearWaiting);
                self.schedule(
                    now + self.settings.streaming_duration_ms,
                    Scheduled::FinishStreaming(id),
                );
                true
            }
            Scheduled::ClearWaiting => std::mem::replace(&mut self.waiting, false),
            Scheduled::FinishStreaming(id) => self
                .messages
                .iter_mut()
                .find(|message| message.id() == &id)
                .is_some_and(Message::finish_streaming),
        }
    }
}

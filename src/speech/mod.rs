//! Speech output collaborator.
//!
//! The conversation speaks AI replies through an injected [`Speaker`].
//! Real text-to-speech is not part of this crate; [`SilentSpeaker`] stands
//! in for it and only records what would have been said.

use std::fmt;
use tracing::debug;

/// Identifies one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeechHandle(u64);

impl SpeechHandle {
    /// Handle with the raw id `id`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SpeechHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "speech#{}", self.0)
    }
}

/// Audio levels reported while speaking, each in `0.0..=1.0`.
///
/// The orb uses these to pulse with the voice.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioLevels {
    /// Overall loudness.
    pub level: f64,
    /// Energy in the low band.
    pub low_freq: f64,
    /// Energy in the high band.
    pub high_freq: f64,
}

impl AudioLevels {
    /// All levels at zero.
    pub const SILENT: Self = Self {
        level: 0.0,
        low_freq: 0.0,
        high_freq: 0.0,
    };
}

/// Receiver of [`AudioLevels`] while speaking.
pub type LevelsCallback = Box<dyn FnMut(AudioLevels) + Send>;

/// Something that can say text out loud.
///
/// Speaking while another utterance is active stops the earlier one.
pub trait Speaker: Send {
    /// Start saying `text`. Returns the handle of the new utterance.
    fn speak(&mut self, text: &str) -> SpeechHandle;

    /// Stop `handle` if it is still the active utterance.
    fn stop(&mut self, handle: SpeechHandle);

    /// Register the receiver of audio levels, replacing any earlier one.
    fn on_levels(&mut self, callback: LevelsCallback);
}

/// Speaker that produces no audio.
#[derive(Default)]
pub struct SilentSpeaker {
    next_id: u64,
    active: Option<SpeechHandle>,
    spoken: Vec<String>,
    levels: Option<LevelsCallback>,
}

impl SilentSpeaker {
    /// Speaker with nothing spoken yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The utterance in progress, if any.
    pub fn active(&self) -> Option<SpeechHandle> {
        self.active
    }

    /// Everything passed to `speak`, oldest first.
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }

    fn report(&mut self, levels: AudioLevels) {
        if let Some(callback) = self.levels.as_mut() {
            callback(levels);
        }
    }
}

impl fmt::Debug for SilentSpeaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SilentSpeaker")
            .field("active", &self.active)
            .field("spoken", &self.spoken.len())
            .finish_non_exhaustive()
    }
}

impl Speaker for SilentSpeaker {
    fn speak(&mut self, text: &str) -> SpeechHandle {
        if let Some(previous) = self.active {
            self.stop(previous);
        }
        let handle = SpeechHandle::new(self.next_id);
        self.next_id += 1;
        debug!(%handle, chars = text.chars().count(), "Speaking (silent)");
        self.spoken.push(text.to_string());
        self.active = Some(handle);
        handle
    }

    fn stop(&mut self, handle: SpeechHandle) {
        if self.active == Some(handle) {
            debug!(%handle, "Speech stopped");
            self.active = None;
            self.report(AudioLevels::SILENT);
        }
    }

    fn on_levels(&mut self, callback: LevelsCallback) {
        self.levels = Some(callback);
    }
}

//! TUI rendering and terminal management (impure shell)

pub mod app;
pub mod constants;
pub mod input;
pub mod layout;
pub mod orb;
pub mod overlay;
pub mod scroll;
pub mod styles;
pub mod thread;

pub use app::{ChatApp, ChatModes};
pub use layout::{CellMetrics, ScreenAreas, ThreadPane};
pub use orb::OrbState;
pub use styles::{ChatStyles, ColorConfig};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::conversation::{CannedResponses, Conversation, ConversationSettings};
use crate::model::transcript::{load_transcript, seed_conversation};
use crate::model::AppError;
use crate::speech::SilentSpeaker;
use crate::state::Millis;
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Conversation timing and speech from the resolved configuration.
pub fn conversation_settings(config: &ResolvedConfig) -> ConversationSettings {
    ConversationSettings {
        reply_delay_ms: config.reply_delay_ms,
        streaming_duration_ms: config.streaming_duration_ms,
        speech_enabled: config.speech_enabled,
        ..ConversationSettings::default()
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    app: ChatApp,
    key_bindings: KeyBindings,
    started: Instant,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(conversation: Conversation, config: &ResolvedConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, conversation, config)
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Build the app on an existing terminal, e.g. a `TestBackend`.
    pub fn with_terminal(
        terminal: Terminal<B>,
        conversation: Conversation,
        config: &ResolvedConfig,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);
        let cells = CellMetrics::new(config.cell_width_px, config.cell_height_px);

        let mut app = ChatApp::new(
            conversation,
            config.tuning.clone(),
            cells,
            screen,
            Millis::ZERO,
        );
        if config.debug_overlay {
            app.show_debug_overlay();
        }

        Ok(Self {
            terminal,
            app,
            key_bindings: KeyBindings::default(),
            started: Instant::now(),
        })
    }

    /// Shared access to the chat application state
    pub fn app(&self) -> &ChatApp {
        &self.app
    }

    /// Mutable access to the chat application state
    pub fn app_mut(&mut self) -> &mut ChatApp {
        &mut self.app
    }

    /// Shared access to the underlying terminal
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    fn now(&self) -> Millis {
        Millis::from(self.started.elapsed())
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits (Esc or Ctrl+C). Sleeps until the next
    /// input, scheduled event or animation frame.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        while !self.app.should_quit() {
            let timeout = self.app.poll_timeout(self.now());
            if event::poll(timeout)? {
                let event = event::read()?;
                let now = self.now();
                self.handle_event(event, now);
            }
            let now = self.now();
            self.app.tick(now);
            self.draw()?;
        }

        Ok(())
    }

    /// Dispatch a single terminal event to the application
    pub fn handle_event(&mut self, event: Event, now: Millis) {
        match event {
            Event::Key(key) => self.app.handle_key(key, &self.key_bindings, now),
            Event::Resize(width, height) => {
                debug!("Handling resize to {}x{}", width, height);
                self.app.resize(Rect::new(0, 0, width, height), now);
            }
            _ => {}
        }
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);
        if screen != self.app.screen() {
            let now = self.now();
            self.app.resize(screen, now);
        }

        let app = &self.app;
        self.terminal.draw(|frame| app.render(frame))?;
        Ok(())
    }
}

/// Load the opening conversation: the transcript if given, else the
/// built-in seed.
fn opening_messages(transcript: Option<&Path>) -> Result<Vec<crate::model::Message>, AppError> {
    match transcript {
        Some(path) => {
            let messages = load_transcript(path)?;
            info!(path = %path.display(), messages = messages.len(), "Transcript loaded");
            Ok(messages)
        }
        None => Ok(seed_conversation()),
    }
}

/// Run the chat shell until the user quits.
///
/// The terminal is restored even when the loop fails.
pub fn run_with_config(config: &ResolvedConfig, transcript: Option<&Path>) -> Result<(), TuiError> {
    let messages = opening_messages(transcript)?;
    let conversation = Conversation::new(
        messages,
        Box::new(CannedResponses::coach()),
        Box::new(SilentSpeaker::new()),
        conversation_settings(config),
    );

    let mut tui = TuiApp::new(conversation, config)?;
    let result = tui.run();

    restore_terminal()?;

    result
}

fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn test_app(config: &ResolvedConfig) -> TuiApp<TestBackend> {
        let conversation = Conversation::new(
            seed_conversation(),
            Box::new(CannedResponses::coach()),
            Box::new(SilentSpeaker::new()),
            conversation_settings(config),
        );
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        TuiApp::with_terminal(terminal, conversation, config).unwrap()
    }

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    #[test]
    fn settings_follow_resolved_config() {
        let config = ResolvedConfig {
            reply_delay_ms: 5,
            streaming_duration_ms: 6,
            speech_enabled: false,
            ..ResolvedConfig::default()
        };
        let settings = conversation_settings(&config);
        assert_eq!(settings.reply_delay_ms, 5);
        assert_eq!(settings.streaming_duration_ms, 6);
        assert!(!settings.speech_enabled);
        assert_eq!(settings.waiting_clear_delay_ms, 200);
    }

    #[test]
    fn debug_overlay_flag_opens_overlay() {
        let config = ResolvedConfig {
            debug_overlay: true,
            ..ResolvedConfig::default()
        };
        assert!(test_app(&config).app().viewport().is_debug_visible());
    }

    #[test]
    fn draw_renders_without_error() {
        let mut tui = test_app(&ResolvedConfig::default());
        tui.draw().unwrap();
    }

    #[test]
    fn resize_event_updates_screen() {
        let mut tui = test_app(&ResolvedConfig::default());
        tui.handle_event(Event::Resize(100, 40), Millis::new(5));
        assert_eq!(tui.app().screen(), Rect::new(0, 0, 100, 40));
    }

    #[test]
    fn key_event_goes_through_bindings() {
        let mut tui = test_app(&ResolvedConfig::default());
        tui.handle_event(
            Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Millis::new(5),
        );
        assert!(tui.app().should_quit());
    }

    #[test]
    fn missing_transcript_is_an_error() {
        let result = opening_messages(Some(Path::new("/nonexistent/coach-focus.json")));
        assert!(matches!(result, Err(AppError::Transcript(_))));
    }
}

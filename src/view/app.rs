//! Chat shell state: modes, input, scrolling and the orb.
//!
//! `ChatApp` owns the conversation and the thread viewport, measures the
//! thread after every change and carries out what the viewport asks for.
//! It never touches the terminal, so it is driven directly in tests.

use super::constants::{ANIMATION_FRAME_MS, IDLE_POLL_MS, SMOOTH_SCROLL_MS};
use super::input::{InputLine, StatusBar};
use super::layout::{orb_gutter_cols, split_screen, CellMetrics, ScreenAreas, ThreadPane};
use super::orb::{orb_rect, OrbState, OrbWidget};
use super::overlay::{overlay_rect, DebugOverlayWidget};
use super::scroll::SmoothScroll;
use super::styles::ChatStyles;
use super::thread::ThreadView;
use crate::config::KeyBindings;
use crate::conversation::Conversation;
use crate::model::{KeyAction, PairIndex};
use crate::state::{Millis, ScrollBehavior, ScrollRequest, ThreadViewport, ViewportSignal};
use crate::view_state::{messages_in_view, FocusTuning, LayoutSnapshot, PairEmphasis};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::debug;

/// Which parts of the chat are open.
///
/// The thread is tracked only while it is actually on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatModes {
    /// The chat panel is open.
    pub expanded: bool,
    /// Whiteboard mode replaces the conversation.
    pub canvas: bool,
    /// The thread is folded away behind the input.
    pub collapsed: bool,
}

impl ChatModes {
    /// Whether the message thread is on screen.
    pub fn thread_visible(&self) -> bool {
        self.expanded && !self.canvas && !self.collapsed
    }
}

impl Default for ChatModes {
    fn default() -> Self {
        Self {
            expanded: true,
            canvas: false,
            collapsed: false,
        }
    }
}

/// The chat screen: conversation, focus viewport and everything drawn around them.
///
/// All time-dependent work runs on the `now` the caller passes in.
pub struct ChatApp {
    conversation: Conversation,
    viewport: ThreadViewport,
    signals: Receiver<ViewportSignal>,
    modes: ChatModes,
    input: String,
    cells: CellMetrics,
    screen: Rect,
    areas: ScreenAreas,
    scroll_top: f64,
    animation: Option<SmoothScroll>,
    orb: OrbState,
    styles: ChatStyles,
    quit: bool,
}

impl ChatApp {
    /// Mount the thread for `conversation` on a screen of `screen` cells.
    pub fn new(
        conversation: Conversation,
        tuning: FocusTuning,
        cells: CellMetrics,
        screen: Rect,
        now: Millis,
    ) -> Self {
        let (tx, signals) = mpsc::channel();
        let areas = split_screen(screen, orb_gutter_cols(&tuning, &cells));
        let modes = ChatModes::default();

        let mut app = Self {
            viewport: ThreadViewport::new(tuning, tx),
            conversation,
            signals,
            modes,
            input: String::new(),
            cells,
            screen,
            areas,
            scroll_top: 0.0,
            animation: None,
            orb: OrbState::default(),
            styles: ChatStyles::default(),
            quit: false,
        };

        let props = app.conversation.thread_props(modes.thread_visible());
        app.viewport.mount(props, now);
        let snapshot = app.snapshot();
        app.viewport.set_layout(snapshot, now);
        app.drain_signals(now);
        app
    }

    /// Replace the default styles.
    pub fn with_styles(mut self, styles: ChatStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Open the focus debug overlay.
    pub fn show_debug_overlay(&mut self) {
        if !self.viewport.is_debug_visible() {
            self.viewport.toggle_debug();
        }
    }

    /// The conversation being shown.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The focus-tracking viewport of the thread.
    pub fn viewport(&self) -> &ThreadViewport {
        &self.viewport
    }

    /// Which parts of the chat are open.
    pub fn modes(&self) -> ChatModes {
        self.modes
    }

    /// Text typed so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current scroll offset of the thread in pixels.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Whether a smooth scroll is animating.
    pub fn is_scrolling(&self) -> bool {
        self.animation.is_some()
    }

    /// Orb state from the latest viewport signals.
    pub fn orb(&self) -> OrbState {
        self.orb
    }

    /// The whole frame.
    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// How the frame is split.
    pub fn areas(&self) -> ScreenAreas {
        self.areas
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// The thread area measured in cells.
    pub fn pane(&self) -> ThreadPane {
        ThreadPane::new(self.areas.thread, self.cells)
    }

    /// The thread as it is drawn right now.
    pub fn snapshot(&self) -> LayoutSnapshot {
        self.pane()
            .measure(&self.viewport.pairs().pairs, self.scroll_top)
    }

    fn max_scroll(&self) -> f64 {
        self.pane()
            .max_scroll_top(&self.viewport.pairs().pairs, self.viewport.bottom_padding())
    }

    /// Map `key` through `bindings` and apply it. Plain characters go to the input line.
    pub fn handle_key(&mut self, key: KeyEvent, bindings: &KeyBindings, now: Millis) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(action) = bindings.get(key) {
            self.handle_action(action, now);
            return;
        }
        if let KeyCode::Char(c) = key.code {
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                self.input.push(c);
            }
        }
    }

    /// Apply one user action.
    pub fn handle_action(&mut self, action: KeyAction, now: Millis) {
        debug!(?action, "Key action");
        let row = self.cells.height_px;
        let page = self.cells.rows_to_px(usize::from(self.areas.thread.height));

        match action {
            KeyAction::ScrollUp => self.scroll_by(-row, now),
            KeyAction::ScrollDown => self.scroll_by(row, now),
            KeyAction::PageUp => self.scroll_by(-page, now),
            KeyAction::PageDown => self.scroll_by(page, now),
            KeyAction::Submit => {
                if self.conversation.send(&self.input, now) {
                    self.input.clear();
                    self.push_props(now);
                }
            }
            KeyAction::DeleteChar => {
                self.input.pop();
            }
            KeyAction::ToggleChat => {
                self.modes.expanded = !self.modes.expanded;
                self.push_props(now);
            }
            KeyAction::ToggleCanvas => {
                self.modes.canvas = !self.modes.canvas;
                if self.modes.canvas {
                    self.conversation.stop_speech();
                }
                self.push_props(now);
            }
            KeyAction::ToggleCollapsed => {
                self.modes.collapsed = !self.modes.collapsed;
                self.push_props(now);
            }
            KeyAction::ToggleSpeech => self.conversation.toggle_speech(),
            KeyAction::ToggleDebug => self.viewport.toggle_debug(),
            KeyAction::Quit => self.quit = true,
        }
        self.drain_signals(now);
    }

    /// Re-split the screen and report the resize to the viewport.
    pub fn resize(&mut self, screen: Rect, now: Millis) {
        self.screen = screen;
        self.areas = split_screen(screen, orb_gutter_cols(self.viewport.tuning(), &self.cells));
        self.scroll_top = self.scroll_top.min(self.max_scroll());
        let snapshot = self.snapshot();
        self.viewport.on_resize(snapshot, now);
        self.drain_signals(now);
    }

    /// Run everything due at `now`: conversation events, the scroll
    /// animation and viewport timers.
    pub fn tick(&mut self, now: Millis) {
        if self.conversation.advance(now) {
            self.push_props(now);
        }
        self.step_animation(now);
        self.viewport.advance(now);
        self.drain_signals(now);
    }

    /// How long the event loop may sleep before the next `tick` is due.
    pub fn poll_timeout(&self, now: Millis) -> Duration {
        let idle = if self.animation.is_some() {
            ANIMATION_FRAME_MS
        } else {
            IDLE_POLL_MS
        };
        let wake = [self.conversation.next_due(), self.viewport.next_timer_due()]
            .into_iter()
            .flatten()
            .fold(now + idle, Millis::min);
        Duration::from_millis(wake.since(now))
    }

    fn push_props(&mut self, now: Millis) {
        let props = self.conversation.thread_props(self.modes.thread_visible());
        self.viewport.update(props, now);
        self.scroll_top = self.scroll_top.min(self.max_scroll());
        let snapshot = self.snapshot();
        self.viewport.set_layout(snapshot, now);
    }

    fn scroll_by(&mut self, delta: f64, now: Millis) {
        self.animation = None;
        let target = (self.scroll_top + delta).clamp(0.0, self.max_scroll());
        self.set_scroll(target, now);
    }

    fn set_scroll(&mut self, top: f64, now: Millis) {
        if top == self.scroll_top {
            return;
        }
        self.scroll_top = top;
        let snapshot = self.snapshot();
        self.viewport.on_scroll(snapshot, now);
    }

    fn step_animation(&mut self, now: Millis) {
        let Some(animation) = self.animation else {
            return;
        };
        let top = animation.position(now).clamp(0.0, self.max_scroll());
        if animation.is_finished(now) {
            self.animation = None;
        }
        self.set_scroll(top, now);
    }

    fn request_scroll(&mut self, request: ScrollRequest, now: Millis) {
        debug!(top = request.top, pair = %request.pair_index, "Scroll requested");
        match request.behavior {
            ScrollBehavior::Smooth => {
                self.animation = Some(SmoothScroll::new(
                    self.scroll_top,
                    request.top,
                    now,
                    SMOOTH_SCROLL_MS,
                ));
            }
            ScrollBehavior::Instant => {
                self.animation = None;
                let top = request.top.clamp(0.0, self.max_scroll());
                self.set_scroll(top, now);
            }
        }
    }

    fn drain_signals(&mut self, now: Millis) {
        while let Ok(signal) = self.signals.try_recv() {
            match signal {
                ViewportSignal::FocusPositionChanged(position) => self.orb.position = position,
                ViewportSignal::TransitioningInChanged(active) => self.orb.transitioning = active,
                ViewportSignal::ScrollRequested(request) => self.request_scroll(request, now),
            }
        }
    }

    fn is_speaking_reply(&self) -> bool {
        self.conversation.is_speaking()
            && self
                .conversation
                .messages()
                .last()
                .is_some_and(|message| message.is_ai() && message.is_streaming())
    }

    /// Draw the whole screen.
    pub fn render(&self, frame: &mut Frame) {
        let body = self.areas.gutter.union(self.areas.thread);

        if self.modes.canvas {
            self.render_placeholder(
                frame,
                body,
                "Canvas",
                "Whiteboard mode. Press Tab to return to the conversation.",
            );
        } else if self.modes.thread_visible() {
            self.render_thread(frame);
        } else if !self.modes.expanded {
            self.render_placeholder(frame, body, "Chat", "Chat closed. Press Ctrl+E to open it.");
        } else {
            self.render_placeholder(frame, body, "Chat", "Thread collapsed. Press [ to show it.");
        }

        if !self.modes.canvas {
            if let Some(position) = self.orb.position {
                if let Some(rect) = orb_rect(position, self.viewport.tuning(), &self.cells, body) {
                    frame.render_widget(Clear, rect);
                    frame.render_widget(
                        OrbWidget::new(self.orb, self.is_speaking_reply(), self.styles)
                            .levels(self.conversation.audio_levels()),
                        rect,
                    );
                }
            }
        }

        frame.render_widget(
            InputLine::new(&self.input, self.conversation.is_waiting()),
            self.areas.input,
        );
        frame.render_widget(
            StatusBar::new(self.modes, self.conversation.speech_enabled(), self.styles),
            self.areas.status,
        );

        if self.viewport.is_debug_visible() {
            frame.render_widget(
                DebugOverlayWidget::new(self.viewport.debug_overlay()),
                overlay_rect(self.screen),
            );
        }
    }

    fn render_thread(&self, frame: &mut Frame) {
        let pairing = self.viewport.pairs();
        let emphasis: Vec<PairEmphasis> = (0..pairing.len())
            .map(|i| self.viewport.pair_emphasis(PairIndex::new(i)))
            .collect();
        let in_view = messages_in_view(&self.snapshot(), self.viewport.tuning().in_view_threshold);

        let view = ThreadView::new(pairing, self.pane(), &emphasis, &in_view)
            .scroll_top(self.scroll_top)
            .waiting(self.conversation.is_waiting())
            .styles(self.styles);
        frame.render_widget(view, self.areas.thread);
    }

    fn render_placeholder(&self, frame: &mut Frame, area: Rect, title: &str, text: &str) {
        let paragraph = Paragraph::new(text.to_string())
            .style(self.styles.hint())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

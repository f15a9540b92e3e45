//! Chat input box and status bar.

use super::app::ChatModes;
use super::styles::ChatStyles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The line the user types into. The cursor always sits at the end.
pub struct InputLine<'a> {
    text: &'a str,
    waiting: bool,
}

impl<'a> InputLine<'a> {
    /// `waiting` marks the title while a reply is pending.
    pub fn new(text: &'a str, waiting: bool) -> Self {
        Self { text, waiting }
    }
}

impl Widget for InputLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.waiting { "Message (waiting…)" } else { "Message" };
        let line = Line::from(vec![
            Span::raw(self.text.to_string()),
            Span::styled(
                " ",
                Style::default()
                    .bg(Color::White)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(area, buf);
    }
}

/// Key hints plus the current modes.
pub struct StatusBar {
    modes: ChatModes,
    speech_enabled: bool,
    styles: ChatStyles,
}

impl StatusBar {
    /// Status bar for `modes`.
    pub fn new(modes: ChatModes, speech_enabled: bool, styles: ChatStyles) -> Self {
        Self {
            modes,
            speech_enabled,
            styles,
        }
    }

    /// Mode label and key hints as one line.
    pub fn text(&self) -> String {
        let mode = if self.modes.canvas {
            "canvas"
        } else if !self.modes.expanded {
            "closed"
        } else if self.modes.collapsed {
            "collapsed"
        } else {
            "chat"
        };
        let speech = if self.speech_enabled { "on" } else { "off" };
        format!(
            "[{mode}] Enter send | ] debug | [ collapse | Tab canvas | ^E chat | ^S speech: {speech} | Esc quit"
        )
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(self.text(), self.styles.hint()))).render(area, buf);
    }
}

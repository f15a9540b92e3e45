//! The message thread widget.

use super::constants::{AI_INDENT_COLS, MESSAGE_GAP_ROWS, MESSAGE_HEADER_ROWS, PAIR_GAP_ROWS};
use super::layout::{wrap_text, ThreadPane};
use super::styles::ChatStyles;
use crate::model::{Message, MessageId, Pairing, Role};
use crate::view_state::PairEmphasis;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::collections::BTreeSet;

const USER_LABEL: &str = "You";
const AI_LABEL: &str = "Coach";
const STREAMING_MARKER: &str = " ▍";
const THINKING: &str = "Coach is thinking…";

/// Draws pairs top to bottom, then any unpaired messages, scrolled by
/// `scroll_top` pixels.
pub struct ThreadView<'a> {
    pairing: &'a Pairing,
    pane: ThreadPane,
    scroll_top: f64,
    emphasis: &'a [PairEmphasis],
    in_view: &'a BTreeSet<MessageId>,
    waiting: bool,
    styles: ChatStyles,
}

impl<'a> ThreadView<'a> {
    /// Thread of `pairing` with per-pair emphasis and the set of messages in view.
    pub fn new(
        pairing: &'a Pairing,
        pane: ThreadPane,
        emphasis: &'a [PairEmphasis],
        in_view: &'a BTreeSet<MessageId>,
    ) -> Self {
        Self {
            pairing,
            pane,
            scroll_top: 0.0,
            emphasis,
            in_view,
            waiting: false,
            styles: ChatStyles::default(),
        }
    }

    /// Scroll offset in pixels.
    pub fn scroll_top(mut self, scroll_top: f64) -> Self {
        self.scroll_top = scroll_top;
        self
    }

    /// Show the pending-reply row.
    pub fn waiting(mut self, waiting: bool) -> Self {
        self.waiting = waiting;
        self
    }

    /// Replace the default styles.
    pub fn styles(mut self, styles: ChatStyles) -> Self {
        self.styles = styles;
        self
    }

    fn message_lines(&self, message: &Message, emphasis: PairEmphasis) -> Vec<Line<'static>> {
        let in_view = self.in_view.contains(message.id());
        let label_style = self
            .styles
            .emphasize(self.styles.label(message.role()), emphasis, in_view);
        let body_style = self.styles.emphasize(self.styles.body(), emphasis, in_view);

        let (label, indent) = match message.role() {
            Role::User => (USER_LABEL, String::new()),
            Role::Ai => (AI_LABEL, " ".repeat(usize::from(AI_INDENT_COLS))),
        };

        let mut header = vec![Span::styled(label, label_style)];
        if message.is_streaming() {
            header.push(Span::styled(STREAMING_MARKER, label_style));
        }

        let mut lines = Vec::with_capacity(MESSAGE_HEADER_ROWS + 1);
        lines.push(Line::from(header));
        for row in wrap_text(message.content(), self.pane.text_width()) {
            lines.push(Line::from(Span::styled(format!("{indent}{row}"), body_style)));
        }
        lines
    }

    /// Every row of the thread, unscrolled.
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for (i, pair) in self.pairing.pairs.iter().enumerate() {
            let emphasis = self
                .emphasis
                .get(i)
                .copied()
                .unwrap_or(PairEmphasis::NEUTRAL);

            if i > 0 {
                blank(&mut lines, PAIR_GAP_ROWS);
            }
            lines.extend(self.message_lines(&pair.user, emphasis));
            blank(&mut lines, MESSAGE_GAP_ROWS);
            lines.extend(self.message_lines(&pair.ai, emphasis));
        }

        for message in &self.pairing.unpaired {
            if !lines.is_empty() {
                blank(&mut lines, PAIR_GAP_ROWS);
            }
            lines.extend(self.message_lines(message, PairEmphasis::NEUTRAL));
        }

        if self.waiting {
            blank(&mut lines, MESSAGE_GAP_ROWS);
            lines.push(Line::from(Span::styled(THINKING, self.styles.hint())));
        }

        lines
    }
}

fn blank(lines: &mut Vec<Line<'static>>, rows: usize) {
    lines.extend(std::iter::repeat_with(Line::default).take(rows));
}

impl Widget for ThreadView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.pane.scroll_rows(self.scroll_top);
        Paragraph::new(self.lines())
            .scroll((rows, 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pair_messages;
    use crate::view::layout::CellMetrics;
    use chrono::Utc;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn id(raw: &str) -> MessageId {
        MessageId::new(raw).unwrap()
    }

    fn thread(trailing_user: bool) -> Vec<Message> {
        let mut messages = vec![
            Message::user(id("1"), "hi", Utc::now()),
            Message::ai(id("2"), "hello there", Utc::now(), false),
            Message::user(id("3"), "again", Utc::now()),
            Message::ai(id("4"), "welcome back", Utc::now(), true),
        ];
        if trailing_user {
            messages.push(Message::user(id("5"), "one more", Utc::now()));
        }
        messages
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn render(view: ThreadView<'_>, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(view, frame.area()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn row_count_matches_measured_layout() {
        let pairing = pair_messages(&thread(false));
        let pane = ThreadPane::new(Rect::new(0, 0, 30, 20), CellMetrics::default());
        let in_view = BTreeSet::new();
        let view = ThreadView::new(&pairing, pane, &[], &in_view);

        let snapshot = pane.measure(&pairing.pairs, 0.0);
        let last = snapshot.last_pair().unwrap();
        let measured_rows = ((last.offset_top + last.height()) / 20.0) as usize;
        assert_eq!(view.lines().len(), measured_rows);
    }

    #[test]
    fn renders_labels_and_indented_ai_text() {
        let pairing = pair_messages(&thread(false));
        let pane = ThreadPane::new(Rect::new(0, 0, 30, 12), CellMetrics::default());
        let in_view = BTreeSet::new();
        let buf = render(ThreadView::new(&pairing, pane, &[], &in_view), 30, 12);

        assert_eq!(row(&buf, 0), "You");
        assert_eq!(row(&buf, 1), "hi");
        assert_eq!(row(&buf, 2), "");
        assert_eq!(row(&buf, 3), "Coach");
        assert_eq!(row(&buf, 4), "  hello there");
    }

    #[test]
    fn streaming_reply_shows_marker() {
        let pairing = pair_messages(&thread(false));
        let pane = ThreadPane::new(Rect::new(0, 0, 30, 12), CellMetrics::default());
        let in_view = BTreeSet::new();
        let buf = render(ThreadView::new(&pairing, pane, &[], &in_view), 30, 12);

        assert_eq!(row(&buf, 9), "Coach ▍");
    }

    #[test]
    fn scroll_top_skips_whole_rows() {
        let pairing = pair_messages(&thread(false));
        let pane = ThreadPane::new(Rect::new(0, 0, 30, 6), CellMetrics::default());
        let in_view = BTreeSet::new();
        let view = ThreadView::new(&pairing, pane, &[], &in_view).scroll_top(60.0);
        let buf = render(view, 30, 6);

        assert_eq!(row(&buf, 0), "Coach");
    }

    #[test]
    fn unpaired_message_and_thinking_hint_follow_pairs() {
        let pairing = pair_messages(&thread(true));
        let pane = ThreadPane::new(Rect::new(0, 0, 30, 20), CellMetrics::default());
        let in_view = BTreeSet::new();
        let lines = ThreadView::new(&pairing, pane, &[], &in_view)
            .waiting(true)
            .lines();

        let text: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(text[11], "");
        assert_eq!(text[12], "You");
        assert_eq!(text[13], "one more");
        assert_eq!(text.last().map(String::as_str), Some(THINKING));
    }
}

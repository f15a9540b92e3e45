//! Focus diagnostics overlay.

use super::constants::{DEBUG_OVERLAY_HEIGHT, DEBUG_OVERLAY_WIDTH};
use crate::state::DebugOverlay;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Top-right corner of `area`, shrunk to fit.
pub fn overlay_rect(area: Rect) -> Rect {
    let width = DEBUG_OVERLAY_WIDTH.min(area.width);
    let height = DEBUG_OVERLAY_HEIGHT.min(area.height);
    Rect::new(area.right() - width, area.y, width, height)
}

/// Bordered box listing the focus diagnostics.
pub struct DebugOverlayWidget {
    overlay: DebugOverlay,
}

impl DebugOverlayWidget {
    /// Widget drawing `overlay`.
    pub fn new(overlay: DebugOverlay) -> Self {
        Self { overlay }
    }
}

impl Widget for DebugOverlayWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let lines: Vec<Line> = self.overlay.lines().into_iter().map(Line::from).collect();
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Focus")
                    .style(Style::default().fg(Color::Yellow)),
            )
            .render(area, buf);
    }
}

//! The orb avatar that floats beside the focused AI message.

use super::layout::CellMetrics;
use super::styles::ChatStyles;
use crate::speech::AudioLevels;
use crate::view_state::{FocusTuning, FocusedPosition};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

/// What the orb knows from the viewport's signals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbState {
    /// Where to draw, or `None` while released.
    pub position: Option<FocusedPosition>,
    /// Drawn faded while the viewport is transitioning in.
    pub transitioning: bool,
}

/// Cell rectangle of the orb for a published position, clipped to `area`.
///
/// The position is the top-left of an avatar box twice the configured half
/// sizes. Returns `None` when nothing of the orb lands inside `area`.
pub fn orb_rect(
    position: FocusedPosition,
    tuning: &FocusTuning,
    cells: &CellMetrics,
    area: Rect,
) -> Option<Rect> {
    let left = cells.px_to_cols(position.left);
    let top = cells.px_to_rows(position.top);
    let right = left + cells.px_to_cols(tuning.avatar_half_width_px * 2.0).max(1);
    let bottom = top + cells.px_to_rows(tuning.avatar_half_height_px * 2.0).max(1);

    let x0 = left.max(i64::from(area.x));
    let y0 = top.max(i64::from(area.y));
    let x1 = right.min(i64::from(area.right()));
    let y1 = bottom.min(i64::from(area.bottom()));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    Some(Rect::new(
        u16::try_from(x0).ok()?,
        u16::try_from(y0).ok()?,
        u16::try_from(x1 - x0).ok()?,
        u16::try_from(y1 - y0).ok()?,
    ))
}

/// Voice level above which a speaking orb shows its loud glyph.
const LOUD_LEVEL: f64 = 0.5;

/// Renders the orb into the rectangle from [`orb_rect`].
pub struct OrbWidget {
    transitioning: bool,
    speaking: bool,
    levels: AudioLevels,
    styles: ChatStyles,
}

impl OrbWidget {
    /// Orb for `state`, silent until [`OrbWidget::levels`] says otherwise.
    pub fn new(state: OrbState, speaking: bool, styles: ChatStyles) -> Self {
        Self {
            transitioning: state.transitioning,
            speaking,
            levels: AudioLevels::SILENT,
            styles,
        }
    }

    /// Pulse with the speaker's current levels.
    pub fn levels(mut self, levels: AudioLevels) -> Self {
        self.levels = levels;
        self
    }

    fn glyph(&self) -> &'static str {
        match (self.transitioning, self.speaking) {
            (true, _) => "◌",
            (false, true) if self.levels.level > LOUD_LEVEL => "◎",
            (false, true) => "◉",
            (false, false) => "●",
        }
    }
}

impl Widget for OrbWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.styles.orb(self.transitioning);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(style);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }
        let middle = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
        Paragraph::new(Line::from(self.glyph()))
            .alignment(Alignment::Center)
            .style(style)
            .render(middle, buf);
    }
}

//! Terminal geometry: cell metrics, the screen split and thread measurement.
//!
//! The focus core works in pixels. A terminal has cells, so every cell is
//! given a nominal pixel size and the thread is measured in those units.
//! Rows laid out here must match what `thread::ThreadView` draws row for row.

use super::constants::{
    AI_INDENT_COLS, INPUT_HEIGHT, MESSAGE_GAP_ROWS, MESSAGE_HEADER_ROWS, PAIR_GAP_ROWS,
    STATUS_BAR_HEIGHT,
};
use crate::model::{Message, MessagePair};
use crate::view_state::{Bounds, FocusTuning, LayoutSnapshot, PairHeights, StackedLayout};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthChar;

/// Nominal pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Width of a cell in pixels.
    pub width_px: f64,
    /// Height of a cell in pixels.
    pub height_px: f64,
}

impl CellMetrics {
    /// Sizes below one pixel are raised to one.
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px: width_px.max(1.0),
            height_px: height_px.max(1.0),
        }
    }

    /// Pixel bounds of a cell rectangle.
    pub fn rect_to_bounds(&self, rect: Rect) -> Bounds {
        Bounds::new(
            f64::from(rect.x) * self.width_px,
            f64::from(rect.y) * self.height_px,
            f64::from(rect.width) * self.width_px,
            f64::from(rect.height) * self.height_px,
        )
    }

    /// Pixel height of `rows` rows.
    pub fn rows_to_px(&self, rows: usize) -> f64 {
        rows as f64 * self.height_px
    }

    /// Pixel width of `cols` columns.
    pub fn cols_to_px(&self, cols: usize) -> f64 {
        cols as f64 * self.width_px
    }

    /// Nearest whole row for a vertical pixel offset.
    pub fn px_to_rows(&self, px: f64) -> i64 {
        (px / self.height_px).round() as i64
    }

    /// Nearest whole column for a horizontal pixel offset.
    pub fn px_to_cols(&self, px: f64) -> i64 {
        (px / self.width_px).round() as i64
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(10.0, 20.0)
    }
}

/// Greedy word wrap by display width.
///
/// Words wider than `width` are split across lines. Always yields at least
/// one line, so an empty message still takes a row.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width: usize = word.chars().filter_map(UnicodeWidthChar::width).sum();
            let needed = if line.is_empty() { word_width } else { word_width + 1 };

            if line_width + needed <= width {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += needed;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if line_width + ch_width > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }

        lines.push(line);
    }

    lines
}

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Column left of the thread where the orb floats.
    pub gutter: Rect,
    /// Scrollable message thread.
    pub thread: Rect,
    /// Input line.
    pub input: Rect,
    /// Status bar.
    pub status: Rect,
}

/// Split the frame into gutter, thread, input and status bar.
pub fn split_screen(area: Rect, gutter_cols: u16) -> ScreenAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);

    let gutter_cols = gutter_cols.min(area.width.saturating_sub(1));
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(gutter_cols), Constraint::Min(1)])
        .split(vertical[0]);

    ScreenAreas {
        gutter: body[0],
        thread: body[1],
        input: vertical[1],
        status: vertical[2],
    }
}

/// Columns the orb needs left of the AI text so that it sits fully on
/// screen.
pub fn orb_gutter_cols(tuning: &FocusTuning, cells: &CellMetrics) -> u16 {
    let reach = (tuning.avatar_gap_px + tuning.avatar_half_width_px) / cells.width_px;
    let cols = reach.ceil().max(0.0) as u64;
    u16::try_from(cols)
        .unwrap_or(u16::MAX)
        .saturating_sub(AI_INDENT_COLS)
}

/// The thread's scroll container measured in cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreadPane {
    /// Cell rectangle of the container.
    pub area: Rect,
    /// Pixel size of one cell.
    pub cells: CellMetrics,
}

impl ThreadPane {
    /// Pane covering `area`.
    pub fn new(area: Rect, cells: CellMetrics) -> Self {
        Self { area, cells }
    }

    /// Columns available for message text.
    pub fn text_width(&self) -> usize {
        usize::from(self.area.width.saturating_sub(AI_INDENT_COLS)).max(1)
    }

    /// Rows one message occupies: label plus wrapped content.
    pub fn message_rows(&self, message: &Message) -> usize {
        MESSAGE_HEADER_ROWS + wrap_text(message.content(), self.text_width()).len()
    }

    /// Pixel heights of every pair's messages at the current width.
    pub fn pair_heights(&self, pairs: &[MessagePair]) -> Vec<PairHeights> {
        pairs
            .iter()
            .map(|pair| {
                PairHeights::new(
                    self.cells.rows_to_px(self.message_rows(&pair.user)),
                    self.cells.rows_to_px(self.message_rows(&pair.ai)),
                )
            })
            .collect()
    }

    /// Stacked layout matching how the thread is drawn.
    pub fn stacked(&self) -> StackedLayout {
        StackedLayout::new(self.cells.rect_to_bounds(self.area))
            .with_gaps(
                self.cells.rows_to_px(PAIR_GAP_ROWS),
                self.cells.rows_to_px(MESSAGE_GAP_ROWS),
            )
            .with_ai_content_inset(self.cells.cols_to_px(usize::from(AI_INDENT_COLS)))
    }

    /// Snapshot of `pairs` as drawn at `scroll_top`.
    pub fn measure(&self, pairs: &[MessagePair], scroll_top: f64) -> LayoutSnapshot {
        self.stacked()
            .measure(pairs, &self.pair_heights(pairs), scroll_top)
    }

    /// Largest scroll offset, leaving `bottom_padding` below the last pair.
    pub fn max_scroll_top(&self, pairs: &[MessagePair], bottom_padding: f64) -> f64 {
        self.stacked()
            .max_scroll_top(&self.pair_heights(pairs), bottom_padding)
    }

    /// Rows scrolled past for a pixel offset.
    pub fn scroll_rows(&self, scroll_top: f64) -> u16 {
        u16::try_from(self.cells.px_to_rows(scroll_top).max(0)).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;

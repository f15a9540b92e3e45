//! Snapshot tests for the chat shell
//!
//! Uses insta + ratatui TestBackend to verify rendering output doesn't regress.

use coach_focus::conversation::{CannedResponses, Conversation, ConversationSettings};
use coach_focus::model::transcript::seed_conversation;
use coach_focus::model::{KeyAction, PairIndex};
use coach_focus::speech::SilentSpeaker;
use coach_focus::state::{DebugOverlay, Millis};
use coach_focus::view::overlay::DebugOverlayWidget;
use coach_focus::view::{CellMetrics, ChatApp};
use coach_focus::view_state::FocusTuning;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

// ===== Test Helpers =====

/// Convert a ratatui buffer to a string, dropping empty trailing lines.
fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

fn row(buffer: &ratatui::buffer::Buffer, y: u16) -> String {
    let area = buffer.area();
    (area.left()..area.right())
        .map(|x| buffer[(x, y)].symbol())
        .collect::<String>()
}

fn seeded_app() -> ChatApp {
    let conversation = Conversation::new(
        seed_conversation(),
        Box::new(CannedResponses::coach()),
        Box::new(SilentSpeaker::new()),
        ConversationSettings::default(),
    );
    ChatApp::new(
        conversation,
        FocusTuning::default(),
        CellMetrics::default(),
        Rect::new(0, 0, 80, 24),
        Millis::ZERO,
    )
}

fn render(app: &ChatApp) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal
}

// ===== Debug overlay =====

#[test]
fn snapshot_debug_overlay_in_focus() {
    let overlay = DebugOverlay {
        current_pair: Some(PairIndex::new(2)),
        total_pairs: 3,
        focus_active: true,
    };
    let mut terminal = Terminal::new(TestBackend::new(24, 5)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(DebugOverlayWidget::new(overlay), frame.area()))
        .unwrap();

    insta::assert_snapshot!(buffer_to_string(terminal.backend().buffer()), @r"
    ┌Focus─────────────────┐
    │Current Pair: 3       │
    │Total Pairs: 3        │
    │Focus: ON             │
    └──────────────────────┘
    ");
}

// ===== Whole screen =====

#[test]
fn seeded_thread_renders_chrome() {
    let app = seeded_app();
    let terminal = render(&app);
    let buffer = terminal.backend().buffer();

    assert!(row(buffer, 20).starts_with("┌Message"));
    assert!(row(buffer, 23).starts_with("[chat] Enter send"));
    assert!(buffer_to_string(buffer).contains("You"));
    assert!(buffer_to_string(buffer).contains("Coach"));
}

#[test]
fn debug_overlay_draws_over_top_right_corner() {
    let mut app = seeded_app();
    app.handle_action(KeyAction::ToggleDebug, Millis::new(10));
    let terminal = render(&app);
    let buffer = terminal.backend().buffer();

    let top: String = (56..80).map(|x| buffer[(x, 0)].symbol()).collect();
    assert!(top.starts_with("┌Focus"), "{top}");
    assert!(row(buffer, 2).contains("Total Pairs: 4"));
}

#[test]
fn canvas_mode_replaces_thread() {
    let mut app = seeded_app();
    app.handle_action(KeyAction::ToggleCanvas, Millis::new(10));
    let terminal = render(&app);
    let screen = buffer_to_string(terminal.backend().buffer());

    assert!(screen.contains("Canvas"));
    assert!(screen.contains("[canvas]"));
    assert!(!screen.contains("Coach"));
}

#[test]
fn collapsed_thread_shows_hint() {
    let mut app = seeded_app();
    app.handle_action(KeyAction::ToggleCollapsed, Millis::new(10));
    let terminal = render(&app);
    let screen = buffer_to_string(terminal.backend().buffer());

    assert!(screen.contains("Thread collapsed"));
    assert!(screen.contains("[collapsed]"));
}

//! Keyboard bindings configuration.

use crate::model::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Keys without a binding are text input for the chat line.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only the code and modifiers take part in the lookup; key kind and
    /// state are ignored.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        let mut bind = |code, modifiers, action| {
            bindings.insert(KeyEvent::new(code, modifiers), action);
        };

        // Thread scrolling
        bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::ScrollUp);
        bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::ScrollDown);
        bind(KeyCode::PageUp, KeyModifiers::NONE, KeyAction::PageUp);
        bind(KeyCode::PageDown, KeyModifiers::NONE, KeyAction::PageDown);

        // Input line
        bind(KeyCode::Enter, KeyModifiers::NONE, KeyAction::Submit);
        bind(KeyCode::Backspace, KeyModifiers::NONE, KeyAction::DeleteChar);

        // Modes
        bind(KeyCode::Char('e'), KeyModifiers::CONTROL, KeyAction::ToggleChat);
        bind(KeyCode::Tab, KeyModifiers::NONE, KeyAction::ToggleCanvas);
        bind(KeyCode::Char('['), KeyModifiers::NONE, KeyAction::ToggleCollapsed);
        bind(KeyCode::Char('s'), KeyModifiers::CONTROL, KeyAction::ToggleSpeech);
        bind(KeyCode::Char(']'), KeyModifiers::NONE, KeyAction::ToggleDebug);

        // Application
        bind(KeyCode::Esc, KeyModifiers::NONE, KeyAction::Quit);
        bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        Self { bindings }
    }
}

//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
/// Keys without a binding are treated as text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the message thread up by one row. Default: ↑
    ScrollUp,
    /// Scroll the message thread down by one row. Default: ↓
    ScrollDown,
    /// Scroll up by one page height. Default: Page Up
    PageUp,
    /// Scroll down by one page height. Default: Page Down
    PageDown,

    // Input
    /// Send the current input line as a user message. Default: Enter
    Submit,
    /// Delete the last character of the input line. Default: Backspace
    DeleteChar,

    // Modes
    /// Expand or collapse the chat thread. Default: Ctrl+e
    ToggleChat,
    /// Switch between conversation and canvas (whiteboard) mode. Default: Tab
    ToggleCanvas,
    /// Collapse the thread while keeping the chat open. Default: [
    ToggleCollapsed,
    /// Enable or disable speaking AI replies. Default: Ctrl+s
    ToggleSpeech,
    /// Show the focus diagnostics overlay. Default: ]
    ToggleDebug,

    // Application
    /// Exit the application. Default: Esc/Ctrl+c
    Quit,
}

impl KeyAction {
    /// Whether this action moves the thread's scroll position.
    pub fn is_scroll(&self) -> bool {
        matches!(
            self,
            KeyAction::ScrollUp | KeyAction::ScrollDown | KeyAction::PageUp | KeyAction::PageDown
        )
    }
}

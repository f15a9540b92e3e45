//! Colors and text modifiers for the chat shell.

use crate::model::Role;
use crate::view_state::PairEmphasis;
use ratatui::style::{Color, Modifier, Style};

/// Whether colors are used at all.
///
/// Any value of `NO_COLOR` disables them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Colors unless `NO_COLOR` is set.
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Colors on or off regardless of the environment.
    pub fn enabled(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether colors are drawn.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

/// Styles for the thread, the orb and the chrome around them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatStyles {
    user_label: Style,
    ai_label: Style,
    body: Style,
    orb: Style,
    orb_transitioning: Style,
    hint: Style,
}

impl ChatStyles {
    /// Styles for `config`. Without colors only labels are bold.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                user_label: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ai_label: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                body: Style::default(),
                orb: Style::default().fg(Color::Magenta),
                orb_transitioning: Style::default().fg(Color::LightMagenta),
                hint: Style::default().fg(Color::DarkGray),
            }
        } else {
            let bold = Style::default().add_modifier(Modifier::BOLD);
            Self {
                user_label: bold,
                ai_label: bold,
                body: Style::default(),
                orb: Style::default(),
                orb_transitioning: Style::default(),
                hint: Style::default(),
            }
        }
    }

    /// Style of the speaker label for `role`.
    pub fn label(&self, role: Role) -> Style {
        match role {
            Role::User => self.user_label,
            Role::Ai => self.ai_label,
        }
    }

    /// Style of message text.
    pub fn body(&self) -> Style {
        self.body
    }

    /// Orb style, lighter while transitioning in.
    pub fn orb(&self, transitioning: bool) -> Style {
        if transitioning {
            self.orb_transitioning
        } else {
            self.orb
        }
    }

    /// Style of key hints and placeholders.
    pub fn hint(&self) -> Style {
        self.hint
    }

    /// Layer pair emphasis and the in-view fade onto `base`.
    ///
    /// Cells cannot scale, so an enlarged pair is drawn bold. A dimmed pair
    /// or a message not yet in view is drawn dim.
    pub fn emphasize(&self, base: Style, emphasis: PairEmphasis, in_view: bool) -> Style {
        let mut style = base;
        if emphasis.is_enlarged() {
            style = style.add_modifier(Modifier::BOLD);
        }
        if emphasis.is_dimmed() || !in_view {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }
}

impl Default for ChatStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env())
    }
}

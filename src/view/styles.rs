//! Pane and message styling.
//!
//! Provides the colours for borders, sender labels, markers and the selected
//! contact, all of which collapse to unstyled text when colours are off.

use crate::model::DisplayLine;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== PaneStyles =====

const ACCENT: Color = Color::Indexed(205);
const INACTIVE: Color = Color::Indexed(240);
const PEER: Color = Color::Indexed(86);
const MARKER: Color = Color::Indexed(220);

/// Styles used by the painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneStyles {
    /// Border of the contact sidebar.
    pub active_border: Style,
    /// Border of the chat and input panes.
    pub inactive_border: Style,
    /// Sender label of lines authored on this device.
    pub self_sender: Style,
    /// Sender label of peer lines.
    pub peer_sender: Style,
    /// Body of saved-media and call notices.
    pub marker: Style,
    /// Selected sidebar entry.
    pub selected_contact: Style,
    /// Placeholders and the clock column.
    pub dim: Style,
}

impl PaneStyles {
    /// Styles for the given colour configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if !config.colors_enabled() {
            return Self::plain();
        }
        Self {
            active_border: Style::default().fg(ACCENT),
            inactive_border: Style::default().fg(INACTIVE),
            self_sender: Style::default().fg(ACCENT),
            peer_sender: Style::default().fg(PEER),
            marker: Style::default().fg(MARKER).add_modifier(Modifier::ITALIC),
            selected_contact: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(INACTIVE),
        }
    }

    fn plain() -> Self {
        Self {
            active_border: Style::default(),
            inactive_border: Style::default(),
            self_sender: Style::default(),
            peer_sender: Style::default(),
            marker: Style::default(),
            // Selection must stay visible without colour.
            selected_contact: Style::default().add_modifier(Modifier::BOLD),
            dim: Style::default(),
        }
    }

    /// Style of a line's sender label.
    pub fn sender_style(&self, line: &DisplayLine) -> Style {
        if line.from_self {
            self.self_sender
        } else {
            self.peer_sender
        }
    }

    /// Style of a line's body, `None` for plain text.
    pub fn body_style(&self, line: &DisplayLine) -> Option<Style> {
        line.marker.then_some(self.marker)
    }
}

impl Default for PaneStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====

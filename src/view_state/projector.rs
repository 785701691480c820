//! Projection of the session model into a renderable description.
//!
//! [`project`] is pure: it reads the model and a viewport and produces the
//! exact strings and lines the painter draws. All truncation and clipping
//! decisions live here so they can be tested without a terminal.

use crate::model::DisplayLine;
use crate::state::SessionModel;
use crate::view::constants::{NAME_KEEP_CHARS, NAME_MAX_CHARS};
use crate::view_state::Viewport;

/// Shown in the chat pane when no conversation exists yet.
pub const WAITING_PLACEHOLDER: &str = "Waiting for messages...";

/// Shown in the input line while the buffer is empty.
pub const INPUT_PLACEHOLDER: &str = "Type a message...";

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub sidebar: SidebarView,
    pub chat: ChatView,
    pub input: InputView,
}

/// Contact list with the history indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    /// `History: ON (ctrl+h)` or `History: OFF (ctrl+h)`.
    pub header: String,
    pub history_enabled: bool,
    pub contacts: Vec<ContactEntry>,
}

/// One row of the contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    /// `> name` when selected, `  name` otherwise, name already elided.
    pub label: String,
    pub selected: bool,
}

/// Content of the chat pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatView {
    /// No conversations are listed.
    Placeholder(&'static str),
    /// Trailing lines of the selected conversation that fit the pane.
    Lines {
        /// Display name of the selected conversation.
        title: String,
        lines: Vec<DisplayLine>,
    },
}

/// Visible part of the text-entry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    /// Window of the buffer, or [`INPUT_PLACEHOLDER`] when empty.
    pub text: String,
    /// Caret column within `text`.
    pub caret_column: usize,
    /// Caret blink phase.
    pub caret_visible: bool,
    /// `text` is the placeholder, not user input.
    pub placeholder: bool,
}

/// Project `model` onto a screen of size `viewport`.
pub fn project(model: &SessionModel, viewport: Viewport) -> ViewModel {
    ViewModel {
        sidebar: project_sidebar(model),
        chat: project_chat(model, viewport),
        input: project_input(model, viewport),
    }
}

fn project_sidebar(model: &SessionModel) -> SidebarView {
    let history_enabled = model.history_enabled();
    let header = format!(
        "History: {} (ctrl+h)",
        if history_enabled { "ON" } else { "OFF" }
    );

    let selected = model.selected();
    let contacts = model
        .conversations()
        .iter()
        .map(|id| {
            let is_selected = selected == Some(id);
            let prefix = if is_selected { "> " } else { "  " };
            ContactEntry {
                label: format!("{prefix}{}", elide_name(model.display_name(id))),
                selected: is_selected,
            }
        })
        .collect();

    SidebarView {
        header,
        history_enabled,
        contacts,
    }
}

fn project_chat(model: &SessionModel, viewport: Viewport) -> ChatView {
    let Some(selected) = model.selected() else {
        return ChatView::Placeholder(WAITING_PLACEHOLDER);
    };
    let lines = model.lines(selected);
    let start = lines.len().saturating_sub(viewport.chat_capacity());
    ChatView::Lines {
        title: model.display_name(selected).to_string(),
        lines: lines[start..].to_vec(),
    }
}

fn project_input(model: &SessionModel, viewport: Viewport) -> InputView {
    let input = model.input();
    if input.is_empty() {
        return InputView {
            text: INPUT_PLACEHOLDER.to_string(),
            caret_column: 0,
            caret_visible: model.caret_visible(),
            placeholder: true,
        };
    }
    let window = input.window(usize::from(viewport.input_width()));
    InputView {
        text: window.text,
        caret_column: window.caret_column,
        caret_visible: model.caret_visible(),
        placeholder: false,
    }
}

/// Cut names longer than the sidebar allows, keeping a prefix and `...`.
pub fn elide_name(name: &str) -> String {
    if name.chars().count() > NAME_MAX_CHARS {
        let kept: String = name.chars().take(NAME_KEEP_CHARS).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

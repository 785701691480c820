//! Pane layout rendering.
//!
//! Paints a [`ViewModel`] into a frame: contact sidebar on the left, chat pane
//! above a fixed-height input pane on the right. No decisions about what to
//! show are made here; the projector already made them.

use crate::model::DisplayLine;
use crate::view::constants::{INPUT_PANE_HEIGHT, SIDEBAR_WIDTH};
use crate::view::PaneStyles;
use crate::view_state::{ChatView, InputView, SidebarView, ViewModel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Render one frame of the session.
pub fn render_layout(frame: &mut Frame, view: &ViewModel, styles: &PaneStyles) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH), // Contacts
            Constraint::Min(0),                // Chat + input
        ])
        .split(frame.area());

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(INPUT_PANE_HEIGHT),
        ])
        .split(columns[1]);

    render_sidebar(frame, columns[0], &view.sidebar, styles);
    render_chat(frame, right[0], &view.chat, styles);
    render_input(frame, right[1], &view.input, styles);
}

fn pane(border_style: ratatui::style::Style) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
}

fn render_sidebar(frame: &mut Frame, area: Rect, sidebar: &SidebarView, styles: &PaneStyles) {
    let mut lines = Vec::with_capacity(sidebar.contacts.len() + 2);
    lines.push(Line::from(Span::styled(sidebar.header.as_str(), styles.dim)));
    lines.push(Line::default());
    lines.extend(sidebar.contacts.iter().map(|contact| {
        if contact.selected {
            Line::from(Span::styled(contact.label.as_str(), styles.selected_contact))
        } else {
            Line::from(contact.label.as_str())
        }
    }));

    let paragraph = Paragraph::new(lines).block(pane(styles.active_border));
    frame.render_widget(paragraph, area);
}

fn render_chat(frame: &mut Frame, area: Rect, chat: &ChatView, styles: &PaneStyles) {
    let (block, lines) = match chat {
        ChatView::Placeholder(text) => (
            pane(styles.inactive_border),
            vec![Line::from(Span::styled(*text, styles.dim))],
        ),
        ChatView::Lines { title, lines } => (
            pane(styles.inactive_border).title(format!(" {title} ")),
            lines.iter().map(|line| chat_line(line, styles)).collect(),
        ),
    };
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn chat_line<'a>(line: &'a DisplayLine, styles: &PaneStyles) -> Line<'a> {
    let body = match styles.body_style(line) {
        Some(style) => Span::styled(line.body.as_str(), style),
        None => Span::raw(line.body.as_str()),
    };
    Line::from(vec![
        Span::styled(format!("[{}] ", line.clock), styles.dim),
        Span::styled(line.sender.as_str(), styles.sender_style(line)),
        Span::raw(": "),
        body,
    ])
}

fn render_input(frame: &mut Frame, area: Rect, input: &InputView, styles: &PaneStyles) {
    let text = if input.placeholder {
        Span::styled(input.text.as_str(), styles.dim)
    } else {
        Span::raw(input.text.as_str())
    };
    frame.render_widget(
        Paragraph::new(Line::from(text)).block(pane(styles.inactive_border)),
        area,
    );

    // Cursor is hidden for frames where it is not placed.
    if input.caret_visible && area.width > 2 && area.height > 2 {
        let max_column = usize::from(area.width - 3);
        let column = u16::try_from(input.caret_column.min(max_column)).unwrap_or(0);
        frame.set_cursor_position(Position::new(area.x + 1 + column, area.y + 1));
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;

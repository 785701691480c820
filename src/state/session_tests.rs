//! Tests for the session transition function.

use super::*;
use chrono::{TimeZone, Utc};
use crossterm::event::{KeyCode, KeyModifiers};

// ===== Test Helpers =====

fn conv(raw: &str) -> ConversationId {
    ConversationId::new(raw).expect("valid conversation id")
}

fn model() -> SessionModel {
    SessionModel::new(Settings::default(), ContactOrder::Alphabetical, 1000)
}

fn model_with(ids: &[&str]) -> SessionModel {
    let mut model = model();
    model.seed(ids.iter().map(|id| conv(id)).collect());
    model
}

fn key(code: KeyCode) -> SessionEvent {
    SessionEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> SessionEvent {
    SessionEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn incoming(chat: &str, body: &str) -> SessionEvent {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    SessionEvent::Incoming(Message::new(conv(chat), "peer", body, false, ts))
}

fn type_text(model: &mut SessionModel, text: &str) {
    let bindings = KeyBindings::default();
    for c in text.chars() {
        model.handle_event(key(KeyCode::Char(c)), &bindings);
    }
}

// ===== Resize / Tick =====

#[test]
fn resize_updates_viewport() {
    let mut model = model();
    let commands = model.handle_event(
        SessionEvent::Resize {
            width: 120,
            height: 40,
        },
        &KeyBindings::default(),
    );

    assert!(commands.is_empty());
    assert_eq!(model.viewport(), Viewport::new(120, 40));
    assert_eq!(model.viewport().input_width(), 86);
}

#[test]
fn tick_toggles_caret() {
    let mut model = model();
    let bindings = KeyBindings::default();
    assert!(model.caret_visible());
    model.handle_event(SessionEvent::Tick, &bindings);
    assert!(!model.caret_visible());
    model.handle_event(SessionEvent::Tick, &bindings);
    assert!(model.caret_visible());
}

// ===== Quit =====

#[test]
fn quit_terminates_and_disconnects() {
    let mut model = model();
    let commands = model.handle_event(ctrl('c'), &KeyBindings::default());

    assert_eq!(commands, vec![Command::Disconnect]);
    assert!(model.is_terminated());
}

#[test]
fn esc_also_quits() {
    let mut model = model();
    let commands = model.handle_event(key(KeyCode::Esc), &KeyBindings::default());
    assert_eq!(commands, vec![Command::Disconnect]);
}

#[test]
fn events_after_quit_are_ignored() {
    let mut model = model_with(&["a@x"]);
    let bindings = KeyBindings::default();
    model.handle_event(ctrl('c'), &bindings);

    assert!(model.handle_event(incoming("b@x", "late"), &bindings).is_empty());
    assert!(model.handle_event(key(KeyCode::Char('z')), &bindings).is_empty());
    assert_eq!(model.conversations().len(), 1);
    assert!(model.input().is_empty());
}

// ===== Toggle history =====

#[test]
fn toggle_off_persists_setting_only() {
    let mut model = model_with(&["a@x"]);
    let commands = model.handle_event(ctrl('h'), &KeyBindings::default());

    assert_eq!(
        commands,
        vec![Command::PersistSetting {
            history_enabled: false
        }]
    );
    assert!(!model.history_enabled());
}

#[test]
fn toggle_on_requests_load_of_selection() {
    let mut model = SessionModel::new(
        Settings {
            history_enabled: false,
        },
        ContactOrder::Alphabetical,
        1000,
    );
    model.seed(vec![conv("a@x")]);

    let commands = model.handle_event(key(KeyCode::F(2)), &KeyBindings::default());
    assert_eq!(
        commands,
        vec![
            Command::PersistSetting {
                history_enabled: true
            },
            Command::EnsureHistoryLoaded(conv("a@x")),
        ]
    );
}

#[test]
fn toggle_on_with_empty_list_only_persists() {
    let mut model = SessionModel::new(
        Settings {
            history_enabled: false,
        },
        ContactOrder::Alphabetical,
        1000,
    );
    let commands = model.handle_event(ctrl('h'), &KeyBindings::default());
    assert_eq!(
        commands,
        vec![Command::PersistSetting {
            history_enabled: true
        }]
    );
}

#[test]
fn toggle_keeps_buffered_lines() {
    let mut model = model();
    let bindings = KeyBindings::default();
    model.handle_event(incoming("a@x", "kept"), &bindings);
    model.handle_event(ctrl('h'), &bindings);
    model.handle_event(ctrl('h'), &bindings);

    assert_eq!(model.lines(&conv("a@x")).len(), 1);
}

// ===== Navigation =====

#[test]
fn down_moves_cursor_and_requests_history() {
    let mut model = model_with(&["b@x", "a@x", "c@x"]);
    assert_eq!(model.selected(), Some(&conv("a@x")));

    let commands = model.handle_event(key(KeyCode::Down), &KeyBindings::default());
    assert_eq!(model.cursor(), Some(1));
    assert_eq!(commands, vec![Command::EnsureHistoryLoaded(conv("b@x"))]);
}

#[test]
fn up_at_top_is_noop() {
    let mut model = model_with(&["a@x", "b@x"]);
    let commands = model.handle_event(key(KeyCode::Up), &KeyBindings::default());
    assert!(commands.is_empty());
    assert_eq!(model.cursor(), Some(0));
}

#[test]
fn down_at_bottom_is_noop() {
    let mut model = model_with(&["a@x", "b@x"]);
    let bindings = KeyBindings::default();
    model.handle_event(key(KeyCode::Down), &bindings);
    let commands = model.handle_event(key(KeyCode::Down), &bindings);
    assert!(commands.is_empty());
    assert_eq!(model.cursor(), Some(1));
}

#[test]
fn navigation_on_empty_list_is_noop() {
    let mut model = model();
    let bindings = KeyBindings::default();
    for event in [key(KeyCode::Up), key(KeyCode::Down), key(KeyCode::Enter)] {
        assert!(model.handle_event(event, &bindings).is_empty());
    }
    assert_eq!(model.cursor(), None);
}

// ===== Send =====

#[test]
fn enter_sends_and_clears_input() {
    let mut model = model_with(&["a@x"]);
    type_text(&mut model, "hi there");

    let commands = model.handle_event(key(KeyCode::Enter), &KeyBindings::default());
    assert_eq!(
        commands,
        vec![Command::SendMessage {
            conversation: conv("a@x"),
            text: "hi there".to_string(),
        }]
    );
    assert!(model.input().is_empty());
}

#[test]
fn enter_with_empty_input_is_noop() {
    let mut model = model_with(&["a@x"]);
    assert!(model
        .handle_event(key(KeyCode::Enter), &KeyBindings::default())
        .is_empty());
}

#[test]
fn enter_without_conversation_keeps_input() {
    let mut model = model();
    type_text(&mut model, "draft");
    assert!(model
        .handle_event(key(KeyCode::Enter), &KeyBindings::default())
        .is_empty());
    assert_eq!(model.input().value(), "draft");
}

#[test]
fn typing_respects_char_limit() {
    let mut model = SessionModel::new(Settings::default(), ContactOrder::Alphabetical, 4);
    type_text(&mut model, "abcdefgh");
    assert_eq!(model.input().value(), "abcd");
}

#[test]
fn typed_h_and_q_are_text_not_actions() {
    let mut model = model_with(&["a@x"]);
    type_text(&mut model, "hq");
    assert_eq!(model.input().value(), "hq");
    assert!(model.history_enabled());
    assert!(!model.is_terminated());
}

// ===== Incoming =====

#[test]
fn first_incoming_is_persisted_listed_resolved_and_loaded() {
    let mut model = model();
    let commands = model.handle_event(incoming("111@s.whatsapp.net", "yo"), &KeyBindings::default());

    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[0], Command::PersistMessage(_)));
    assert_eq!(
        commands[1],
        Command::ResolveDisplayName(conv("111@s.whatsapp.net"))
    );
    assert_eq!(
        commands[2],
        Command::EnsureHistoryLoaded(conv("111@s.whatsapp.net"))
    );
    assert_eq!(model.cursor(), Some(0));
    assert_eq!(model.lines(&conv("111@s.whatsapp.net")).len(), 1);
}

#[test]
fn incoming_with_history_off_is_not_persisted() {
    let mut model = SessionModel::new(
        Settings {
            history_enabled: false,
        },
        ContactOrder::Alphabetical,
        1000,
    );
    let commands = model.handle_event(incoming("a@x", "yo"), &KeyBindings::default());
    assert!(!commands
        .iter()
        .any(|c| matches!(c, Command::PersistMessage(_))));
}

#[test]
fn incoming_for_known_conversation_only_persists() {
    let mut model = model_with(&["a@x"]);
    let commands = model.handle_event(incoming("a@x", "again"), &KeyBindings::default());
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], Command::PersistMessage(_)));
}

#[test]
fn new_conversation_is_inserted_alphabetically_without_moving_selection() {
    let mut model = model_with(&["b@x", "d@x"]);
    let bindings = KeyBindings::default();
    model.handle_event(key(KeyCode::Down), &bindings);
    assert_eq!(model.selected(), Some(&conv("d@x")));

    let commands = model.handle_event(incoming("a@x", "new"), &bindings);

    assert_eq!(
        model.conversations(),
        &[conv("a@x"), conv("b@x"), conv("d@x")]
    );
    assert_eq!(model.selected(), Some(&conv("d@x")));
    assert!(!commands
        .iter()
        .any(|c| matches!(c, Command::EnsureHistoryLoaded(_))));
}

#[test]
fn recency_order_puts_new_conversation_first() {
    let mut model = SessionModel::new(Settings::default(), ContactOrder::Recency, 1000);
    model.seed(vec![conv("z@x"), conv("a@x")]);
    assert_eq!(model.conversations(), &[conv("z@x"), conv("a@x")]);

    model.handle_event(incoming("m@x", "hey"), &KeyBindings::default());
    assert_eq!(
        model.conversations(),
        &[conv("m@x"), conv("z@x"), conv("a@x")]
    );
    assert_eq!(model.selected(), Some(&conv("z@x")));
}

// ===== Seeding and names =====

#[test]
fn seed_sorts_and_dedupes_under_alphabetical() {
    let mut model = model();
    let added = model.seed(vec![conv("c@x"), conv("a@x"), conv("c@x")]);

    assert_eq!(added, vec![conv("a@x"), conv("c@x")]);
    assert_eq!(model.conversations(), &[conv("a@x"), conv("c@x")]);
    assert_eq!(model.cursor(), Some(0));
}

#[test]
fn seed_with_nothing_leaves_cursor_inactive() {
    let mut model = model();
    assert!(model.seed(Vec::new()).is_empty());
    assert_eq!(model.cursor(), None);
}

#[test]
fn display_name_falls_back_to_local_part() {
    let mut model = model_with(&["123@s.whatsapp.net"]);
    let id = conv("123@s.whatsapp.net");
    assert_eq!(model.display_name(&id), "123");

    model.set_display_name(id.clone(), "  ".to_string());
    assert_eq!(model.display_name(&id), "123");

    model.set_display_name(id.clone(), "Alice".to_string());
    assert_eq!(model.display_name(&id), "Alice");
}

#[test]
fn history_load_claim_respects_setting() {
    let mut model = model_with(&["a@x"]);
    let id = conv("a@x");
    model.handle_event(ctrl('h'), &KeyBindings::default());

    assert!(!model.begin_history_load(&id));

    model.handle_event(ctrl('h'), &KeyBindings::default());
    assert!(model.begin_history_load(&id));
    assert!(!model.begin_history_load(&id));
}

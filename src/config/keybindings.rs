//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Keys without a binding are text entry, so plain characters must never be
/// bound here.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only code and modifiers take part in the lookup; event kind and
    /// keyboard-enhancement state are ignored.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        let normalized = KeyEvent::new(key.code, key.modifiers);
        self.bindings.get(&normalized).copied()
    }

    /// Bind `code` + `modifiers` to `action`, replacing any existing binding.
    pub fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        // Application controls
        bindings.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);
        bindings.bind(KeyCode::Esc, KeyModifiers::NONE, KeyAction::Quit);

        // Ctrl+H is Backspace on some terminals; F2 always works
        bindings.bind(
            KeyCode::Char('h'),
            KeyModifiers::CONTROL,
            KeyAction::ToggleHistory,
        );
        bindings.bind(KeyCode::F(2), KeyModifiers::NONE, KeyAction::ToggleHistory);

        // Conversation navigation
        bindings.bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::SelectPrevious);
        bindings.bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::SelectNext);

        bindings.bind(KeyCode::Enter, KeyModifiers::NONE, KeyAction::Send);

        bindings
    }
}

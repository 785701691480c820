//! Session model and its pure transition function.
//!
//! [`SessionModel::handle_event`] is the only place events change state. It
//! performs no I/O: effects come back as [`Command`]s for the Dispatcher,
//! which feeds results back through the model's public operations.

use super::command::Command;
use super::conversation_cache::ConversationCache;
use super::text_input::TextInput;
use crate::config::KeyBindings;
use crate::model::{ContactOrder, ConversationId, DisplayLine, KeyAction, Message, Settings};
use crate::source::SessionEvent;
use crate::view_state::Viewport;
use crossterm::event::KeyEvent;
use std::collections::HashMap;
use tracing::debug;

/// Authoritative state of one interactive session.
///
/// # Invariants
/// - `cursor` is `None` iff `conversations` is empty, else `< conversations.len()`
/// - under [`ContactOrder::Alphabetical`] `conversations` is sorted
/// - each conversation id appears at most once
#[derive(Debug, Clone)]
pub struct SessionModel {
    conversations: Vec<ConversationId>,
    names: HashMap<ConversationId, String>,
    cache: ConversationCache,
    cursor: Option<usize>,
    viewport: Viewport,
    settings: Settings,
    order: ContactOrder,
    input: TextInput,
    caret_visible: bool,
    terminated: bool,
}

impl SessionModel {
    /// Empty session.
    pub fn new(settings: Settings, order: ContactOrder, input_char_limit: usize) -> Self {
        Self {
            conversations: Vec::new(),
            names: HashMap::new(),
            cache: ConversationCache::new(),
            cursor: None,
            viewport: Viewport::default(),
            settings,
            order,
            input: TextInput::new(input_char_limit),
            caret_visible: true,
            terminated: false,
        }
    }

    // ===== Transition =====

    /// Apply one event and return the side effects it requires.
    ///
    /// After quit every event is ignored.
    pub fn handle_event(&mut self, event: SessionEvent, bindings: &KeyBindings) -> Vec<Command> {
        if self.terminated {
            return Vec::new();
        }
        match event {
            SessionEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                Vec::new()
            }
            SessionEvent::Key(key) => self.handle_key(key, bindings),
            SessionEvent::Incoming(message) => self.handle_incoming(message),
            SessionEvent::Tick => {
                self.caret_visible = !self.caret_visible;
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, bindings: &KeyBindings) -> Vec<Command> {
        match bindings.get(key) {
            Some(KeyAction::Quit) => {
                debug!("Quit requested");
                self.terminated = true;
                vec![Command::Disconnect]
            }
            Some(KeyAction::ToggleHistory) => self.toggle_history(),
            Some(KeyAction::SelectPrevious) => self.step_cursor(false),
            Some(KeyAction::SelectNext) => self.step_cursor(true),
            Some(KeyAction::Send) => self.send(),
            None => {
                if self.input.handle_key(key) {
                    self.caret_visible = true;
                }
                Vec::new()
            }
        }
    }

    fn toggle_history(&mut self) -> Vec<Command> {
        self.settings.history_enabled = !self.settings.history_enabled;
        debug!(enabled = self.settings.history_enabled, "History toggled");

        let mut commands = vec![Command::PersistSetting {
            history_enabled: self.settings.history_enabled,
        }];
        if self.settings.history_enabled {
            if let Some(selected) = self.selected() {
                commands.push(Command::EnsureHistoryLoaded(selected.clone()));
            }
        }
        commands
    }

    fn step_cursor(&mut self, forward: bool) -> Vec<Command> {
        let Some(cursor) = self.cursor else {
            return Vec::new();
        };
        let next = if forward {
            if cursor + 1 >= self.conversations.len() {
                return Vec::new();
            }
            cursor + 1
        } else {
            if cursor == 0 {
                return Vec::new();
            }
            cursor - 1
        };
        self.cursor = Some(next);
        vec![Command::EnsureHistoryLoaded(self.conversations[next].clone())]
    }

    fn send(&mut self) -> Vec<Command> {
        let Some(conversation) = self.selected().cloned() else {
            return Vec::new();
        };
        if self.input.is_empty() {
            return Vec::new();
        }
        let text = self.input.take();
        vec![Command::SendMessage { conversation, text }]
    }

    fn handle_incoming(&mut self, message: Message) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.settings.history_enabled {
            commands.push(Command::PersistMessage(message.clone()));
        }

        let id = message.conversation_id().clone();
        let was_empty = self.conversations.is_empty();
        if self.insert_conversation(id.clone()) {
            commands.push(Command::ResolveDisplayName(id.clone()));
            if was_empty {
                commands.push(Command::EnsureHistoryLoaded(id));
            }
        }

        self.cache.append_live(&message);
        commands
    }

    // ===== Operations used by the Dispatcher =====

    /// Add a conversation per the ordering policy, keeping the selection.
    ///
    /// Returns `false` if it was already listed.
    pub fn insert_conversation(&mut self, id: ConversationId) -> bool {
        if self.conversations.contains(&id) {
            return false;
        }
        let selected = self.selected().cloned();

        let position = match self.order {
            ContactOrder::Alphabetical => match self.conversations.binary_search(&id) {
                Ok(pos) | Err(pos) => pos,
            },
            ContactOrder::Recency => 0,
        };
        self.conversations.insert(position, id);

        self.cursor = match selected {
            Some(selected) => self.conversations.iter().position(|c| *c == selected),
            None => Some(0),
        };
        true
    }

    /// Populate the list from the store's recent ids (most recent first).
    ///
    /// Returns the ids that were newly listed, in list order.
    pub fn seed(&mut self, recent: Vec<ConversationId>) -> Vec<ConversationId> {
        let mut added = Vec::new();
        for id in recent {
            if self.conversations.contains(&id) || added.contains(&id) {
                continue;
            }
            added.push(id);
        }

        let selected = self.selected().cloned();
        self.conversations.extend(added.iter().cloned());
        if self.order == ContactOrder::Alphabetical {
            self.conversations.sort();
            added.sort();
        }
        self.cursor = match selected {
            Some(selected) => self.conversations.iter().position(|c| *c == selected),
            None if self.conversations.is_empty() => None,
            None => Some(0),
        };
        added
    }

    /// Cache the resolved display name of `id`.
    pub fn set_display_name(&mut self, id: ConversationId, name: String) {
        self.names.insert(id, name);
    }

    /// Claim the history load for `id` if history is on and it is not loaded yet.
    pub fn begin_history_load(&mut self, id: &ConversationId) -> bool {
        self.settings.history_enabled && self.cache.begin_load(id)
    }

    /// Merge a fetched batch (oldest first) ahead of the buffered lines.
    pub fn complete_history_load(&mut self, id: &ConversationId, history: &[Message]) {
        self.cache.complete_load(id, history);
    }

    /// Release a history claim after a failed query.
    pub fn fail_history_load(&mut self, id: &ConversationId) {
        self.cache.fail_load(id);
    }

    /// Append a live line, listing the conversation if needed.
    pub fn append_live(&mut self, message: &Message) {
        self.insert_conversation(message.conversation_id().clone());
        self.cache.append_live(message);
    }

    // ===== Accessors =====

    /// Conversations in display order.
    pub fn conversations(&self) -> &[ConversationId] {
        &self.conversations
    }

    /// Index of the selected conversation.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> Option<&ConversationId> {
        self.cursor.and_then(|i| self.conversations.get(i))
    }

    /// Resolved name of `id`, or its local part when unresolved or empty.
    pub fn display_name<'a>(&'a self, id: &'a ConversationId) -> &'a str {
        match self.names.get(id) {
            Some(name) if !name.trim().is_empty() => name.as_str(),
            _ => id.local_part(),
        }
    }

    /// Buffered lines of `id`, oldest first.
    pub fn lines(&self, id: &ConversationId) -> &[DisplayLine] {
        self.cache.lines(id)
    }

    pub fn cache(&self) -> &ConversationCache {
        &self.cache
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn history_enabled(&self) -> bool {
        self.settings.history_enabled
    }

    pub fn contact_order(&self) -> ContactOrder {
        self.order
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn caret_visible(&self) -> bool {
        self.caret_visible
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether quit has been processed.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

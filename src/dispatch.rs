//! Command execution against the messaging client and the history store.
//!
//! The Dispatcher is the impure half of the session loop: it runs the
//! [`Command`]s returned by [`SessionModel::handle_event`] and writes the
//! results back through the model's public operations. Store and delivery
//! failures are logged and swallowed; the in-memory session stays the source
//! of truth for the current run.

use crate::messaging::MessagingClient;
use crate::model::{ConversationId, Message, Settings, HISTORY_ENABLED_KEY};
use crate::state::{Command, SessionModel};
use crate::store::{HistoryStore, RecordId};
use chrono::Utc;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Bounds on how much history is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    /// Messages merged into a conversation on first visit.
    pub window: usize,
    /// Conversations seeded at startup.
    pub recent_conversations: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            window: 100,
            recent_conversations: 20,
        }
    }
}

/// Executes session commands.
///
/// Owns the client handle and the store. History reads are bounded by the
/// watermark captured at construction, so rows written during this run are
/// never merged back in as history.
pub struct Dispatcher {
    client: Arc<dyn MessagingClient>,
    store: Box<dyn HistoryStore>,
    limits: HistoryLimits,
    watermark: RecordId,
}

impl Dispatcher {
    /// Take ownership of the collaborators and capture the history watermark.
    pub fn new(
        client: Arc<dyn MessagingClient>,
        store: Box<dyn HistoryStore>,
        limits: HistoryLimits,
    ) -> Self {
        let watermark = match store.last_record_id() {
            Ok(last) => last.unwrap_or(0),
            Err(e) => {
                warn!(error = %e, "Could not read history watermark; history will be empty");
                0
            }
        };
        debug!(watermark, "History watermark captured");
        Self {
            client,
            store,
            limits,
            watermark,
        }
    }

    /// Highest record id that history loads may return.
    pub fn watermark(&self) -> RecordId {
        self.watermark
    }

    pub fn store(&self) -> &dyn HistoryStore {
        self.store.as_ref()
    }

    pub fn client(&self) -> &Arc<dyn MessagingClient> {
        &self.client
    }

    /// Read the persisted settings, writing the default back when absent.
    pub fn load_settings(&self) -> Settings {
        match self.store.get_setting(HISTORY_ENABLED_KEY) {
            Ok(Some(value)) => Settings::from_stored(Some(&value)),
            Ok(None) => {
                let settings = Settings::default();
                self.persist_setting(settings.history_enabled);
                settings
            }
            Err(e) => {
                warn!(error = %e, "Could not read settings; using defaults");
                Settings::default()
            }
        }
    }

    /// Seed the model from recent history and eagerly load the selection.
    ///
    /// Does nothing when history is disabled.
    pub fn seed(&mut self, model: &mut SessionModel) {
        if !model.history_enabled() {
            debug!("History disabled, skipping seed");
            return;
        }
        let recent = match self
            .store
            .recent_conversation_ids(self.limits.recent_conversations)
        {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "Could not read recent conversations");
                return;
            }
        };

        let added = model.seed(recent);
        info!(count = added.len(), "Seeded conversations from history");
        for id in added {
            self.resolve_display_name(id, model);
        }
        if let Some(selected) = model.selected().cloned() {
            self.ensure_history_loaded(&selected, model);
        }
    }

    /// Run every command in order.
    pub fn execute_all(&mut self, commands: Vec<Command>, model: &mut SessionModel) {
        for command in commands {
            self.execute(command, model);
        }
    }

    /// Run one command.
    pub fn execute(&mut self, command: Command, model: &mut SessionModel) {
        match command {
            Command::SendMessage { conversation, text } => self.send(conversation, text, model),
            Command::PersistMessage(message) => self.persist_message(&message),
            Command::PersistSetting { history_enabled } => self.persist_setting(history_enabled),
            Command::EnsureHistoryLoaded(id) => self.ensure_history_loaded(&id, model),
            Command::ResolveDisplayName(id) => self.resolve_display_name(id, model),
            Command::Disconnect => {
                if let Err(e) = self.client.disconnect() {
                    warn!(error = %e, "Disconnect failed");
                }
            }
        }
    }

    /// Echo locally, persist if enabled, then deliver on a detached thread.
    fn send(&mut self, conversation: ConversationId, text: String, model: &mut SessionModel) {
        let echo = Message::outgoing(conversation.clone(), text.clone(), Utc::now());
        model.append_live(&echo);
        if model.history_enabled() {
            self.persist_message(&echo);
        }

        let client = Arc::clone(&self.client);
        let spawned = thread::Builder::new()
            .name("chatmux-send".to_string())
            .spawn(move || match client.send_text(&conversation, &text) {
                Ok(()) => debug!(conversation = %conversation, "Message delivered"),
                Err(e) => warn!(conversation = %conversation, error = %e, "Send failed"),
            });
        if let Err(e) = spawned {
            warn!(error = %e, "Could not start send thread; message not delivered");
        }
    }

    fn persist_message(&self, message: &Message) {
        if let Err(e) = self.store.insert_message(message) {
            warn!(conversation = %message.conversation_id(), error = %e, "Failed to persist message");
        }
    }

    fn persist_setting(&self, history_enabled: bool) {
        let value = Settings { history_enabled }.history_value();
        if let Err(e) = self.store.set_setting(HISTORY_ENABLED_KEY, value) {
            warn!(error = %e, "Failed to persist history setting");
        }
    }

    fn ensure_history_loaded(&mut self, id: &ConversationId, model: &mut SessionModel) {
        if !model.begin_history_load(id) {
            return;
        }
        match self.store.messages(id, self.limits.window, self.watermark) {
            Ok(history) => {
                debug!(conversation = %id, count = history.len(), "History loaded");
                model.complete_history_load(id, &history);
            }
            Err(e) => {
                warn!(conversation = %id, error = %e, "History load failed");
                model.fail_history_load(id);
            }
        }
    }

    fn resolve_display_name(&self, id: ConversationId, model: &mut SessionModel) {
        let name = self.client.resolve_display_name(&id);
        model.set_display_name(id, name);
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("limits", &self.limits)
            .field("watermark", &self.watermark)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{MediaHandle, NetworkHandler};
    use crate::model::{ContactOrder, MessagingError};
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;
    use std::time::Duration;

    // ===== Test Helpers =====

    /// Client that reports sends over a channel and can be told to fail.
    struct RecordingClient {
        sent: Mutex<Sender<(ConversationId, String)>>,
        fail_sends: bool,
        disconnects: Mutex<usize>,
    }

    impl RecordingClient {
        fn new(fail_sends: bool) -> (Arc<Self>, Receiver<(ConversationId, String)>) {
            let (tx, rx) = mpsc::channel();
            let client = Arc::new(Self {
                sent: Mutex::new(tx),
                fail_sends,
                disconnects: Mutex::new(0),
            });
            (client, rx)
        }
    }

    impl MessagingClient for RecordingClient {
        fn connect(&self) -> Result<(), MessagingError> {
            Ok(())
        }
        fn disconnect(&self) -> Result<(), MessagingError> {
            *self.disconnects.lock().unwrap() += 1;
            Ok(())
        }
        fn send_text(&self, to: &ConversationId, text: &str) -> Result<(), MessagingError> {
            let _ = self.sent.lock().unwrap().send((to.clone(), text.to_string()));
            if self.fail_sends {
                return Err(MessagingError::Send {
                    conversation: to.to_string(),
                    reason: "offline".to_string(),
                });
            }
            Ok(())
        }
        fn resolve_display_name(&self, id: &ConversationId) -> String {
            format!("Name of {}", id.local_part())
        }
        fn download_media(&self, _media: &MediaHandle) -> Result<Vec<u8>, MessagingError> {
            Err(MessagingError::Unsupported("media"))
        }
        fn subscribe(&self, _handler: NetworkHandler) {}
    }

    fn conv(raw: &str) -> ConversationId {
        ConversationId::new(raw).expect("valid conversation id")
    }

    fn at(minute: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 10, minute, 0).unwrap()
    }

    fn setup(
        store: Arc<MemoryStore>,
        fail_sends: bool,
    ) -> (
        Dispatcher,
        Arc<RecordingClient>,
        Receiver<(ConversationId, String)>,
    ) {
        let (client, rx) = RecordingClient::new(fail_sends);
        let dispatcher = Dispatcher::new(client.clone(), Box::new(store), HistoryLimits::default());
        (dispatcher, client, rx)
    }

    fn model(history_enabled: bool) -> SessionModel {
        SessionModel::new(
            Settings { history_enabled },
            ContactOrder::Alphabetical,
            1000,
        )
    }

    fn bodies(model: &SessionModel, id: &ConversationId) -> Vec<String> {
        model.lines(id).iter().map(|l| l.body.clone()).collect()
    }

    // ===== Send =====

    #[test]
    fn send_echoes_persists_and_delivers() {
        let store = Arc::new(MemoryStore::new());
        let (mut dispatcher, _client, sent) = setup(store.clone(), false);
        let mut model = model(true);
        model.seed(vec![conv("a@x")]);

        dispatcher.execute(
            Command::SendMessage {
                conversation: conv("a@x"),
                text: "hello".to_string(),
            },
            &mut model,
        );

        let lines = model.lines(&conv("a@x"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].sender, "Me");
        assert!(lines[0].from_self);
        assert_eq!(store.len(), 1);

        let delivered = sent.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(delivered, (conv("a@x"), "hello".to_string()));
    }

    #[test]
    fn failed_send_still_echoes_once() {
        let store = Arc::new(MemoryStore::new());
        let (mut dispatcher, _client, sent) = setup(store.clone(), true);
        let mut model = model(true);
        model.seed(vec![conv("a@x")]);

        dispatcher.execute(
            Command::SendMessage {
                conversation: conv("a@x"),
                text: "lost".to_string(),
            },
            &mut model,
        );

        sent.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(bodies(&model, &conv("a@x")), vec!["lost"]);
    }

    #[test]
    fn send_with_history_off_is_not_persisted() {
        let store = Arc::new(MemoryStore::new());
        let (mut dispatcher, _client, _sent) = setup(store.clone(), false);
        let mut model = model(false);
        model.insert_conversation(conv("a@x"));

        dispatcher.execute(
            Command::SendMessage {
                conversation: conv("a@x"),
                text: "ephemeral".to_string(),
            },
            &mut model,
        );

        assert!(store.is_empty());
        assert_eq!(model.lines(&conv("a@x")).len(), 1);
    }

    // ===== History =====

    #[test]
    fn history_is_loaded_once() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_message(&Message::new(conv("a@x"), "111", "old", false, at(0)))
            .unwrap();
        let (mut dispatcher, _client, _sent) = setup(store.clone(), false);
        let mut model = model(true);

        dispatcher.execute(Command::EnsureHistoryLoaded(conv("a@x")), &mut model);
        dispatcher.execute(Command::EnsureHistoryLoaded(conv("a@x")), &mut model);

        assert_eq!(bodies(&model, &conv("a@x")), vec!["old"]);
    }

    #[test]
    fn failed_history_load_is_retried_later() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_message(&Message::new(conv("a@x"), "111", "old", false, at(0)))
            .unwrap();
        let (mut dispatcher, _client, _sent) = setup(store.clone(), false);
        let mut model = model(true);

        store.set_unavailable(true);
        dispatcher.execute(Command::EnsureHistoryLoaded(conv("a@x")), &mut model);
        assert!(model.lines(&conv("a@x")).is_empty());
        assert!(!model.cache().is_loaded(&conv("a@x")));

        store.set_unavailable(false);
        dispatcher.execute(Command::EnsureHistoryLoaded(conv("a@x")), &mut model);
        assert_eq!(bodies(&model, &conv("a@x")), vec!["old"]);
    }

    #[test]
    fn messages_persisted_this_session_are_not_reloaded() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_message(&Message::new(conv("a@x"), "111", "before", false, at(0)))
            .unwrap();
        let (mut dispatcher, _client, _sent) = setup(store.clone(), false);
        let mut model = model(true);
        model.insert_conversation(conv("b@x"));

        // Live message to a@x while b@x is selected: persisted and appended, not loaded.
        let live = Message::new(conv("a@x"), "111", "during", false, at(5));
        let commands = model.handle_event(
            crate::source::SessionEvent::Incoming(live),
            &crate::config::KeyBindings::default(),
        );
        dispatcher.execute_all(commands, &mut model);
        assert_eq!(store.len(), 2);

        dispatcher.execute(Command::EnsureHistoryLoaded(conv("a@x")), &mut model);
        assert_eq!(bodies(&model, &conv("a@x")), vec!["before", "during"]);
    }

    #[test]
    fn history_window_limits_rows() {
        let store = Arc::new(MemoryStore::new());
        for minute in 0..5 {
            store
                .insert_message(&Message::new(
                    conv("a@x"),
                    "111",
                    format!("m{minute}"),
                    false,
                    at(minute),
                ))
                .unwrap();
        }
        let (client, _rx) = RecordingClient::new(false);
        let mut dispatcher = Dispatcher::new(
            client,
            Box::new(store),
            HistoryLimits {
                window: 2,
                recent_conversations: 20,
            },
        );
        let mut model = model(true);

        dispatcher.execute(Command::EnsureHistoryLoaded(conv("a@x")), &mut model);
        assert_eq!(bodies(&model, &conv("a@x")), vec!["m3", "m4"]);
    }

    // ===== Settings, names, disconnect =====

    #[test]
    fn load_settings_writes_default_back() {
        let store = Arc::new(MemoryStore::new());
        let (dispatcher, _client, _sent) = setup(store.clone(), false);

        assert!(dispatcher.load_settings().history_enabled);
        assert_eq!(
            store.get_setting(HISTORY_ENABLED_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn persist_setting_round_trips() {
        let store = Arc::new(MemoryStore::new());
        let (mut dispatcher, _client, _sent) = setup(store.clone(), false);
        let mut model = model(true);

        dispatcher.execute(
            Command::PersistSetting {
                history_enabled: false,
            },
            &mut model,
        );
        assert!(!dispatcher.load_settings().history_enabled);
    }

    #[test]
    fn resolve_caches_name() {
        let store = Arc::new(MemoryStore::new());
        let (mut dispatcher, _client, _sent) = setup(store, false);
        let mut model = model(true);
        model.insert_conversation(conv("42@x"));

        dispatcher.execute(Command::ResolveDisplayName(conv("42@x")), &mut model);
        assert_eq!(model.display_name(&conv("42@x")), "Name of 42");
    }

    #[test]
    fn disconnect_reaches_client() {
        let store = Arc::new(MemoryStore::new());
        let (mut dispatcher, client, _sent) = setup(store, false);
        let mut model = model(true);

        dispatcher.execute(Command::Disconnect, &mut model);
        assert_eq!(*client.disconnects.lock().unwrap(), 1);
    }

    // ===== Seed =====

    #[test]
    fn seed_lists_recent_and_loads_selection() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_message(&Message::new(conv("b@x"), "b", "from b", false, at(1)))
            .unwrap();
        store
            .insert_message(&Message::new(conv("a@x"), "a", "from a", false, at(2)))
            .unwrap();
        let (mut dispatcher, _client, _sent) = setup(store, false);
        let mut model = model(true);

        dispatcher.seed(&mut model);

        assert_eq!(model.conversations(), &[conv("a@x"), conv("b@x")]);
        assert_eq!(bodies(&model, &conv("a@x")), vec!["from a"]);
        assert!(model.lines(&conv("b@x")).is_empty());
        assert_eq!(model.display_name(&conv("b@x")), "Name of b");
    }

    #[test]
    fn seed_skipped_when_history_disabled() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_message(&Message::new(conv("a@x"), "a", "x", false, at(2)))
            .unwrap();
        let (mut dispatcher, _client, _sent) = setup(store, false);
        let mut model = model(false);

        dispatcher.seed(&mut model);
        assert!(model.conversations().is_empty());
    }
}

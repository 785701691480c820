//! Per-conversation line buffers and history-load bookkeeping.
//!
//! A buffer receives at most one history batch, prepended ahead of any live
//! lines already present. Live lines are appended in arrival order. Ordering
//! is merge/arrival order, not a global timestamp sort.

use crate::model::{ConversationId, DisplayLine, Message};
use std::collections::{HashMap, HashSet};

/// Rendered buffers plus the loaded and in-flight sets.
#[derive(Debug, Clone, Default)]
pub struct ConversationCache {
    buffers: HashMap<ConversationId, Vec<DisplayLine>>,
    loaded: HashSet<ConversationId>,
    in_flight: HashSet<ConversationId>,
}

impl ConversationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines of `id`, oldest first; empty when unknown.
    pub fn lines(&self, id: &ConversationId) -> &[DisplayLine] {
        self.buffers.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a buffer exists for `id`.
    pub fn contains(&self, id: &ConversationId) -> bool {
        self.buffers.contains_key(id)
    }

    /// Whether history has been merged into `id`'s buffer.
    pub fn is_loaded(&self, id: &ConversationId) -> bool {
        self.loaded.contains(id)
    }

    /// Whether a history load for `id` has begun but not finished.
    pub fn is_loading(&self, id: &ConversationId) -> bool {
        self.in_flight.contains(id)
    }

    /// Claim the history load for `id`.
    ///
    /// Returns `false` when history is already loaded or a load is in flight;
    /// the caller must then skip the query.
    pub fn begin_load(&mut self, id: &ConversationId) -> bool {
        if self.loaded.contains(id) || self.in_flight.contains(id) {
            return false;
        }
        self.in_flight.insert(id.clone());
        true
    }

    /// Prepend a history batch (oldest first) and mark `id` loaded.
    pub fn complete_load(&mut self, id: &ConversationId, history: &[Message]) {
        self.in_flight.remove(id);
        self.loaded.insert(id.clone());
        let rendered = history.iter().map(Message::to_display_line);
        let buffer = self.buffers.entry(id.clone()).or_default();
        buffer.splice(0..0, rendered);
    }

    /// Release the claim after a failed query; a later call may retry.
    pub fn fail_load(&mut self, id: &ConversationId) {
        self.in_flight.remove(id);
    }

    /// Render and append a live message. Returns `true` if its buffer was new.
    pub fn append_live(&mut self, message: &Message) -> bool {
        let created = !self.buffers.contains_key(message.conversation_id());
        self.buffers
            .entry(message.conversation_id().clone())
            .or_default()
            .push(message.to_display_line());
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn conv(raw: &str) -> ConversationId {
        ConversationId::new(raw).unwrap()
    }

    fn msg(chat: &str, body: &str, minute: u32) -> Message {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 10, minute, 0).unwrap();
        Message::new(conv(chat), "111", body, false, ts)
    }

    fn bodies(cache: &ConversationCache, id: &ConversationId) -> Vec<String> {
        cache.lines(id).iter().map(|l| l.body.clone()).collect()
    }

    #[test]
    fn unknown_conversation_has_no_lines() {
        let cache = ConversationCache::new();
        assert!(cache.lines(&conv("a@x")).is_empty());
        assert!(!cache.contains(&conv("a@x")));
    }

    #[test]
    fn history_is_prepended_before_live_lines() {
        let id = conv("a@x");
        let mut cache = ConversationCache::new();
        assert!(cache.append_live(&msg("a@x", "live", 5)));

        assert!(cache.begin_load(&id));
        cache.complete_load(&id, &[msg("a@x", "h1", 1), msg("a@x", "h2", 2)]);

        assert_eq!(bodies(&cache, &id), vec!["h1", "h2", "live"]);
        assert!(cache.is_loaded(&id));
    }

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let id = conv("a@x");
        let mut cache = ConversationCache::new();

        assert!(cache.begin_load(&id));
        assert!(cache.is_loading(&id));
        assert!(!cache.begin_load(&id));
    }

    #[test]
    fn begin_is_refused_after_load() {
        let id = conv("a@x");
        let mut cache = ConversationCache::new();
        cache.begin_load(&id);
        cache.complete_load(&id, &[]);

        assert!(!cache.begin_load(&id));
        assert!(!cache.is_loading(&id));
    }

    #[test]
    fn failed_load_allows_retry_and_keeps_buffer() {
        let id = conv("a@x");
        let mut cache = ConversationCache::new();
        cache.append_live(&msg("a@x", "live", 5));

        cache.begin_load(&id);
        cache.fail_load(&id);

        assert!(!cache.is_loaded(&id));
        assert!(!cache.is_loading(&id));
        assert_eq!(bodies(&cache, &id), vec!["live"]);
        assert!(cache.begin_load(&id));
    }

    #[test]
    fn append_live_reports_new_buffer_once() {
        let mut cache = ConversationCache::new();
        assert!(cache.append_live(&msg("a@x", "1", 1)));
        assert!(!cache.append_live(&msg("a@x", "2", 2)));
        assert_eq!(bodies(&cache, &conv("a@x")), vec!["1", "2"]);
    }
}

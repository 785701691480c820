//! In-memory history store.

use super::{HistoryStore, RecordId, StoreResult};
use crate::model::{ConversationId, Message, StoreError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// History store kept entirely in memory.
///
/// Same semantics as [`super::SqliteStore`]; used by tests and by sessions
/// that should leave nothing on disk. Can be switched into an unavailable
/// state to exercise failure handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<(RecordId, Message)>,
    settings: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable` (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    /// Whether no messages are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn available(&self, stage: &'static str) -> StoreResult<MutexGuard<'_, Inner>> {
        let inner = self.lock();
        if inner.unavailable {
            return Err(StoreError::Unavailable { stage });
        }
        Ok(inner)
    }
}

impl HistoryStore for MemoryStore {
    fn insert_message(&self, message: &Message) -> StoreResult<RecordId> {
        let mut inner = self.available("insert-message")?;
        let id = inner.rows.last().map_or(1, |(id, _)| id + 1);
        inner.rows.push((id, message.clone()));
        Ok(id)
    }

    fn recent_conversation_ids(&self, limit: usize) -> StoreResult<Vec<ConversationId>> {
        let inner = self.available("recent-conversations")?;
        let mut latest: HashMap<&ConversationId, (i64, RecordId)> = HashMap::new();
        for (id, message) in &inner.rows {
            let key = (message.timestamp().timestamp_millis(), *id);
            latest
                .entry(message.conversation_id())
                .and_modify(|seen| *seen = (*seen).max(key))
                .or_insert(key);
        }

        let mut ordered: Vec<_> = latest.into_iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(ordered
            .into_iter()
            .take(limit)
            .map(|(conversation, _)| conversation.clone())
            .collect())
    }

    fn messages(
        &self,
        conversation: &ConversationId,
        limit: usize,
        through: RecordId,
    ) -> StoreResult<Vec<Message>> {
        let inner = self.available("conversation-history")?;
        let mut matching: Vec<_> = inner
            .rows
            .iter()
            .filter(|(id, m)| *id <= through && m.conversation_id() == conversation)
            .collect();
        matching.sort_by_key(|(id, m)| (m.timestamp(), *id));

        let skip = matching.len().saturating_sub(limit);
        Ok(matching
            .into_iter()
            .skip(skip)
            .map(|(_, m)| m.clone())
            .collect())
    }

    fn last_record_id(&self) -> StoreResult<Option<RecordId>> {
        let inner = self.available("last-record-id")?;
        Ok(inner.rows.last().map(|(id, _)| *id))
    }

    fn get_setting(&self, key: &str) -> StoreResult<Option<String>> {
        let inner = self.available("get-setting")?;
        Ok(inner.settings.get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.available("set-setting")?;
        inner.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

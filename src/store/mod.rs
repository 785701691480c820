//! Message history persistence.
//!
//! The session core only needs insert, ordered-range query, and a tiny
//! key/value settings table. [`HistoryStore`] is that contract; [`SqliteStore`]
//! is the durable implementation and [`MemoryStore`] backs tests and
//! throwaway sessions.

use crate::model::{ConversationId, Message, StoreError};
use std::sync::Arc;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Auto-increment identifier of a stored message row.
pub type RecordId = i64;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract consumed by the Dispatcher.
///
/// Calls are synchronous and expected to be short (local disk).
pub trait HistoryStore: Send {
    /// Append a message, returning its record id.
    fn insert_message(&self, message: &Message) -> StoreResult<RecordId>;

    /// Up to `limit` distinct conversation ids, most recently active first.
    fn recent_conversation_ids(&self, limit: usize) -> StoreResult<Vec<ConversationId>>;

    /// The most recent `limit` messages of `conversation` whose record id is
    /// at most `through`, returned oldest to newest.
    fn messages(
        &self,
        conversation: &ConversationId,
        limit: usize,
        through: RecordId,
    ) -> StoreResult<Vec<Message>>;

    /// Highest record id currently stored, `None` when empty.
    fn last_record_id(&self) -> StoreResult<Option<RecordId>>;

    /// Read a named setting.
    fn get_setting(&self, key: &str) -> StoreResult<Option<String>>;

    /// Create or overwrite a named setting.
    fn set_setting(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<T: HistoryStore + Sync + ?Sized> HistoryStore for Arc<T> {
    fn insert_message(&self, message: &Message) -> StoreResult<RecordId> {
        (**self).insert_message(message)
    }

    fn recent_conversation_ids(&self, limit: usize) -> StoreResult<Vec<ConversationId>> {
        (**self).recent_conversation_ids(limit)
    }

    fn messages(
        &self,
        conversation: &ConversationId,
        limit: usize,
        through: RecordId,
    ) -> StoreResult<Vec<Message>> {
        (**self).messages(conversation, limit, through)
    }

    fn last_record_id(&self) -> StoreResult<Option<RecordId>> {
        (**self).last_record_id()
    }

    fn get_setting(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_setting(key)
    }

    fn set_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_setting(key, value)
    }
}

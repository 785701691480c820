//! SQLite-backed history store.

use super::{HistoryStore, RecordId, StoreResult};
use crate::model::{ConversationId, Message, StoreError};
use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cli_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chat_jid TEXT NOT NULL,
    sender TEXT NOT NULL,
    content TEXT NOT NULL,
    is_from_me INTEGER NOT NULL,
    timestamp INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS cli_messages_chat ON cli_messages (chat_jid, id);
CREATE TABLE IF NOT EXISTS cli_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

const BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// History store persisted in a SQLite database file.
///
/// Owns its connection exclusively; nothing else in the process touches the
/// database. Timestamps are stored as unix milliseconds.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and prepare the schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Directory` if the parent directory cannot be created,
    /// `StoreError::Open` if the file cannot be opened, and `StoreError::Query`
    /// if the schema cannot be applied.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::prepare(conn)?;
        debug!(path = %path.display(), "History store opened");
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|source| StoreError::Query {
                stage: "busy-timeout",
                source,
            })?;
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|source| StoreError::Query {
                stage: "journal-mode",
                source,
            })?;
        debug!(journal_mode = %mode, "SQLite journal mode set");
        conn.execute_batch(SCHEMA)
            .map_err(|source| StoreError::Query {
                stage: "create-schema",
                source,
            })?;
        Ok(Self { conn })
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String, bool, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

impl HistoryStore for SqliteStore {
    fn insert_message(&self, message: &Message) -> StoreResult<RecordId> {
        self.conn
            .execute(
                "INSERT INTO cli_messages (chat_jid, sender, content, is_from_me, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.conversation_id().as_str(),
                    message.sender(),
                    message.content(),
                    message.is_from_self(),
                    message.timestamp().timestamp_millis(),
                ],
            )
            .map_err(|source| StoreError::Query {
                stage: "insert-message",
                source,
            })?;
        Ok(self.conn.last_insert_rowid())
    }

    fn recent_conversation_ids(&self, limit: usize) -> StoreResult<Vec<ConversationId>> {
        let query_err = |source| StoreError::Query {
            stage: "recent-conversations",
            source,
        };
        let mut stmt = self
            .conn
            .prepare(
                "SELECT chat_jid FROM cli_messages
                 GROUP BY chat_jid
                 ORDER BY MAX(timestamp) DESC, MAX(id) DESC
                 LIMIT ?1",
            )
            .map_err(query_err)?;
        let rows = stmt
            .query_map(params![sql_limit(limit)], |row| row.get::<_, String>(0))
            .map_err(query_err)?;

        let mut ids = Vec::new();
        for raw in rows {
            let raw = raw.map_err(query_err)?;
            match ConversationId::new(raw.clone()) {
                Ok(id) => ids.push(id),
                Err(err) => warn!(chat_jid = %raw, error = %err, "Skipping stored conversation"),
            }
        }
        Ok(ids)
    }

    fn messages(
        &self,
        conversation: &ConversationId,
        limit: usize,
        through: RecordId,
    ) -> StoreResult<Vec<Message>> {
        let query_err = |source| StoreError::Query {
            stage: "conversation-history",
            source,
        };
        let mut stmt = self
            .conn
            .prepare(
                "SELECT chat_jid, sender, content, is_from_me, timestamp FROM (
                     SELECT id, chat_jid, sender, content, is_from_me, timestamp
                     FROM cli_messages
                     WHERE chat_jid = ?1 AND id <= ?2
                     ORDER BY timestamp DESC, id DESC
                     LIMIT ?3
                 ) ORDER BY timestamp ASC, id ASC",
            )
            .map_err(query_err)?;
        let rows = stmt
            .query_map(
                params![conversation.as_str(), through, sql_limit(limit)],
                message_from_row,
            )
            .map_err(query_err)?;

        let mut messages = Vec::new();
        for row in rows {
            let (_, sender, content, from_self, millis) = row.map_err(query_err)?;
            let timestamp =
                DateTime::from_timestamp_millis(millis).ok_or_else(|| StoreError::CorruptRow {
                    stage: "conversation-history",
                    details: format!("timestamp {millis} out of range"),
                })?;
            messages.push(Message::new(
                conversation.clone(),
                sender,
                content,
                from_self,
                timestamp,
            ));
        }
        Ok(messages)
    }

    fn last_record_id(&self) -> StoreResult<Option<RecordId>> {
        self.conn
            .query_row("SELECT MAX(id) FROM cli_messages", [], |row| {
                row.get::<_, Option<RecordId>>(0)
            })
            .map_err(|source| StoreError::Query {
                stage: "last-record-id",
                source,
            })
    }

    fn get_setting(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM cli_settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| StoreError::Query {
                stage: "get-setting",
                source,
            })
    }

    fn set_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO cli_settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|source| StoreError::Query {
                stage: "set-setting",
                source,
            })?;
        Ok(())
    }
}

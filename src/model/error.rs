//! Error types for the chatmux application.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned from startup and the session run
//!   - [`StoreError`] - History store failures (open, query, insert)
//!   - [`MessagingError`] - Messaging collaborator failures (connect, send, download)
//!   - [`ConfigError`] - Configuration file failures
//!   - [`LoggingError`] - Tracing subscriber initialization failures
//!   - [`TuiError`] - Terminal setup and rendering failures
//!
//! # Error Recovery Strategy
//!
//! Only startup failures are fatal. Once the session loop runs, store and
//! messaging failures are logged and swallowed: the in-memory session is the
//! source of truth for the current run and the store is best-effort durability.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::view::TuiError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// Every variant represents a failure that happens before the session loop
/// starts (or a terminal failure while it runs). Nothing here is raised for
/// transient persistence or delivery problems during the session.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// The history store could not be opened or prepared.
    ///
    /// **Recovery**: none; the process aborts before the session starts.
    #[error("History store error: {0}")]
    Store(#[from] StoreError),

    /// The messaging collaborator could not provide a session.
    ///
    /// **Recovery**: none; there is no session to recover into yet.
    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    /// Terminal or TUI rendering error.
    ///
    /// **Recovery**: the terminal is restored before this propagates to `main`.
    #[error("Terminal error: {0}")]
    Tui(#[from] TuiError),
}

/// Errors raised by a [`crate::store::HistoryStore`] implementation.
///
/// During the session these are transient: the Dispatcher logs them and
/// continues with an empty result or a skipped write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file (or its directory) could not be opened.
    #[error("Failed to open history store at {path}: {source}")]
    Open {
        /// Database path that failed to open.
        path: PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// The database directory could not be created.
    #[error("Failed to create history store directory {path}: {source}")]
    Directory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A statement failed.
    ///
    /// `stage` names the operation for log correlation (e.g. `"insert-message"`).
    #[error("History store query failed at {stage}: {source}")]
    Query {
        /// Operation that failed.
        stage: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// The store is not accepting requests.
    #[error("History store unavailable at {stage}")]
    Unavailable {
        /// Operation that was refused.
        stage: &'static str,
    },

    /// A stored row could not be converted into a domain value.
    #[error("Corrupt history row at {stage}: {details}")]
    CorruptRow {
        /// Operation that read the row.
        stage: &'static str,
        /// What was wrong with it.
        details: String,
    },
}

/// Errors raised by a [`crate::messaging::MessagingClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    /// Connecting to (or pairing with) the service failed.
    #[error("Failed to connect: {0}")]
    Connect(String),

    /// An outbound message could not be sent.
    ///
    /// Unobservable by the session core: sends are fire-and-forget and this
    /// only reaches the log.
    #[error("Failed to send to {conversation}: {reason}")]
    Send {
        /// Target conversation.
        conversation: String,
        /// Reason reported by the transport.
        reason: String,
    },

    /// A media attachment could not be downloaded.
    #[error("Failed to download media {message_id}: {reason}")]
    Download {
        /// Message the attachment belongs to.
        message_id: String,
        /// Reason reported by the transport.
        reason: String,
    },

    /// The operation is not supported by this client.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_into_app_error() {
        let err = StoreError::CorruptRow {
            stage: "recent-conversations",
            details: "empty chat_jid".to_string(),
        };
        let app: AppError = err.into();
        assert!(matches!(app, AppError::Store(_)));
    }

    #[test]
    fn messaging_error_message_names_conversation() {
        let err = MessagingError::Send {
            conversation: "111@s.whatsapp.net".to_string(),
            reason: "offline".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("111@s.whatsapp.net"));
        assert!(msg.contains("offline"));
    }

    #[test]
    fn store_query_error_names_stage() {
        let err = StoreError::Query {
            stage: "insert-message",
            source: rusqlite::Error::InvalidQuery,
        };
        assert!(err.to_string().contains("insert-message"));
    }
}

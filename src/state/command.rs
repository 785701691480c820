//! Side effects requested by the session transition function.

use crate::model::{ConversationId, Message};

/// Effect the Dispatcher performs on behalf of the session model.
///
/// The transition function never performs I/O; it only returns these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Echo locally, then send `text` to `conversation` without waiting.
    SendMessage {
        /// Target conversation.
        conversation: ConversationId,
        /// Message body.
        text: String,
    },
    /// Append an incoming message to the history store.
    PersistMessage(Message),
    /// Store the history flag.
    PersistSetting {
        /// New value of the flag.
        history_enabled: bool,
    },
    /// Merge stored history into the conversation buffer unless already done.
    EnsureHistoryLoaded(ConversationId),
    /// Look up and cache the display name of a conversation.
    ResolveDisplayName(ConversationId),
    /// Disconnect from the messaging service.
    Disconnect,
}

//! Messaging collaborator contract.
//!
//! The wire protocol (pairing, encryption, delivery) lives behind
//! [`MessagingClient`]. The session core only connects, sends text, resolves
//! names, downloads media, and subscribes to [`NetworkEvent`]s.

use crate::model::{ConversationId, MediaKind, MessagingError};
use chrono::{DateTime, Utc};

pub mod offline;

pub use offline::OfflineClient;

/// Callback invoked by the client for every network event.
///
/// Runs on the client's own callback thread(s); must not block on the
/// session loop.
pub type NetworkHandler = Box<dyn Fn(NetworkEvent) + Send + Sync>;

/// Capabilities consumed from the messaging service.
pub trait MessagingClient: Send + Sync {
    /// Establish the session with the service.
    fn connect(&self) -> Result<(), MessagingError>;

    /// Tear the session down.
    fn disconnect(&self) -> Result<(), MessagingError>;

    /// Send a text message. May block on network I/O.
    fn send_text(&self, to: &ConversationId, text: &str) -> Result<(), MessagingError>;

    /// Group name or contact name for `id`.
    ///
    /// Implementations fall back to `id.local_part()` when nothing better is known.
    fn resolve_display_name(&self, id: &ConversationId) -> String;

    /// Fetch the bytes of a media attachment.
    fn download_media(&self, media: &MediaHandle) -> Result<Vec<u8>, MessagingError>;

    /// Register a handler for incoming network events.
    fn subscribe(&self, handler: NetworkHandler);
}

/// Event delivered by the messaging service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// A message arrived (or was sent from another device of this account).
    Message(IncomingMessage),
    /// Someone is calling.
    CallOffer {
        /// Identifier of the caller.
        caller: ConversationId,
        /// When the offer was made.
        timestamp: DateTime<Utc>,
    },
}

/// Message as reported by the service, before media is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Service-unique message identifier; names saved media files.
    pub message_id: String,
    /// Conversation the message belongs to.
    pub chat: ConversationId,
    /// Author of the message.
    pub sender: ConversationId,
    /// Name the sender advertises, if any.
    pub push_name: Option<String>,
    /// Body.
    pub content: IncomingContent,
    /// Authored by this account.
    pub from_self: bool,
    /// Server timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Body of an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingContent {
    /// Plain or extended text.
    Text(String),
    /// Downloadable attachment.
    Media(MediaHandle),
    /// Anything the session core does not render (stickers, reactions, ...).
    Unsupported,
}

/// Reference to a downloadable attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    /// Message carrying the attachment.
    pub message_id: String,
    /// Attachment kind; decides label and file extension.
    pub kind: MediaKind,
    /// Transport-specific locator, opaque to the core.
    pub locator: String,
}

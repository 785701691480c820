//! Network producer: turns messaging-service events into session messages.
//!
//! Runs on the messaging client's callback thread. Media is downloaded and
//! written to disk here, so the session loop only ever sees final content.

use super::{EventSender, SessionEvent};
use crate::messaging::{
    IncomingContent, IncomingMessage, MediaHandle, MessagingClient, NetworkEvent,
};
use crate::model::{ConversationId, Message, INCOMING_CALL_CONTENT, SYSTEM_SENDER};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Content used for messages whose body cannot be rendered.
pub const UNSUPPORTED_CONTENT: &str = "[Media/Other]";

/// Where downloaded media is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDownloads {
    dir: PathBuf,
}

impl MediaDownloads {
    /// Save media under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Download `media`, write it to `<dir>/<message_id><ext>`, and return the
    /// placeholder content describing the result.
    ///
    /// Failures produce an `[Error <label>]` placeholder and are logged.
    pub fn materialize(&self, client: &dyn MessagingClient, media: &MediaHandle) -> String {
        let label = media.kind.label();
        let data = match client.download_media(media) {
            Ok(data) => data,
            Err(e) => {
                warn!(message_id = %media.message_id, error = %e, "Media download failed");
                return format!("[Error {label}]");
            }
        };

        let path = self.dir.join(file_name(media));
        if let Err(e) = fs::create_dir_all(&self.dir).and_then(|()| fs::write(&path, data)) {
            warn!(path = %path.display(), error = %e, "Failed to save media");
            return format!("[Error {label}]");
        }
        format!("[Saved {label}: {}]", path.display())
    }
}

/// `<message_id><ext>` with path separators neutralized.
fn file_name(media: &MediaHandle) -> String {
    let stem: String = media
        .message_id
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{stem}{}", media.kind.extension())
}

/// Converts [`NetworkEvent`]s and submits them to the session loop.
///
/// Holds only a weak reference to the client: once the session drops its
/// client handle, pending callbacks become no-ops.
pub struct NetworkProducer {
    client: Weak<dyn MessagingClient>,
    sender: EventSender,
    downloads: MediaDownloads,
}

impl NetworkProducer {
    /// Create a producer for `client`.
    pub fn new(
        client: &Arc<dyn MessagingClient>,
        sender: EventSender,
        downloads: MediaDownloads,
    ) -> Self {
        Self {
            client: Arc::downgrade(client),
            sender,
            downloads,
        }
    }

    /// Subscribe this producer to `client`'s events.
    pub fn register(self, client: &Arc<dyn MessagingClient>) {
        client.subscribe(Box::new(move |event| self.handle(event)));
    }

    /// Convert and submit one event.
    pub fn handle(&self, event: NetworkEvent) {
        if let Some(message) = self.convert(event) {
            self.sender.submit(SessionEvent::Incoming(message));
        }
    }

    /// Convert one event into a session message.
    ///
    /// Returns `None` when the client is already gone or the event cannot be
    /// attributed to a conversation.
    pub fn convert(&self, event: NetworkEvent) -> Option<Message> {
        match event {
            NetworkEvent::CallOffer { caller, timestamp } => {
                match ConversationId::for_user(caller.local_part()) {
                    Ok(conversation) => Some(Message::new(
                        conversation,
                        SYSTEM_SENDER,
                        INCOMING_CALL_CONTENT,
                        false,
                        timestamp,
                    )),
                    Err(e) => {
                        warn!(caller = %caller, error = %e, "Call offer without caller");
                        None
                    }
                }
            }
            NetworkEvent::Message(incoming) => {
                let Some(client) = self.client.upgrade() else {
                    debug!(message_id = %incoming.message_id, "Client gone, dropping message");
                    return None;
                };
                Some(self.convert_message(client.as_ref(), incoming))
            }
        }
    }

    fn convert_message(&self, client: &dyn MessagingClient, incoming: IncomingMessage) -> Message {
        let sender = match incoming.push_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                let resolved = client.resolve_display_name(&incoming.sender);
                if resolved.trim().is_empty() {
                    incoming.sender.local_part().to_string()
                } else {
                    resolved
                }
            }
        };

        let content = match incoming.content {
            IncomingContent::Text(text) => text,
            IncomingContent::Media(media) => self.downloads.materialize(client, &media),
            IncomingContent::Unsupported => UNSUPPORTED_CONTENT.to_string(),
        };

        Message::new(
            incoming.chat,
            sender,
            content,
            incoming.from_self,
            incoming.timestamp,
        )
    }
}

//! Messaging client used when no transport is configured.

use super::{MediaHandle, MessagingClient, NetworkHandler};
use crate::model::{ConversationId, MessagingError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Client that never reaches a network.
///
/// Sends are accepted and logged, names resolve to the identifier's local
/// part, media downloads fail, and no events are ever emitted. Lets the
/// session browse and extend local history without a protocol engine.
#[derive(Default)]
pub struct OfflineClient {
    connected: AtomicBool,
    handlers: Mutex<Vec<NetworkHandler>>,
}

impl OfflineClient {
    /// Create a disconnected client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `connect` has been called without a later `disconnect`.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Number of registered event handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for OfflineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineClient")
            .field("connected", &self.is_connected())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl MessagingClient for OfflineClient {
    fn connect(&self) -> Result<(), MessagingError> {
        self.connected.store(true, Ordering::SeqCst);
        info!("Offline messaging client connected; no events will arrive");
        Ok(())
    }

    fn disconnect(&self) -> Result<(), MessagingError> {
        self.connected.store(false, Ordering::SeqCst);
        info!("Offline messaging client disconnected");
        Ok(())
    }

    fn send_text(&self, to: &ConversationId, text: &str) -> Result<(), MessagingError> {
        info!(conversation = %to, chars = text.chars().count(), "Offline send accepted");
        Ok(())
    }

    fn resolve_display_name(&self, id: &ConversationId) -> String {
        id.local_part().to_string()
    }

    fn download_media(&self, media: &MediaHandle) -> Result<Vec<u8>, MessagingError> {
        Err(MessagingError::Download {
            message_id: media.message_id.clone(),
            reason: "offline client has no transport".to_string(),
        })
    }

    fn subscribe(&self, handler: NetworkHandler) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }
}

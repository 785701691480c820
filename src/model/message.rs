//! Chat messages and their rendered display lines.

use crate::model::ConversationId;
use chrono::{DateTime, Local, Utc};
use std::fmt;

/// Sender label shown for messages authored on this device.
pub const SELF_LABEL: &str = "Me";

/// Sender used for synthetic system messages such as call notifications.
pub const SYSTEM_SENDER: &str = "SYSTEM";

/// Content of the synthetic message produced for an incoming call offer.
pub const INCOMING_CALL_CONTENT: &str = "📞 INCOMING CALL!";

/// Substrings that mark a body as a saved-media or call notice.
const MARKER_PATTERNS: [&str; 2] = ["[Saved", "CALL"];

/// A chat message, immutable once created.
///
/// Content is either the text body or a placeholder describing downloaded
/// media or a call event (see [`crate::source::network`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    conversation_id: ConversationId,
    sender: String,
    content: String,
    from_self: bool,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message.
    pub fn new(
        conversation_id: ConversationId,
        sender: impl Into<String>,
        content: impl Into<String>,
        from_self: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            conversation_id,
            sender: sender.into(),
            content: content.into(),
            from_self,
            timestamp,
        }
    }

    /// Message authored on this device, as produced by the optimistic echo.
    pub fn outgoing(
        conversation_id: ConversationId,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(conversation_id, SELF_LABEL, content, true, timestamp)
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_from_self(&self) -> bool {
        self.from_self
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Render into the line shown in a conversation buffer.
    pub fn to_display_line(&self) -> DisplayLine {
        let sender = if self.from_self {
            SELF_LABEL.to_string()
        } else {
            self.sender.clone()
        };
        DisplayLine {
            clock: format_clock(self.timestamp),
            sender,
            body: self.content.clone(),
            from_self: self.from_self,
            marker: is_marker(&self.content),
        }
    }
}

/// Whether a message body denotes a saved-media or call notice.
pub fn is_marker(content: &str) -> bool {
    MARKER_PATTERNS.iter().any(|pattern| content.contains(pattern))
}

/// Format a timestamp as local wall-clock `HH:MM`.
pub fn format_clock(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// One rendered line of a conversation buffer.
///
/// Styling is decided by the view from `from_self` and `marker`; the plain
/// text form (`Display`) is `[HH:MM] sender: body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Local `HH:MM` clock text.
    pub clock: String,
    /// Sender label, `"Me"` for self-authored lines.
    pub sender: String,
    /// Message body or media/call placeholder.
    pub body: String,
    /// Authored on this device.
    pub from_self: bool,
    /// Body is a saved-media or call marker.
    pub marker: bool,
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.clock, self.sender, self.body)
    }
}

/// Kind of downloadable media attached to an incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Still image, saved as `.jpg`.
    Image,
    /// Video clip, saved as `.mp4`.
    Video,
    /// Arbitrary document, saved without an extension.
    Document,
}

impl MediaKind {
    /// File extension (including the dot) used when saving this kind.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Image => ".jpg",
            MediaKind::Video => ".mp4",
            MediaKind::Document => "",
        }
    }

    /// Short label used in placeholders.
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
            MediaKind::Document => "Doc",
        }
    }
}

// ===== Tests =====

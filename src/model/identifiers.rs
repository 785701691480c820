//! Core identifier newtypes with smart constructors.
//!
//! Identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use std::fmt;

/// Server part used by group conversations (`<id>@g.us`).
pub const GROUP_SERVER: &str = "g.us";

/// Server part used by one-to-one conversations (`<user>@s.whatsapp.net`).
pub const USER_SERVER: &str = "s.whatsapp.net";

/// Stable identifier of a one-to-one or group conversation.
///
/// Opaque to the session core apart from the `local@server` split used for
/// display-name fallback and group detection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    /// Smart constructor: validates non-empty identifier
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidConversationId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidConversationId::Empty);
        }
        Ok(Self(raw))
    }

    /// Identifier for a user's one-to-one conversation, e.g. `111@s.whatsapp.net`.
    pub fn for_user(user: &str) -> Result<Self, InvalidConversationId> {
        if user.trim().is_empty() {
            return Err(InvalidConversationId::Empty);
        }
        Ok(Self(format!("{user}@{USER_SERVER}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `@`, or the whole identifier when there is none.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }

    /// Text after the first `@`, if any.
    pub fn server(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, server)| server)
    }

    /// Whether this identifies a group conversation.
    pub fn is_group(&self) -> bool {
        self.server() == Some(GROUP_SERVER)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== Error Types =====

/// Rejected conversation identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidConversationId {
    /// Identifier was empty or whitespace only.
    #[error("Conversation ID cannot be empty")]
    Empty,
}

// ===== Tests =====

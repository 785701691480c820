//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod message;
pub mod settings;

// Re-export for convenience
pub use error::{AppError, MessagingError, StoreError};
pub use identifiers::{ConversationId, InvalidConversationId};
pub use key_action::KeyAction;
pub use message::{
    DisplayLine, MediaKind, Message, INCOMING_CALL_CONTENT, SELF_LABEL, SYSTEM_SENDER,
};
pub use settings::{ContactOrder, Settings, HISTORY_ENABLED_KEY};

//! Session state machine (pure).
//!
//! All state transitions are pure functions testable without a terminal or
//! a network; effects are returned as [`Command`]s.

pub mod command;
pub mod conversation_cache;
pub mod session;
pub mod text_input;

// Re-export for convenience
pub use command::Command;
pub use conversation_cache::ConversationCache;
pub use session::SessionModel;
pub use text_input::{InputWindow, TextInput};

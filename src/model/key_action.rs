//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
/// Keys without an action are handed to text entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Disconnect and end the session. Default: Ctrl+c/Esc
    Quit,
    /// Flip whether messages are persisted and history is loaded. Default: Ctrl+h/F2
    ToggleHistory,
    /// Select the conversation above the cursor. Default: ↑
    SelectPrevious,
    /// Select the conversation below the cursor. Default: ↓
    SelectNext,
    /// Send the text-entry buffer to the selected conversation. Default: Enter
    Send,
}

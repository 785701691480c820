//! Layout dimension constants for TUI rendering.
//!
//! Centralized location for all layout-related numeric values so the
//! projector and the painter agree on the geometry.

/// Outer width of the contact sidebar in columns, border included.
pub const SIDEBAR_WIDTH: u16 = 32;

/// Columns of the full width not available to the text-entry line.
///
/// Sidebar plus the input pane's two border columns.
pub const INPUT_WIDTH_RESERVED: u16 = 34;

/// Height of the input pane in lines (border + content).
pub const INPUT_PANE_HEIGHT: u16 = 3;

/// Rows of the full height not available to chat lines.
///
/// Input pane plus the chat pane's top and bottom border.
pub const CHAT_HEIGHT_RESERVED: u16 = 5;

/// Contact names longer than this are elided in the sidebar.
pub const NAME_MAX_CHARS: usize = 18;

/// Characters of an elided name kept before the ellipsis.
pub const NAME_KEEP_CHARS: usize = 15;

/// Size assumed before the first resize event arrives.
pub const DEFAULT_VIEWPORT: (u16, u16) = (80, 24);

//! Core view-state types.

use crate::view::constants::{CHAT_HEIGHT_RESERVED, DEFAULT_VIEWPORT, INPUT_WIDTH_RESERVED};

/// Viewport dimensions in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in terminal columns.
    pub width: u16,
    /// Height in terminal rows.
    pub height: u16,
}

impl Viewport {
    /// Create new viewport dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Columns available to the text-entry line.
    pub fn input_width(&self) -> u16 {
        self.width.saturating_sub(INPUT_WIDTH_RESERVED)
    }

    /// Chat lines that fit in the conversation pane.
    pub fn chat_capacity(&self) -> usize {
        usize::from(self.height.saturating_sub(CHAT_HEIGHT_RESERVED))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1)
    }
}

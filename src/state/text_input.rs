//! Single-line text entry (pure state transitions).
//!
//! Works on `char`s, not bytes, so the caret can never land inside a UTF-8
//! sequence.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editable single-line buffer with a caret and a length limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    chars: Vec<char>,
    caret: usize,
    limit: usize,
}

/// Visible slice of a [`TextInput`] for a given width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputWindow {
    /// Characters that fit the width.
    pub text: String,
    /// Caret column relative to the start of `text`.
    pub caret_column: usize,
}

impl TextInput {
    /// Empty buffer accepting at most `limit` characters.
    pub fn new(limit: usize) -> Self {
        Self {
            chars: Vec::new(),
            caret: 0,
            limit,
        }
    }

    /// Current contents.
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Caret position in characters, `0..=len()`.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Empty the buffer and return what it held.
    pub fn take(&mut self) -> String {
        let value = self.value();
        self.chars.clear();
        self.caret = 0;
        value
    }

    /// Apply an editing key. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.home(),
            KeyCode::Char('e') if ctrl => self.end(),
            KeyCode::Char('u') if ctrl => self.delete_to_start(),
            KeyCode::Char('k') if ctrl => self.delete_to_end(),
            KeyCode::Char('w') if ctrl => self.delete_word_before(),
            KeyCode::Char(c) if is_plain(key.modifiers) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }

    /// Insert at the caret unless the buffer is full.
    pub fn insert(&mut self, c: char) {
        if self.chars.len() >= self.limit || c.is_control() {
            return;
        }
        self.chars.insert(self.caret, c);
        self.caret += 1;
    }

    pub fn backspace(&mut self) {
        if self.caret > 0 {
            self.caret -= 1;
            self.chars.remove(self.caret);
        }
    }

    pub fn delete(&mut self) {
        if self.caret < self.chars.len() {
            self.chars.remove(self.caret);
        }
    }

    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.caret = (self.caret + 1).min(self.chars.len());
    }

    pub fn home(&mut self) {
        self.caret = 0;
    }

    pub fn end(&mut self) {
        self.caret = self.chars.len();
    }

    /// Ctrl+U: drop everything before the caret.
    pub fn delete_to_start(&mut self) {
        self.chars.drain(..self.caret);
        self.caret = 0;
    }

    /// Ctrl+K: drop everything from the caret on.
    pub fn delete_to_end(&mut self) {
        self.chars.truncate(self.caret);
    }

    /// Ctrl+W: drop the word before the caret and the whitespace after it.
    pub fn delete_word_before(&mut self) {
        let mut start = self.caret;
        while start > 0 && self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        self.chars.drain(start..self.caret);
        self.caret = start;
    }

    /// The part of the buffer that fits in `width` columns with the caret visible.
    ///
    /// One column is reserved for the caret when it sits at the end.
    pub fn window(&self, width: usize) -> InputWindow {
        if width == 0 {
            return InputWindow {
                text: String::new(),
                caret_column: 0,
            };
        }
        let offset = (self.caret + 1).saturating_sub(width);
        let end = (offset + width).min(self.chars.len());
        InputWindow {
            text: self.chars[offset..end].iter().collect(),
            caret_column: self.caret - offset,
        }
    }
}

fn is_plain(modifiers: KeyModifiers) -> bool {
    (modifiers - KeyModifiers::SHIFT).is_empty()
}

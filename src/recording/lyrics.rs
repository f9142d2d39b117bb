// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Lyric text for newly recorded notes.
//!
//! Button recording attaches one word to each note it creates. The words
//! come from a lyrics buffer with a cursor that the user can also move by
//! clicking into the lyrics text field.

/// Default character marking syllable boundaries inside a word
pub const DEFAULT_SYLLABLE_SEPARATOR: char = ';';

/// Supplies the text for each newly created note
pub trait TextSupplier {
    /// Next word, or an empty string when nothing is left
    fn take_next_word(&mut self) -> String;
}

/// Supplier for recordings that carry no lyrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoText;

impl TextSupplier for NoText {
    fn take_next_word(&mut self) -> String {
        String::new()
    }
}

/// Hands out successive words from a lyrics buffer
#[derive(Debug, Clone)]
pub struct LyricsDispenser {
    text: String,
    /// Byte offset of the next word, always on a char boundary
    cursor: usize,
    separator: char,
}

impl LyricsDispenser {
    /// Create a dispenser positioned at the start of the text
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_separator(text, DEFAULT_SYLLABLE_SEPARATOR)
    }

    /// Create a dispenser with a custom syllable separator
    pub fn with_separator(text: impl Into<String>, separator: char) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            separator,
        }
    }

    /// Get the lyrics text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the lyrics text, keeping the cursor where it still fits
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.set_cursor(self.cursor);
    }

    /// Get the cursor (byte offset)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor
    ///
    /// Clamped to the text and snapped back to a char boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.text.len());
        while !self.text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    /// Follow the caret of the lyrics text field
    ///
    /// While the field has focus the user is typing, so the caret is not
    /// a reading position and is ignored.
    pub fn sync_with_caret(&mut self, caret: usize, field_has_focus: bool) {
        if !field_has_focus {
            self.set_cursor(caret);
        }
    }

    /// Text not yet handed out
    pub fn remaining(&self) -> &str {
        &self.text[self.cursor..]
    }

    /// Check if every word was handed out
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.text.len()
    }
}

impl TextSupplier for LyricsDispenser {
    fn take_next_word(&mut self) -> String {
        if self.is_exhausted() {
            return String::new();
        }

        let rest = &self.text[self.cursor..];
        match rest.find(|c: char| c == ' ' || c == '\n') {
            Some(offset) => {
                let word = strip_word(&rest[..offset], self.separator);
                self.cursor += offset + 1;
                word
            }
            None => {
                let word = strip_word(rest, self.separator);
                self.cursor = self.text.len();
                word
            }
        }
    }
}

fn strip_word(word: &str, separator: char) -> String {
    word.chars()
        .filter(|&c| c != ' ' && c != '\n' && c != '\r' && c != separator)
        .collect()
}

//! Single-line text inputs for the waitlist form.

use unicode_segmentation::UnicodeSegmentation;

/// The two text inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
}

impl Field {
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "your name",
            Self::Email => "your email",
        }
    }
}

/// One editing keystroke applied to a focused input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    /// Pasted text; newlines are dropped since inputs are single-line.
    Paste(String),
    Backspace,
    Delete,
    DeleteWordBackwards,
    Left,
    Right,
    Home,
    End,
}

/// Handles text editing with proper Unicode grapheme cluster support.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DraftInput {
    text: String,
    cursor: usize,
}

impl DraftInput {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in graphemes.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when the trimmed text is non-empty, which is the only validation the
    /// form applies.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn apply(&mut self, op: &EditOp) {
        match op {
            EditOp::Insert(c) => self.enter_char(*c),
            EditOp::Paste(text) => self.enter_text(text),
            EditOp::Backspace => self.delete_char(),
            EditOp::Delete => self.delete_char_forward(),
            EditOp::DeleteWordBackwards => self.delete_word_backwards(),
            EditOp::Left => self.cursor = self.cursor.saturating_sub(1),
            EditOp::Right => self.cursor = self.clamp_cursor(self.cursor.saturating_add(1)),
            EditOp::Home => self.cursor = 0,
            EditOp::End => self.cursor = self.grapheme_count(),
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn enter_char(&mut self, new_char: char) {
        if new_char == '\n' || new_char == '\r' {
            return;
        }
        let index = self.byte_index_at(self.cursor);
        self.text.insert(index, new_char);
        self.cursor = self.cursor_after_byte(index + new_char.len_utf8());
    }

    fn enter_text(&mut self, text: &str) {
        let single_line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        if single_line.is_empty() {
            return;
        }
        let index = self.byte_index_at(self.cursor);
        self.text.insert_str(index, &single_line);
        self.cursor = self.cursor_after_byte(index + single_line.len());
    }

    /// Grapheme position just past the byte offset `end`. Inserted combining marks
    /// join the grapheme before them, so the count is taken over the whole text.
    fn cursor_after_byte(&self, end: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .take_while(|(start, _)| *start < end)
            .count()
    }

    fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let start = self.byte_index_at(self.cursor - 1);
        let end = self.byte_index_at(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    fn delete_char_forward(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }

        let start = self.byte_index_at(self.cursor);
        let end = self.byte_index_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    fn delete_word_backwards(&mut self) {
        while self.cursor > 0 && self.grapheme_is_whitespace(self.cursor - 1) {
            self.delete_char();
        }
        while self.cursor > 0 && !self.grapheme_is_whitespace(self.cursor - 1) {
            self.delete_char();
        }
    }

    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn grapheme_is_whitespace(&self, index: usize) -> bool {
        self.text
            .graphemes(true)
            .nth(index)
            .is_some_and(|grapheme| grapheme.chars().all(char::is_whitespace))
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.min(self.grapheme_count())
    }
}

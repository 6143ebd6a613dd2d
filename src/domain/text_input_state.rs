//! Editable single-line text field used by the dialog forms.

/// Default cap for free-text fields.
const DEFAULT_MAX_LENGTH: usize = 2000;

/// Text plus a character-indexed cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputState {
    text: String,
    /// Cursor position (character index, not byte).
    cursor_position: usize,
    max_length: usize,
}

impl Default for TextInputState {
    fn default() -> Self {
        Self::with_max_length(DEFAULT_MAX_LENGTH)
    }
}

impl TextInputState {
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            text: String::new(),
            cursor_position: 0,
            max_length,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor.
    /// Returns false if the field is already at its maximum length.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.char_count() >= self.max_length {
            return false;
        }
        let byte_idx = self.char_to_byte_index(self.cursor_position);
        self.text.insert(byte_idx, ch);
        self.cursor_position += 1;
        true
    }

    /// Backspace.
    pub fn delete_char_before(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor_position);
            let next_byte_idx = self.char_to_byte_index(self.cursor_position + 1);
            self.text.drain(byte_idx..next_byte_idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    /// Replaces the whole text and puts the cursor at the end. Pasted or
    /// scripted values are stored as given; check `exceeds_max_length`.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.cursor_position = self.char_count();
    }

    pub fn exceeds_max_length(&self) -> bool {
        self.char_count() > self.max_length
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_position = 0;
    }

    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}

//! Editable text buffer shared by the chat input and the ingest textarea.

/// Upper bound on buffer length, in characters.
const MAX_INPUT_LENGTH: usize = 100_000;

/// Text buffer with a character-indexed cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInputState {
    /// The current text.
    text: String,
    /// Cursor position (character index, not byte).
    cursor_position: usize,
}

impl TextInputState {
    /// Returns the current text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Returns the cursor position (character index).
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Returns true if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Inserts a character at the current cursor position.
    /// Returns false if the input would exceed the maximum length.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.text.chars().count() >= MAX_INPUT_LENGTH {
            return false;
        }
        let byte_idx = self.char_to_byte_index(self.cursor_position);
        self.text.insert(byte_idx, ch);
        self.cursor_position += 1;
        true
    }

    /// Inserts pasted text, stopping at the length limit.
    ///
    /// `\r\n` and lone `\r` are normalized to `\n`; when `multiline` is
    /// false line breaks become spaces.
    pub fn insert_str(&mut self, pasted: &str, multiline: bool) {
        let normalized = pasted.replace("\r\n", "\n").replace('\r', "\n");
        let remaining = MAX_INPUT_LENGTH.saturating_sub(self.text.chars().count());

        let chunk: String = normalized
            .chars()
            .map(|ch| if ch == '\n' && !multiline { ' ' } else { ch })
            .take(remaining)
            .collect();

        let byte_idx = self.char_to_byte_index(self.cursor_position);
        self.text.insert_str(byte_idx, &chunk);
        self.cursor_position += chunk.chars().count();
    }

    /// Deletes the character before the cursor (backspace).
    pub fn delete_char_before(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor_position);
            let next_byte_idx = self.char_to_byte_index(self.cursor_position + 1);
            self.text.drain(byte_idx..next_byte_idx);
        }
    }

    /// Deletes the character at the cursor position (delete key).
    pub fn delete_char_at(&mut self) {
        let char_count = self.text.chars().count();
        if self.cursor_position < char_count {
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
        let char_count = self.text.chars().count();
        if self.cursor_position < char_count {
            self.cursor_position += 1;
        }
    }

    /// Moves the cursor to the beginning of the current line.
    pub fn move_cursor_home(&mut self) {
        let (line, _) = self.cursor_line_and_column();
        self.cursor_position = self.line_start(line);
    }

    /// Moves the cursor to the end of the current line.
    pub fn move_cursor_end(&mut self) {
        let (line, _) = self.cursor_line_and_column();
        let line_len = self.text.split('\n').nth(line).map_or(0, |l| l.chars().count());
        self.cursor_position = self.line_start(line) + line_len;
    }

    /// Clears all text and resets cursor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_position = 0;
    }

    /// Returns the zero-based (line, column) of the cursor, in characters.
    pub fn cursor_line_and_column(&self) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;

        for ch in self.text.chars().take(self.cursor_position) {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }

        (line, column)
    }

    fn line_start(&self, line: usize) -> usize {
        self.text
            .split('\n')
            .take(line)
            .map(|l| l.chars().count() + 1)
            .sum()
    }

    /// Converts character index to byte index.
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Closed,
    Open,
}

/// Draft buffer behind the "Write a Note" modal.
///
/// The draft only exists while the editor is open; closing it, whether by
/// cancel or by a successful save, always leaves an empty draft behind.
#[derive(Debug, Clone, Default)]
pub struct DraftEditor {
    mode: EditorMode,
    text: String,
    cursor: usize,
    preferred_column: Option<usize>,
}

impl DraftEditor {
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode == EditorMode::Open
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_save(&self) -> bool {
        self.is_open() && !self.text.trim().is_empty()
    }

    /// Opens the editor with an empty draft. Already open editors keep theirs.
    pub fn open(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        self.reset();
        self.mode = EditorMode::Open;
        true
    }

    pub fn cancel(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.reset();
        self.mode = EditorMode::Closed;
        true
    }

    /// Hands out the draft and closes the editor, but only when the draft has
    /// something other than whitespace in it.
    pub fn take_committable(&mut self) -> Option<String> {
        if !self.can_save() {
            return None;
        }
        let text = std::mem::take(&mut self.text);
        self.reset();
        self.mode = EditorMode::Closed;
        Some(text)
    }

    /// Replaces the draft verbatim, whitespace-only values included.
    pub fn update(&mut self, text: &str) -> bool {
        if !self.is_open() {
            return false;
        }
        self.text = text.to_string();
        self.cursor = self.text.len();
        self.preferred_column = None;
        true
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if !self.is_open() {
            return false;
        }
        let mut scratch = [0u8; 4];
        let encoded = ch.encode_utf8(&mut scratch);
        self.text.insert_str(self.cursor, encoded);
        self.cursor += encoded.len();
        self.preferred_column = None;
        true
    }

    pub fn insert_str(&mut self, chunk: &str) -> bool {
        if !self.is_open() || chunk.is_empty() {
            return false;
        }
        let normalized = chunk.replace("\r\n", "\n").replace('\r', "\n");
        self.text.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
        self.preferred_column = None;
        true
    }

    pub fn insert_newline(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.text.insert(self.cursor, '\n');
        self.cursor += 1;
        self.preferred_column = Some(0);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if !self.is_open() || self.cursor == 0 {
            return false;
        }
        let prev = prev_grapheme_boundary(&self.text, self.cursor);
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        self.preferred_column = None;
        true
    }

    pub fn delete(&mut self) -> bool {
        if !self.is_open() || self.cursor >= self.text.len() {
            return false;
        }
        let next = next_grapheme_boundary(&self.text, self.cursor);
        if next == self.cursor {
            return false;
        }
        self.text.drain(self.cursor..next);
        self.preferred_column = None;
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = prev_grapheme_boundary(&self.text, self.cursor);
        self.preferred_column = None;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        let next = next_grapheme_boundary(&self.text, self.cursor);
        if next == self.cursor {
            return false;
        }
        self.cursor = next;
        self.preferred_column = None;
        true
    }

    pub fn move_home(&mut self) -> bool {
        let start = line_start(&self.text, self.cursor);
        if self.cursor == start {
            return false;
        }
        self.cursor = start;
        self.preferred_column = Some(0);
        true
    }

    pub fn move_end(&mut self) -> bool {
        let end = line_end(&self.text, self.cursor);
        if self.cursor == end {
            return false;
        }
        self.cursor = end;
        self.preferred_column = Some(column_at(
            &self.text,
            line_start(&self.text, self.cursor),
            self.cursor,
        ));
        true
    }

    pub fn move_up(&mut self) -> bool {
        let current_line_start = line_start(&self.text, self.cursor);
        let column = self
            .preferred_column
            .unwrap_or_else(|| column_at(&self.text, current_line_start, self.cursor));
        if current_line_start == 0 {
            if self.cursor == 0 {
                return false;
            }
            self.cursor = 0;
            self.preferred_column = Some(column);
            return true;
        }
        let prev_line_start = line_start(&self.text, current_line_start - 1);
        self.cursor = position_for_column(&self.text, prev_line_start, column);
        self.preferred_column = Some(column);
        true
    }

    pub fn move_down(&mut self) -> bool {
        let current_line_start = line_start(&self.text, self.cursor);
        let column = self
            .preferred_column
            .unwrap_or_else(|| column_at(&self.text, current_line_start, self.cursor));
        let current_line_end = line_end(&self.text, self.cursor);
        if current_line_end == self.text.len() {
            if self.cursor == self.text.len() {
                return false;
            }
            self.cursor = self.text.len();
            self.preferred_column = Some(column);
            return true;
        }
        self.cursor = position_for_column(&self.text, current_line_end + 1, column);
        self.preferred_column = Some(column);
        true
    }

    fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.preferred_column = None;
    }
}

fn prev_grapheme_boundary(text: &str, cursor: usize) -> usize {
    text[..cursor]
        .grapheme_indices(true)
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_grapheme_boundary(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .graphemes(true)
        .next()
        .map(|grapheme| cursor + grapheme.len())
        .unwrap_or(text.len())
}

fn line_start(text: &str, cursor: usize) -> usize {
    text[..cursor].rfind('\n').map(|idx| idx + 1).unwrap_or(0)
}

fn line_end(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .find('\n')
        .map(|idx| cursor + idx)
        .unwrap_or(text.len())
}

fn column_at(text: &str, line_start: usize, cursor: usize) -> usize {
    text[line_start..cursor].graphemes(true).count()
}

fn position_for_column(text: &str, line_start: usize, column: usize) -> usize {
    let end = line_end(text, line_start);
    text[line_start..end]
        .grapheme_indices(true)
        .nth(column)
        .map(|(idx, _)| line_start + idx)
        .unwrap_or(end)
}

//! Rope-backed text buffer with a cursor and an optional selection.
//!
//! Columns are char offsets within a line, never byte offsets. Every
//! mutation of the content bumps [`TextBuffer::revision`]; cursor motion
//! and selection changes leave it alone, which is what lets the session
//! tell an edit apart from navigation.

use ropey::Rope;
use std::cmp;
use unicode_segmentation::UnicodeSegmentation;

/// A 0-based (line, column) location in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    cursor: Position,
    anchor: Option<Position>,
    revision: u64,
    tab_size: usize,
    use_spaces: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            cursor: Position::default(),
            anchor: None,
            revision: 0,
            tab_size: 4,
            use_spaces: true,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.rope = Rope::from_str(text);
        buffer
    }

    /// Set tab configuration
    pub fn set_tab_config(&mut self, tab_size: usize, use_spaces: bool) {
        self.tab_size = tab_size.max(1);
        self.use_spaces = use_spaces;
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of `line` without its line terminator.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let start = self.rope.line_to_char(line);
        let len = self.line_len(line);
        Some(self.rope.slice(start..start + len).to_string())
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Replace the whole content and move the cursor to the start.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Position::default();
        self.anchor = None;
        self.touch();
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    // Editing

    pub fn insert_char(&mut self, c: char) {
        self.delete_selection();
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, c);
        self.set_cursor_char_idx(idx + 1);
        self.touch();
    }

    pub fn insert_str(&mut self, text: &str) {
        self.delete_selection();
        if text.is_empty() {
            return;
        }
        let idx = self.cursor_char_idx();
        self.rope.insert(idx, text);
        self.set_cursor_char_idx(idx + text.chars().count());
        self.touch();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn insert_tab(&mut self) {
        if self.use_spaces {
            let spaces = self.tab_size - self.cursor.column % self.tab_size;
            self.insert_str(&" ".repeat(spaces));
        } else {
            self.insert_char('\t');
        }
    }

    /// Backspace. Removes the selection if there is one, otherwise the
    /// char before the cursor, treating `\r\n` as a single break.
    pub fn delete_backward(&mut self) {
        if self.delete_selection().is_some() {
            return;
        }
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return;
        }
        let mut start = idx - 1;
        if start > 0 && self.rope.char(start) == '\n' && self.rope.char(start - 1) == '\r' {
            start -= 1;
        }
        self.rope.remove(start..idx);
        self.set_cursor_char_idx(start);
        self.touch();
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection().is_some() {
            return;
        }
        let idx = self.cursor_char_idx();
        let len = self.rope.len_chars();
        if idx >= len {
            return;
        }
        let mut end = idx + 1;
        if end < len && self.rope.char(idx) == '\r' && self.rope.char(end) == '\n' {
            end += 1;
        }
        self.rope.remove(idx..end);
        self.touch();
    }

    // Selection

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    /// Ordered selection bounds, `None` when nothing (or an empty range)
    /// is selected.
    pub fn selection(&self) -> Option<(Position, Position)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((cmp::min(anchor, self.cursor), cmp::max(anchor, self.cursor)))
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        let start = self.char_idx(start);
        let end = self.char_idx(end);
        Some(self.rope.slice(start..end).to_string())
    }

    /// Remove the selected text and return it.
    pub fn delete_selection(&mut self) -> Option<String> {
        let (start, end) = self.selection()?;
        let start_idx = self.char_idx(start);
        let end_idx = self.char_idx(end);
        let removed = self.rope.slice(start_idx..end_idx).to_string();
        self.rope.remove(start_idx..end_idx);
        self.cursor = start;
        self.anchor = None;
        self.touch();
        Some(removed)
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(Position::default());
        self.cursor = self.end_position();
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    // Cursor motion. `extend` keeps (or starts) a selection from the
    // position the cursor had before moving.

    pub fn move_left(&mut self, extend: bool) {
        self.begin_motion(extend);
        if self.cursor.column > 0 {
            let column = self.cursor.column;
            self.cursor.column = self
                .grapheme_boundaries(self.cursor.line)
                .into_iter()
                .rev()
                .find(|&b| b < column)
                .unwrap_or(0);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.column = self.line_len(self.cursor.line);
        }
    }

    pub fn move_right(&mut self, extend: bool) {
        self.begin_motion(extend);
        let len = self.line_len(self.cursor.line);
        if self.cursor.column < len {
            let column = self.cursor.column;
            self.cursor.column = self
                .grapheme_boundaries(self.cursor.line)
                .into_iter()
                .find(|&b| b > column)
                .unwrap_or(len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.column = 0;
        }
    }

    pub fn move_up(&mut self, extend: bool) {
        self.move_lines_up(1, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        self.move_lines_down(1, extend);
    }

    pub fn page_up(&mut self, page: usize, extend: bool) {
        self.move_lines_up(page.max(1), extend);
    }

    pub fn page_down(&mut self, page: usize, extend: bool) {
        self.move_lines_down(page.max(1), extend);
    }

    pub fn move_to_line_start(&mut self, extend: bool) {
        self.begin_motion(extend);
        self.cursor.column = 0;
    }

    pub fn move_to_line_end(&mut self, extend: bool) {
        self.begin_motion(extend);
        self.cursor.column = self.line_len(self.cursor.line);
    }

    pub fn move_to_start(&mut self, extend: bool) {
        self.begin_motion(extend);
        self.cursor = Position::default();
    }

    pub fn move_to_end(&mut self, extend: bool) {
        self.begin_motion(extend);
        self.cursor = self.end_position();
    }

    /// Place the cursor, clamping to the document.
    pub fn set_cursor(&mut self, position: Position) {
        let line = position.line.min(self.line_count().saturating_sub(1));
        let column = position.column.min(self.line_len(line));
        self.cursor = Position::new(line, column);
        self.anchor = None;
    }

    fn move_lines_up(&mut self, count: usize, extend: bool) {
        self.begin_motion(extend);
        if self.cursor.line == 0 {
            self.cursor.column = 0;
            return;
        }
        self.cursor.line = self.cursor.line.saturating_sub(count);
        self.clamp_column();
    }

    fn move_lines_down(&mut self, count: usize, extend: bool) {
        self.begin_motion(extend);
        let last = self.line_count().saturating_sub(1);
        if self.cursor.line == last {
            self.cursor.column = self.line_len(last);
            return;
        }
        self.cursor.line = cmp::min(self.cursor.line + count, last);
        self.clamp_column();
    }

    fn begin_motion(&mut self, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
    }

    fn clamp_column(&mut self) {
        self.cursor.column = self.cursor.column.min(self.line_len(self.cursor.line));
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn end_position(&self) -> Position {
        let line = self.line_count().saturating_sub(1);
        Position::new(line, self.line_len(line))
    }

    /// Number of chars in `line`, excluding `\n`, `\r\n` or `\r`. These
    /// are the only breaks the rope recognises (`cr_lines`).
    fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && slice.char(len - 1) == '\r' {
            len -= 1;
        }
        len
    }

    /// Char offsets of grapheme cluster boundaries in `line`, excluding 0.
    fn grapheme_boundaries(&self, line: usize) -> Vec<usize> {
        let Some(content) = self.line(line) else {
            return Vec::new();
        };
        let mut boundaries = Vec::new();
        let mut chars = 0;
        for grapheme in content.graphemes(true) {
            chars += grapheme.chars().count();
            boundaries.push(chars);
        }
        boundaries
    }

    fn char_idx(&self, position: Position) -> usize {
        self.rope.line_to_char(position.line) + position.column
    }

    fn cursor_char_idx(&self) -> usize {
        self.char_idx(self.cursor)
    }

    fn set_cursor_char_idx(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let column = idx - self.rope.line_to_char(line);
        self.cursor = Position::new(line, column.min(self.line_len(line)));
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

//! Display-width helpers for placing the terminal cursor.
//!
//! Buffer columns count chars; the terminal counts cells. Wide (East
//! Asian, emoji) chars take two cells, combining marks none, and tabs
//! advance to the next tab stop.

use unicode_width::UnicodeWidthChar;

fn char_width(c: char, at: usize, tab_size: usize) -> usize {
    if c == '\t' {
        tab_size - at % tab_size
    } else {
        c.width().unwrap_or(0)
    }
}

/// Cell offset of char column `column` in `line`.
pub fn display_column(line: &str, column: usize, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    line.chars()
        .take(column)
        .fold(0, |at, c| at + char_width(c, at, tab_size))
}

/// Replace tabs with spaces up to the next tab stop so that what is drawn
/// matches [`display_column`].
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let mut out = String::with_capacity(text.len());
    let mut at = 0;
    for c in text.chars() {
        if c == '\t' {
            let spaces = tab_size - at % tab_size;
            out.extend(std::iter::repeat(' ').take(spaces));
            at += spaces;
        } else {
            out.push(c);
            at += c.width().unwrap_or(0);
        }
    }
    out
}

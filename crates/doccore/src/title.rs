//! Window title and status line text, derived from session state.

use std::borrow::Cow;
use std::path::Path;

use crate::buffer::Position;

pub const APP_NAME: &str = "Simple Text Editor";
pub const UNTITLED: &str = "Untitled";

/// Final path component, or `Untitled` when there is no backing file.
pub fn display_name(path: Option<&Path>) -> Cow<'_, str> {
    path.and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy())
        .unwrap_or(Cow::Borrowed(UNTITLED))
}

/// `"<name>[*] - Simple Text Editor"`, with `*` only when dirty.
pub fn window_title(path: Option<&Path>, dirty: bool) -> String {
    format!(
        "{}{} - {}",
        display_name(path),
        if dirty { "*" } else { "" },
        APP_NAME
    )
}

/// `"<name> | Line: <n>, Column: <n>"` with a 1-based cursor.
pub fn status_text(path: Option<&Path>, cursor: Position) -> String {
    format!(
        "{} | Line: {}, Column: {}",
        display_name(path),
        cursor.line + 1,
        cursor.column + 1
    )
}

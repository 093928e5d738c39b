//! The document session: one text buffer, its backing path and the
//! unsaved-changes flag, plus the file operations that move between them.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::buffer::{Position, TextBuffer};
use crate::file_io;
use crate::title;

/// Answer to the unsaved-changes question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Save,
    Discard,
    Cancel,
}

/// User-facing collaborators the session needs but does not draw.
pub trait Dialogs {
    /// Ask whether to save pending changes.
    fn ask_unsaved_changes(&mut self) -> Choice;

    /// `None` when the user cancelled.
    fn pick_open_path(&mut self) -> Option<PathBuf>;

    /// `None` when the user cancelled.
    fn pick_save_path(&mut self) -> Option<PathBuf>;

    fn show_error(&mut self, title: &str, message: &str);

    /// Short-lived confirmation, e.g. after a save.
    fn show_info(&mut self, _message: &str) {}
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    buffer: TextBuffer,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Run `f` against the buffer. Any content change marks the session
    /// dirty; cursor motion does not.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut TextBuffer) -> R) -> R {
        let revision = self.buffer.revision();
        let result = f(&mut self.buffer);
        if self.buffer.revision() != revision {
            self.text_changed();
        }
        result
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    pub fn title(&self) -> String {
        title::window_title(self.path(), self.dirty)
    }

    pub fn status_line(&self) -> String {
        title::status_text(self.path(), self.cursor())
    }

    /// On-edit notification.
    pub fn text_changed(&mut self) {
        if !self.dirty {
            log::debug!("Document modified");
        }
        self.dirty = true;
    }

    /// File > New. Returns whether the document was cleared.
    pub fn new_document(&mut self, dialogs: &mut impl Dialogs) -> bool {
        if !self.check_unsaved_changes(dialogs) {
            return false;
        }
        self.buffer.clear();
        self.path = None;
        self.dirty = false;
        log::info!("Started new document");
        true
    }

    /// File > Open. Returns whether a file was loaded.
    pub fn open(&mut self, dialogs: &mut impl Dialogs) -> bool {
        if !self.check_unsaved_changes(dialogs) {
            return false;
        }
        let Some(path) = dialogs.pick_open_path() else {
            return false;
        };
        match self.open_path(&path) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to open '{}': {:#}", path.display(), e);
                dialogs.show_error("Error", &format!("Could not open file:\n{:#}", e));
                false
            }
        }
    }

    /// Load `path` without asking anything. On failure the session is
    /// left exactly as it was.
    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        let content = file_io::read_text(path)?;
        self.buffer.set_text(&content);
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    /// File > Save. Falls back to Save As for an untitled document.
    pub fn save(&mut self, dialogs: &mut impl Dialogs) -> bool {
        match self.path.clone() {
            Some(path) => self.save_to(path, dialogs),
            None => self.save_as(dialogs),
        }
    }

    /// File > Save As.
    pub fn save_as(&mut self, dialogs: &mut impl Dialogs) -> bool {
        match dialogs.pick_save_path() {
            Some(path) => self.save_to(path, dialogs),
            None => false,
        }
    }

    fn save_to(&mut self, path: PathBuf, dialogs: &mut impl Dialogs) -> bool {
        match file_io::write_text(&path, &self.buffer.text()) {
            Ok(()) => {
                let saved = format!("File saved: {}", title::display_name(Some(&path)));
                self.path = Some(path);
                self.dirty = false;
                dialogs.show_info(&saved);
                true
            }
            Err(e) => {
                log::error!("Failed to save '{}': {:#}", path.display(), e);
                dialogs.show_error("Error", &format!("Could not save file:\n{:#}", e));
                false
            }
        }
    }

    /// Unsaved-changes guard. `true` means the caller may go ahead with
    /// whatever would discard the current text.
    pub fn check_unsaved_changes(&mut self, dialogs: &mut impl Dialogs) -> bool {
        if !self.dirty {
            return true;
        }
        match dialogs.ask_unsaved_changes() {
            Choice::Save => {
                self.save(dialogs);
                !self.dirty
            }
            Choice::Discard => true,
            Choice::Cancel => false,
        }
    }

    /// Window close / File > Exit. `true` means shut down.
    pub fn request_close(&mut self, dialogs: &mut impl Dialogs) -> bool {
        let proceed = self.check_unsaved_changes(dialogs);
        if proceed {
            log::info!("Close request accepted");
        } else {
            log::info!("Close request cancelled");
        }
        proceed
    }
}

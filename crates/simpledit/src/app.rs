use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use doccore::{Dialogs, Session};
use std::path::Path;

use crate::config::Config;
use crate::menu::{Action, MenuOutcome};
use crate::ui_state::UIState;

/// The editor front end: one document session plus view state.
pub struct App {
    pub session: Session,
    pub config: Config,
    pub ui_state: UIState,
    clipboard: String,
    shown_title: Option<String>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut session = Session::new();
        let (tab_size, use_spaces) = (config.editor.tab_size, config.editor.use_spaces);
        session.edit(|buffer| buffer.set_tab_config(tab_size, use_spaces));

        Self {
            session,
            config,
            ui_state: UIState::new(),
            clipboard: String::new(),
            shown_title: None,
        }
    }

    pub fn title(&self) -> String {
        self.session.title()
    }

    /// Transient message if one is showing, otherwise file and cursor.
    pub fn status_line(&self) -> String {
        match self.ui_state.status_message() {
            Some(message) => message.to_string(),
            None => self.session.status_line(),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.session.is_dirty()
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit()
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    pub fn update_status(&mut self) {
        self.ui_state.update_status();
    }

    /// The window title, but only when it differs from the one last
    /// returned.
    pub fn title_if_changed(&mut self) -> Option<String> {
        let title = self.title();
        if self.shown_title.as_deref() == Some(title.as_str()) {
            return None;
        }
        self.shown_title = Some(title.clone());
        Some(title)
    }

    /// Show messages the session reported through `Dialogs::show_info`.
    pub fn show_notices(&mut self, notices: Vec<String>) {
        for notice in notices {
            self.ui_state.set_success_message(notice);
        }
    }

    /// Load a file named on the command line. Failure leaves an untitled
    /// document and a message in the status line.
    pub fn open_from_command_line(&mut self, path: &Path) {
        match self.session.open_path(path) {
            Ok(()) => {
                log::info!("Loaded file from command line: {}", path.display());
                self.ui_state
                    .set_info_message(format!("Opened {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to load file '{}': {:#}", path.display(), e);
                self.ui_state
                    .set_error_message(format!("Could not open file: {:#}", e));
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, dialogs: &mut impl Dialogs) {
        if self.ui_state.menu.is_open() {
            if let MenuOutcome::Activate(action) = self.ui_state.menu.handle_key(key) {
                self.perform(action, dialogs);
            }
            return;
        }

        if key.code == KeyCode::F(10) {
            self.ui_state.menu.open(0);
            return;
        }

        if key.modifiers.contains(KeyModifiers::ALT)
            && !key.modifiers.contains(KeyModifiers::CONTROL)
        {
            if let KeyCode::Char(c) = key.code {
                if self.ui_state.menu.open_by_hotkey(c) {
                    return;
                }
            }
        }

        if let Some(action) = Action::from_key(&key) {
            self.perform(action, dialogs);
            return;
        }

        self.handle_edit_key(key);
    }

    pub fn perform(&mut self, action: Action, dialogs: &mut impl Dialogs) {
        log::debug!("Menu action: {:?}", action);
        match action {
            Action::New => {
                self.session.new_document(dialogs);
            }
            Action::Open => {
                self.session.open(dialogs);
            }
            Action::Save => {
                self.session.save(dialogs);
            }
            Action::SaveAs => {
                self.session.save_as(dialogs);
            }
            Action::Exit => {
                if self.session.request_close(dialogs) {
                    log::info!("Application shutdown requested");
                    self.ui_state.quit();
                }
            }
            Action::Cut => {
                if let Some(text) = self.session.edit(|buffer| buffer.delete_selection()) {
                    self.clipboard = text;
                }
            }
            Action::Copy => {
                if let Some(text) = self.session.buffer().selected_text() {
                    self.clipboard = text;
                }
            }
            Action::Paste => {
                if !self.clipboard.is_empty() {
                    let text = self.clipboard.clone();
                    self.session.edit(|buffer| buffer.insert_str(&text));
                }
            }
            Action::SelectAll => self.session.edit(|buffer| buffer.select_all()),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let page = self.ui_state.page_height;

        self.session.edit(|buffer| match key.code {
            KeyCode::Char(c) if !ctrl && !alt => buffer.insert_char(c),
            KeyCode::Enter => buffer.insert_newline(),
            KeyCode::Tab => buffer.insert_tab(),
            KeyCode::Backspace => buffer.delete_backward(),
            KeyCode::Delete => buffer.delete_forward(),
            KeyCode::Left => buffer.move_left(shift),
            KeyCode::Right => buffer.move_right(shift),
            KeyCode::Up => buffer.move_up(shift),
            KeyCode::Down => buffer.move_down(shift),
            KeyCode::Home if ctrl => buffer.move_to_start(shift),
            KeyCode::Home => buffer.move_to_line_start(shift),
            KeyCode::End if ctrl => buffer.move_to_end(shift),
            KeyCode::End => buffer.move_to_line_end(shift),
            KeyCode::PageUp => buffer.page_up(page, shift),
            KeyCode::PageDown => buffer.page_down(page, shift),
            KeyCode::Esc => buffer.clear_selection(),
            _ => {}
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccore::Choice;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeDialogs {
        choices: VecDeque<Choice>,
        paths: VecDeque<PathBuf>,
        errors: Vec<String>,
        notices: Vec<String>,
    }

    impl Dialogs for FakeDialogs {
        fn ask_unsaved_changes(&mut self) -> Choice {
            self.choices.pop_front().unwrap_or(Choice::Cancel)
        }

        fn pick_open_path(&mut self) -> Option<PathBuf> {
            self.paths.pop_front()
        }

        fn pick_save_path(&mut self) -> Option<PathBuf> {
            self.paths.pop_front()
        }

        fn show_error(&mut self, _title: &str, message: &str) {
            self.errors.push(message.to_string());
        }

        fn show_info(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }
    }

    fn create_key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, dialogs: &mut FakeDialogs, text: &str) {
        for c in text.chars() {
            app.handle_key_event(create_key_event(KeyCode::Char(c)), dialogs);
        }
    }

    #[test]
    fn test_app_creation() {
        let app = App::new(Config::default());
        assert!(!app.is_modified());
        assert!(!app.should_quit());
        assert!(app.session.path().is_none());
        assert_eq!(app.title(), "Untitled - Simple Text Editor");
        assert_eq!(app.status_line(), "Untitled | Line: 1, Column: 1");
    }

    #[test]
    fn test_typing_marks_modified() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        type_text(&mut app, &mut dialogs, "hello");

        assert!(app.is_modified());
        assert_eq!(app.session.text(), "hello");
        assert_eq!(app.title(), "Untitled* - Simple Text Editor");
        assert_eq!(app.status_line(), "Untitled | Line: 1, Column: 6");
    }

    #[test]
    fn test_arrow_keys_do_not_modify() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        app.handle_key_event(create_key_event(KeyCode::Right), &mut dialogs);
        app.handle_key_event(create_key_event(KeyCode::End), &mut dialogs);
        assert!(!app.is_modified());
    }

    #[test]
    fn test_ctrl_s_untitled_saves_as() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        type_text(&mut app, &mut dialogs, "hello");

        dialogs.paths.push_back(path.clone());
        app.handle_key_event(ctrl('s'), &mut dialogs);
        app.show_notices(std::mem::take(&mut dialogs.notices));

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert!(!app.is_modified());
        assert_eq!(app.title(), "a.txt - Simple Text Editor");
        assert_eq!(app.status_line(), "File saved: a.txt");
    }

    #[test]
    fn test_exit_when_clean_quits() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        app.handle_key_event(ctrl('q'), &mut dialogs);
        assert!(app.should_quit());
    }

    #[test]
    fn test_exit_cancelled_keeps_running() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        type_text(&mut app, &mut dialogs, "draft");

        dialogs.choices.push_back(Choice::Cancel);
        app.handle_key_event(ctrl('q'), &mut dialogs);

        assert!(!app.should_quit());
        assert!(app.is_modified());
        assert_eq!(app.session.text(), "draft");
    }

    #[test]
    fn test_exit_discard_quits() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        type_text(&mut app, &mut dialogs, "draft");

        dialogs.choices.push_back(Choice::Discard);
        app.handle_key_event(ctrl('q'), &mut dialogs);
        assert!(app.should_quit());
    }

    #[test]
    fn test_new_with_discard_clears() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        type_text(&mut app, &mut dialogs, "draft");

        dialogs.choices.push_back(Choice::Discard);
        app.handle_key_event(ctrl('n'), &mut dialogs);

        assert_eq!(app.session.text(), "");
        assert!(!app.is_modified());
        assert_eq!(app.title(), "Untitled - Simple Text Editor");
    }

    #[test]
    fn test_open_missing_file_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();

        dialogs.paths.push_back(dir.path().join("missing.txt"));
        app.handle_key_event(ctrl('o'), &mut dialogs);

        assert_eq!(dialogs.errors.len(), 1);
        assert!(app.session.path().is_none());
        assert!(!app.is_modified());
    }

    #[test]
    fn test_cut_copy_paste() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        type_text(&mut app, &mut dialogs, "abc");

        // Select "bc" and cut it
        let shift_left = KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT);
        app.handle_key_event(shift_left, &mut dialogs);
        app.handle_key_event(shift_left, &mut dialogs);
        app.handle_key_event(ctrl('x'), &mut dialogs);
        assert_eq!(app.session.text(), "a");
        assert_eq!(app.clipboard(), "bc");

        app.handle_key_event(ctrl('v'), &mut dialogs);
        app.handle_key_event(ctrl('v'), &mut dialogs);
        assert_eq!(app.session.text(), "abcbc");

        app.handle_key_event(ctrl('a'), &mut dialogs);
        app.handle_key_event(ctrl('c'), &mut dialogs);
        assert_eq!(app.clipboard(), "abcbc");
        assert_eq!(app.session.text(), "abcbc");
    }

    #[test]
    fn test_cut_without_selection_is_noop() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        app.handle_key_event(ctrl('x'), &mut dialogs);
        assert!(!app.is_modified());
        assert_eq!(app.clipboard(), "");
    }

    #[test]
    fn test_menu_activation_from_keyboard() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        type_text(&mut app, &mut dialogs, "xyz");

        // F10 opens File, Right moves to Edit, Up wraps to Select All
        app.handle_key_event(create_key_event(KeyCode::F(10)), &mut dialogs);
        app.handle_key_event(create_key_event(KeyCode::Right), &mut dialogs);
        app.handle_key_event(create_key_event(KeyCode::Up), &mut dialogs);
        assert!(app.ui_state.menu.is_open());

        app.handle_key_event(create_key_event(KeyCode::Enter), &mut dialogs);
        assert!(!app.ui_state.menu.is_open());
        assert_eq!(app.session.buffer().selected_text().as_deref(), Some("xyz"));
    }

    #[test]
    fn test_keys_go_to_menu_while_open() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        let alt_f = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT);
        app.handle_key_event(alt_f, &mut dialogs);
        assert_eq!(app.ui_state.menu.open_menu(), Some(0));

        app.handle_key_event(create_key_event(KeyCode::Char('z')), &mut dialogs);
        assert_eq!(app.session.text(), "");

        app.handle_key_event(create_key_event(KeyCode::Esc), &mut dialogs);
        assert!(!app.ui_state.menu.is_open());
    }

    #[test]
    fn test_title_if_changed() {
        let mut app = App::new(Config::default());
        let mut dialogs = FakeDialogs::default();
        assert_eq!(
            app.title_if_changed().as_deref(),
            Some("Untitled - Simple Text Editor")
        );
        assert_eq!(app.title_if_changed(), None);

        type_text(&mut app, &mut dialogs, "a");
        assert_eq!(
            app.title_if_changed().as_deref(),
            Some("Untitled* - Simple Text Editor")
        );
        type_text(&mut app, &mut dialogs, "b");
        assert_eq!(app.title_if_changed(), None);
    }

    #[test]
    fn test_open_from_command_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cli.txt");
        fs::write(&path, "from disk").unwrap();

        let mut app = App::new(Config::default());
        app.open_from_command_line(&path);
        assert_eq!(app.session.text(), "from disk");
        assert!(!app.is_modified());

        let mut app = App::new(Config::default());
        app.open_from_command_line(&dir.path().join("missing.txt"));
        assert!(app.session.path().is_none());
        assert!(app.status_line().starts_with("Could not open file"));
    }

    #[test]
    fn test_tab_uses_config() {
        let mut config = Config::default();
        config.editor.tab_size = 2;
        let mut app = App::new(config);
        let mut dialogs = FakeDialogs::default();
        app.handle_key_event(create_key_event(KeyCode::Tab), &mut dialogs);
        assert_eq!(app.session.text(), "  ");
    }
}

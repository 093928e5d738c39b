use crate::menu::MenuState;
use crate::status_manager::{MessageType, StatusManager};

/// View-only state of the terminal front end. Nothing here is part of
/// the document.
#[derive(Debug, Clone)]
pub struct UIState {
    pub status_manager: StatusManager,
    pub menu: MenuState,
    pub should_quit: bool,
    /// First document line shown in the text area.
    pub scroll_top: usize,
    /// First display column shown in the text area.
    pub scroll_left: usize,
    /// Height of the text area at the last draw, used for paging.
    pub page_height: usize,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            status_manager: StatusManager::new(),
            menu: MenuState::new(),
            should_quit: false,
            scroll_top: 0,
            scroll_left: 0,
            page_height: 20,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_info_message(&mut self, message: String) {
        self.status_manager.set(message, MessageType::Info);
    }

    pub fn set_success_message(&mut self, message: String) {
        self.status_manager.set(message, MessageType::Success);
    }

    pub fn set_warning_message(&mut self, message: String) {
        self.status_manager.set(message, MessageType::Warning);
    }

    pub fn set_error_message(&mut self, message: String) {
        self.status_manager.set(message, MessageType::Error);
    }

    pub fn update_status(&mut self) {
        self.status_manager.update();
    }

    /// Transient message currently overriding the status line, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.status_manager
            .current()
            .map(|message| message.content.as_str())
    }

    /// Scroll so that `line` and display column `column` are visible in a
    /// `height` x `width` text area.
    pub fn scroll_to(&mut self, line: usize, column: usize, height: usize, width: usize) {
        self.page_height = height.max(1);
        if line < self.scroll_top {
            self.scroll_top = line;
        } else if height > 0 && line >= self.scroll_top + height {
            self.scroll_top = line + 1 - height;
        }

        if column < self.scroll_left {
            self.scroll_left = column;
        } else if width > 0 && column >= self.scroll_left + width {
            self.scroll_left = column + 1 - width;
        }
    }
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_state_creation() {
        let state = UIState::new();
        assert!(!state.should_quit());
        assert!(state.status_message().is_none());
        assert!(!state.menu.is_open());
        assert_eq!(state.scroll_top, 0);
    }

    #[test]
    fn test_quit() {
        let mut state = UIState::new();
        state.quit();
        assert!(state.should_quit());
    }

    #[test]
    fn test_status_message() {
        let mut state = UIState::new();
        state.set_success_message("File saved: a.txt".to_string());
        assert_eq!(state.status_message(), Some("File saved: a.txt"));

        state.set_error_message("boom".to_string());
        assert_eq!(state.status_message(), Some("boom"));

        state.set_warning_message("Config not loaded, using defaults".to_string());
        assert_eq!(
            state.status_manager.current().map(|m| m.message_type),
            Some(MessageType::Warning)
        );
    }

    #[test]
    fn test_scroll_follows_cursor_down_and_up() {
        let mut state = UIState::new();
        state.scroll_to(30, 0, 10, 80);
        assert_eq!(state.scroll_top, 21);
        assert_eq!(state.page_height, 10);

        state.scroll_to(25, 0, 10, 80);
        assert_eq!(state.scroll_top, 21);

        state.scroll_to(5, 0, 10, 80);
        assert_eq!(state.scroll_top, 5);
    }

    #[test]
    fn test_horizontal_scroll() {
        let mut state = UIState::new();
        state.scroll_to(0, 100, 10, 40);
        assert_eq!(state.scroll_left, 61);

        state.scroll_to(0, 3, 10, 40);
        assert_eq!(state.scroll_left, 3);
    }
}

//! Modal dialogs drawn over the editor.
//!
//! Each dialog runs its own nested event loop until answered, the way a
//! desktop toolkit's modal message boxes and file pickers do, so the
//! session can ask a question and get the answer back in the same call.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use directories::BaseDirs;
use doccore::{Choice, Dialogs};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame, Terminal,
};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

use crate::ui::centered_rect;

pub trait ModalDialog {
    type Output;

    /// `Some` once the dialog has been answered.
    fn handle_key(&mut self, key: KeyEvent) -> Option<Self::Output>;

    fn render(&self, f: &mut Frame);
}

/// Save / Discard / Cancel question shown before losing changes.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    title: &'static str,
    message: &'static str,
    selected: usize,
}

const CONFIRM_BUTTONS: [(&str, Choice); 3] = [
    ("Yes", Choice::Save),
    ("No", Choice::Discard),
    ("Cancel", Choice::Cancel),
];

impl ConfirmDialog {
    pub fn unsaved_changes() -> Self {
        Self {
            title: "Unsaved Changes",
            message: "You have unsaved changes. Do you want to save them?",
            selected: 0,
        }
    }

    pub fn selected(&self) -> Choice {
        CONFIRM_BUTTONS[self.selected].1
    }
}

impl ModalDialog for ConfirmDialog {
    type Output = Choice;

    fn handle_key(&mut self, key: KeyEvent) -> Option<Choice> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Choice::Save),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Choice::Discard),
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => Some(Choice::Cancel),
            KeyCode::Enter => Some(self.selected()),
            KeyCode::Left | KeyCode::BackTab => {
                self.selected = (self.selected + CONFIRM_BUTTONS.len() - 1) % CONFIRM_BUTTONS.len();
                None
            }
            KeyCode::Right | KeyCode::Tab => {
                self.selected = (self.selected + 1) % CONFIRM_BUTTONS.len();
                None
            }
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame) {
        let area = centered_rect(58, 7, f.size());
        let mut buttons = Vec::new();
        for (i, (label, _)) in CONFIRM_BUTTONS.iter().enumerate() {
            let style = if i == self.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            if i > 0 {
                buttons.push(Span::raw("  "));
            }
            buttons.push(Span::styled(format!("[ {} ]", label), style));
        }

        let text = vec![
            Line::from(self.message),
            Line::from(""),
            Line::from(buttons).alignment(Alignment::Center),
        ];
        render_box(f, area, self.title, Color::Yellow, text);
    }
}

/// Single-line path entry standing in for a file picker.
#[derive(Debug, Clone)]
pub struct PathPrompt {
    title: &'static str,
    input: String,
    /// Cursor as a char index into `input`.
    cursor: usize,
}

impl PathPrompt {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            input: String::new(),
            cursor: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

impl ModalDialog for PathPrompt {
    /// `None` when the prompt was cancelled.
    type Output = Option<PathBuf>;

    fn handle_key(&mut self, key: KeyEvent) -> Option<Option<PathBuf>> {
        match key.code {
            KeyCode::Esc => return Some(None),
            KeyCode::Enter => {
                let trimmed = self.input.trim();
                if trimmed.is_empty() {
                    return Some(None);
                }
                return Some(Some(expand_home(trimmed)));
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let at = self.byte_index(self.cursor);
                self.input.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.input.remove(at);
            }
            KeyCode::Delete if self.cursor < self.input.chars().count() => {
                let at = self.byte_index(self.cursor);
                self.input.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame) {
        let area = centered_rect(64, 6, f.size());
        let text = vec![
            Line::from("Path:"),
            Line::from(Span::styled(
                self.input.as_str(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(Span::styled(
                "Enter to confirm, Esc to cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let inner = render_box(f, area, self.title, Color::Cyan, text);

        let prefix: String = self.input.chars().take(self.cursor).collect();
        let x = inner.x + prefix.width() as u16;
        let y = inner.y + 1;
        if x < inner.right() && y < inner.bottom() {
            f.set_cursor(x, y);
        }
    }
}

/// Error box dismissed by any key.
#[derive(Debug, Clone)]
pub struct MessageBox {
    title: String,
    message: String,
}

impl MessageBox {
    pub fn new(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

impl ModalDialog for MessageBox {
    type Output = ();

    fn handle_key(&mut self, _key: KeyEvent) -> Option<()> {
        Some(())
    }

    fn render(&self, f: &mut Frame) {
        let lines = self.message.lines().count() as u16;
        let area = centered_rect(64, lines + 5, f.size());
        let mut text: Vec<Line> = self.message.lines().map(Line::from).collect();
        text.push(Line::from(""));
        text.push(
            Line::from(Span::styled(
                "[ OK ]",
                Style::default().add_modifier(Modifier::REVERSED),
            ))
            .alignment(Alignment::Center),
        );
        render_box(f, area, &self.title, Color::Red, text);
    }
}

/// Draw a bordered popup and return its inner area.
fn render_box(f: &mut Frame, area: Rect, title: &str, color: Color, text: Vec<Line>) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
    inner
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(input: &str) -> PathBuf {
    let rest = match input.strip_prefix('~') {
        Some("") => Some(""),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => Some(&rest[1..]),
        _ => None,
    };
    match (rest, BaseDirs::new()) {
        (Some(rest), Some(dirs)) => dirs.home_dir().join(rest),
        _ => PathBuf::from(input),
    }
}

/// The last frame drawn by the main loop, repainted under a dialog.
pub struct Backdrop<'a>(pub &'a Buffer);

impl Widget for Backdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(self.0.area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                *buf.get_mut(x, y) = self.0.get(x, y).clone();
            }
        }
    }
}

/// [`Dialogs`] backed by the real terminal.
pub struct TerminalDialogs<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    backdrop: Buffer,
    notices: Vec<String>,
}

impl<'a, B: Backend> TerminalDialogs<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, backdrop: Buffer) -> Self {
        Self {
            terminal,
            backdrop,
            notices: Vec::new(),
        }
    }

    /// Messages passed to `show_info`, for the status line.
    pub fn into_notices(self) -> Vec<String> {
        self.notices
    }

    fn run_modal<M: ModalDialog>(&mut self, dialog: &mut M) -> Option<M::Output> {
        loop {
            let backdrop = &self.backdrop;
            if let Err(e) = self.terminal.draw(|f| {
                f.render_widget(Backdrop(backdrop), f.size());
                dialog.render(f);
            }) {
                log::error!("Dialog draw error: {}", e);
                return None;
            }

            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let Some(output) = dialog.handle_key(key) {
                        return Some(output);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Failed to read terminal event in dialog: {}", e);
                    return None;
                }
            }
        }
    }
}

impl<B: Backend> Dialogs for TerminalDialogs<'_, B> {
    fn ask_unsaved_changes(&mut self) -> Choice {
        self.run_modal(&mut ConfirmDialog::unsaved_changes())
            .unwrap_or(Choice::Cancel)
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.run_modal(&mut PathPrompt::new("Open File")).flatten()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.run_modal(&mut PathPrompt::new("Save File As")).flatten()
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.run_modal(&mut MessageBox::new(title, message));
    }

    fn show_info(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render<M: ModalDialog>(dialog: &M) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| dialog.render(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_confirm_letter_keys() {
        let mut dialog = ConfirmDialog::unsaved_changes();
        assert_eq!(dialog.handle_key(key(KeyCode::Char('y'))), Some(Choice::Save));
        assert_eq!(dialog.handle_key(key(KeyCode::Char('N'))), Some(Choice::Discard));
        assert_eq!(dialog.handle_key(key(KeyCode::Char('c'))), Some(Choice::Cancel));
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), Some(Choice::Cancel));
    }

    #[test]
    fn test_confirm_button_focus() {
        let mut dialog = ConfirmDialog::unsaved_changes();
        assert_eq!(dialog.selected(), Choice::Save);

        assert_eq!(dialog.handle_key(key(KeyCode::Right)), None);
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), Some(Choice::Discard));

        assert_eq!(dialog.handle_key(key(KeyCode::Left)), None);
        assert_eq!(dialog.handle_key(key(KeyCode::Left)), None);
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), Some(Choice::Cancel));
    }

    #[test]
    fn test_confirm_renders_question() {
        let screen = render(&ConfirmDialog::unsaved_changes());
        assert!(screen.contains("Unsaved Changes"));
        assert!(screen.contains("You have unsaved changes. Do you want to save them?"));
        assert!(screen.contains("[ Yes ]"));
        assert!(screen.contains("[ Cancel ]"));
    }

    #[test]
    fn test_prompt_editing() {
        let mut prompt = PathPrompt::new("Open File");
        for c in "/tmp/b.txt".chars() {
            assert_eq!(prompt.handle_key(key(KeyCode::Char(c))), None);
        }
        prompt.handle_key(key(KeyCode::Left));
        prompt.handle_key(key(KeyCode::Left));
        prompt.handle_key(key(KeyCode::Left));
        prompt.handle_key(key(KeyCode::Left));
        prompt.handle_key(key(KeyCode::Backspace));
        prompt.handle_key(key(KeyCode::Char('a')));
        assert_eq!(prompt.input(), "/tmp/a.txt");

        prompt.handle_key(key(KeyCode::End));
        prompt.handle_key(key(KeyCode::Home));
        prompt.handle_key(key(KeyCode::Delete));
        assert_eq!(prompt.input(), "tmp/a.txt");
    }

    #[test]
    fn test_prompt_submit_and_cancel() {
        let mut prompt = PathPrompt::new("Save File As");
        for c in "out.txt".chars() {
            prompt.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            Some(Some(PathBuf::from("out.txt")))
        );

        let mut prompt = PathPrompt::new("Save File As");
        prompt.handle_key(key(KeyCode::Char('x')));
        assert_eq!(prompt.handle_key(key(KeyCode::Esc)), Some(None));
    }

    #[test]
    fn test_prompt_empty_submit_is_cancel() {
        let mut prompt = PathPrompt::new("Open File");
        prompt.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(prompt.handle_key(key(KeyCode::Enter)), Some(None));
    }

    #[test]
    fn test_prompt_handles_multibyte_input() {
        let mut prompt = PathPrompt::new("Open File");
        for c in "日本.txt".chars() {
            prompt.handle_key(key(KeyCode::Char(c)));
        }
        prompt.handle_key(key(KeyCode::Home));
        prompt.handle_key(key(KeyCode::Right));
        prompt.handle_key(key(KeyCode::Delete));
        assert_eq!(prompt.input(), "日.txt");
    }

    #[test]
    fn test_prompt_renders_title_and_input() {
        let mut prompt = PathPrompt::new("Save File As");
        for c in "notes.txt".chars() {
            prompt.handle_key(key(KeyCode::Char(c)));
        }
        let screen = render(&prompt);
        assert!(screen.contains("Save File As"));
        assert!(screen.contains("notes.txt"));
    }

    #[test]
    fn test_message_box_any_key_dismisses() {
        let mut message = MessageBox::new("Error", "Could not open file:\nmissing");
        assert_eq!(message.handle_key(key(KeyCode::Char('q'))), Some(()));

        let screen = render(&message);
        assert!(screen.contains("Error"));
        assert!(screen.contains("Could not open file:"));
        assert!(screen.contains("missing"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("rel.txt"), PathBuf::from("rel.txt"));
        if let Some(dirs) = BaseDirs::new() {
            assert_eq!(expand_home("~/a.txt"), dirs.home_dir().join("a.txt"));
            assert_eq!(expand_home("~"), dirs.home_dir().to_path_buf());
        }
        assert_eq!(expand_home("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn test_backdrop_copies_cells() {
        let mut source = Buffer::empty(Rect::new(0, 0, 10, 2));
        source.set_string(0, 0, "behind", Style::default());

        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        terminal
            .draw(|f| f.render_widget(Backdrop(&source), f.size()))
            .unwrap();
        assert!(buffer_text(terminal.backend().buffer()).starts_with("behind"));
    }
}

//! Menu bar model: the File and Edit menus, their shortcuts, and the
//! open/highlight state while navigating them from the keyboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    Cut,
    Copy,
    Paste,
    SelectAll,
}

impl Action {
    /// Map a global shortcut to its action.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.code == KeyCode::F(12) {
            return Some(Action::SaveAs);
        }
        if !key.modifiers.contains(KeyModifiers::CONTROL)
            || key.modifiers.contains(KeyModifiers::ALT)
        {
            return None;
        }
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        let shift = key.modifiers.contains(KeyModifiers::SHIFT) || c.is_ascii_uppercase();
        match c.to_ascii_lowercase() {
            'n' => Some(Action::New),
            'o' => Some(Action::Open),
            's' if shift => Some(Action::SaveAs),
            's' => Some(Action::Save),
            'q' => Some(Action::Exit),
            'x' => Some(Action::Cut),
            'c' => Some(Action::Copy),
            'v' => Some(Action::Paste),
            'a' => Some(Action::SelectAll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        label: &'static str,
        shortcut: &'static str,
        action: Action,
    },
    Separator,
}

#[derive(Debug)]
pub struct Menu {
    pub title: &'static str,
    /// Alt+<hotkey> opens the menu.
    pub hotkey: char,
    pub entries: &'static [MenuEntry],
}

const fn item(label: &'static str, shortcut: &'static str, action: Action) -> MenuEntry {
    MenuEntry::Item {
        label,
        shortcut,
        action,
    }
}

pub const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        hotkey: 'f',
        entries: &[
            item("New", "Ctrl+N", Action::New),
            item("Open", "Ctrl+O", Action::Open),
            MenuEntry::Separator,
            item("Save", "Ctrl+S", Action::Save),
            item("Save As...", "Ctrl+Shift+S", Action::SaveAs),
            MenuEntry::Separator,
            item("Exit", "Ctrl+Q", Action::Exit),
        ],
    },
    Menu {
        title: "Edit",
        hotkey: 'e',
        entries: &[
            item("Cut", "Ctrl+X", Action::Cut),
            item("Copy", "Ctrl+C", Action::Copy),
            item("Paste", "Ctrl+V", Action::Paste),
            MenuEntry::Separator,
            item("Select All", "Ctrl+A", Action::SelectAll),
        ],
    },
];

/// What a key did while a menu was open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Consumed,
    Activate(Action),
    Closed,
}

#[derive(Debug, Clone, Default)]
pub struct MenuState {
    open: Option<usize>,
    highlighted: usize,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_menu(&self) -> Option<usize> {
        self.open
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn open(&mut self, index: usize) {
        let index = index.min(MENUS.len() - 1);
        self.open = Some(index);
        self.highlighted = 0;
    }

    pub fn close(&mut self) {
        self.open = None;
        self.highlighted = 0;
    }

    /// Open the menu whose hotkey is `c` (case-insensitive).
    pub fn open_by_hotkey(&mut self, c: char) -> bool {
        match MENUS.iter().position(|m| m.hotkey == c.to_ascii_lowercase()) {
            Some(index) => {
                self.open(index);
                true
            }
            None => false,
        }
    }

    pub fn highlighted_action(&self) -> Option<Action> {
        let menu = &MENUS[self.open?];
        match menu.entries.get(self.highlighted)? {
            MenuEntry::Item { action, .. } => Some(*action),
            MenuEntry::Separator => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> MenuOutcome {
        let Some(open) = self.open else {
            return MenuOutcome::Closed;
        };
        match key.code {
            KeyCode::Esc | KeyCode::F(10) => {
                self.close();
                MenuOutcome::Closed
            }
            KeyCode::Left => {
                self.open((open + MENUS.len() - 1) % MENUS.len());
                MenuOutcome::Consumed
            }
            KeyCode::Right => {
                self.open((open + 1) % MENUS.len());
                MenuOutcome::Consumed
            }
            KeyCode::Up => {
                self.step(open, false);
                MenuOutcome::Consumed
            }
            KeyCode::Down => {
                self.step(open, true);
                MenuOutcome::Consumed
            }
            KeyCode::Enter => match self.highlighted_action() {
                Some(action) => {
                    self.close();
                    MenuOutcome::Activate(action)
                }
                None => MenuOutcome::Consumed,
            },
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => {
                self.open_by_hotkey(c);
                MenuOutcome::Consumed
            }
            _ => MenuOutcome::Consumed,
        }
    }

    /// Move the highlight to the next item, skipping separators.
    fn step(&mut self, open: usize, forward: bool) {
        let entries = MENUS[open].entries;
        let len = entries.len();
        let mut index = self.highlighted;
        for _ in 0..len {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if matches!(entries[index], MenuEntry::Item { .. }) {
                self.highlighted = index;
                return;
            }
        }
    }
}

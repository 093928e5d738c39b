use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::cmp;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::config::Theme;
use crate::menu::{MenuEntry, MENUS};
use crate::status_manager::MessageType;
use crate::text_width::{display_column, expand_tabs};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.size();
    if size.width == 0 || size.height == 0 {
        log::warn!("Invalid frame size: {:?}", size);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Menu bar
            Constraint::Min(0),    // Text area
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    draw_menu_bar(f, app, chunks[0]);
    draw_editor(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if let Some(index) = app.ui_state.menu.open_menu() {
        draw_menu_dropdown(f, app, index, chunks[1]);
    }
}

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn menu_title(index: usize) -> String {
    format!(" {} ", MENUS[index].title)
}

fn menu_bar_style(app: &App) -> Style {
    let theme = &app.config.theme;
    Style::default()
        .fg(Theme::color(&theme.menu_foreground, Color::Black))
        .bg(Theme::color(&theme.menu_background, Color::Gray))
}

fn draw_menu_bar(f: &mut Frame, app: &App, area: Rect) {
    let style = menu_bar_style(app);
    let open = app.ui_state.menu.open_menu();

    let mut spans = Vec::new();
    for index in 0..MENUS.len() {
        let title = menu_title(index);
        if open == Some(index) {
            spans.push(Span::styled(title, style.add_modifier(Modifier::REVERSED)));
        } else {
            spans.push(Span::styled(title, style));
        }
    }
    let menus_width = spans.iter().map(|s| s.content.width()).sum::<usize>() as u16;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(menus_width), Constraint::Min(0)])
        .split(area);

    f.render_widget(Paragraph::new(Line::from(spans)).style(style), chunks[0]);
    f.render_widget(
        Paragraph::new(format!("{} ", app.title()))
            .style(style)
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_menu_dropdown(f: &mut Frame, app: &App, index: usize, area: Rect) {
    let menu = &MENUS[index];
    let style = menu_bar_style(app);

    let label_width = menu
        .entries
        .iter()
        .map(|entry| match entry {
            MenuEntry::Item { label, .. } => label.width(),
            MenuEntry::Separator => 0,
        })
        .max()
        .unwrap_or(0);
    let shortcut_width = menu
        .entries
        .iter()
        .map(|entry| match entry {
            MenuEntry::Item { shortcut, .. } => shortcut.width(),
            MenuEntry::Separator => 0,
        })
        .max()
        .unwrap_or(0);
    let inner_width = label_width + shortcut_width + 4;

    let lines: Vec<Line> = menu
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            MenuEntry::Item {
                label, shortcut, ..
            } => {
                let text = format!(
                    " {:<lw$}  {:>sw$} ",
                    label,
                    shortcut,
                    lw = label_width,
                    sw = shortcut_width
                );
                if i == app.ui_state.menu.highlighted() {
                    Line::from(Span::styled(text, style.add_modifier(Modifier::REVERSED)))
                } else {
                    Line::from(Span::styled(text, style))
                }
            }
            MenuEntry::Separator => Line::from(Span::styled("─".repeat(inner_width), style)),
        })
        .collect();

    let x_offset: usize = (0..index).map(|i| menu_title(i).width()).sum();
    let x = area.x + (x_offset as u16).min(area.width.saturating_sub(1));
    let width = (inner_width as u16 + 2).min(area.right() - x);
    let height = (lines.len() as u16 + 2).min(area.height);
    let dropdown = Rect::new(x, area.y, width, height);

    f.render_widget(Clear, dropdown);
    f.render_widget(
        Paragraph::new(lines).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style),
        ),
        dropdown,
    );
}

fn draw_editor(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let tab_size = app.config.editor.tab_size;
    let buffer = app.session.buffer();

    let gutter_width = if app.config.editor.line_numbers {
        buffer.line_count().to_string().len() as u16 + 1
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(gutter_width), Constraint::Min(0)])
        .split(area);
    let text_area = chunks[1];

    let cursor = buffer.cursor();
    let cursor_line = buffer.line(cursor.line).unwrap_or_default();
    let cursor_x = display_column(&cursor_line, cursor.column, tab_size);
    app.ui_state.scroll_to(
        cursor.line,
        cursor_x,
        text_area.height as usize,
        text_area.width as usize,
    );
    let scroll_top = app.ui_state.scroll_top;
    let scroll_left = app.ui_state.scroll_left;

    let selection_style = Style::default().bg(Theme::color(
        &app.config.theme.selection_background,
        Color::Blue,
    ));
    let selection = buffer.selection();
    let last_line = cmp::min(scroll_top + text_area.height as usize, buffer.line_count());

    let mut lines = Vec::new();
    let mut numbers = Vec::new();
    for line_idx in scroll_top..last_line {
        let content = buffer.line(line_idx).unwrap_or_default();
        let selected = selection.and_then(|(start, end)| {
            if line_idx < start.line || line_idx > end.line {
                return None;
            }
            let from = if line_idx == start.line { start.column } else { 0 };
            let to = if line_idx == end.line {
                end.column
            } else {
                // Selection runs past the line break
                usize::MAX
            };
            Some((from, to))
        });
        lines.push(render_line(&content, selected, tab_size, selection_style));
        numbers.push(Line::from(format!(
            "{:>w$} ",
            line_idx + 1,
            w = gutter_width.saturating_sub(1) as usize
        )));
    }

    if gutter_width > 0 {
        f.render_widget(
            Paragraph::new(numbers).style(Style::default().fg(Color::DarkGray)),
            chunks[0],
        );
    }
    f.render_widget(
        Paragraph::new(lines).scroll((0, scroll_left.min(u16::MAX as usize) as u16)),
        text_area,
    );

    if !app.ui_state.menu.is_open() {
        let x = cursor_x.saturating_sub(scroll_left);
        let y = cursor.line.saturating_sub(scroll_top);
        if x < text_area.width as usize && y < text_area.height as usize {
            f.set_cursor(text_area.x + x as u16, text_area.y + y as u16);
        }
    }
}

/// One text line with tabs expanded and the selected char range styled.
fn render_line(
    content: &str,
    selected: Option<(usize, usize)>,
    tab_size: usize,
    selection_style: Style,
) -> Line<'static> {
    let Some((from, to)) = selected else {
        return Line::from(expand_tabs(content, tab_size));
    };

    let tab_size = tab_size.max(1);
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut marked = String::new();
    let mut at = 0;
    for (i, c) in content.chars().enumerate() {
        let cell = if c == '\t' {
            " ".repeat(tab_size - at % tab_size)
        } else {
            c.to_string()
        };
        at += cell.width();
        if i >= from && i < to {
            if !plain.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut plain)));
            }
            marked.push_str(&cell);
        } else {
            if !marked.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut marked), selection_style));
            }
            plain.push_str(&cell);
        }
    }
    if to > content.chars().count() {
        // Show the selected line break as one highlighted cell
        marked.push(' ');
    }
    if !marked.is_empty() {
        spans.push(Span::styled(marked, selection_style));
    }
    if !plain.is_empty() {
        spans.push(Span::raw(plain));
    }
    Line::from(spans)
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let mut style = Style::default()
        .fg(Theme::color(&theme.status_foreground, Color::White))
        .bg(Theme::color(&theme.status_background, Color::DarkGray));

    if let Some(message) = app.ui_state.status_manager.current() {
        style = match message.message_type {
            MessageType::Error => style.fg(Color::LightRed).add_modifier(Modifier::BOLD),
            MessageType::Warning => style.fg(Color::Yellow),
            MessageType::Success => style.fg(Theme::color(&theme.accent_color, Color::Green)),
            MessageType::Info => style,
        };
    }

    f.render_widget(
        Paragraph::new(format!(" {}", app.status_line())).style(style),
        area,
    );
}

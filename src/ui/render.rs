//! UI renderer implementation for pusher.
//!
//! Draws one browsing session: a bordered listing pane titled with the
//! current relative path (or a task title for pickers), `[*] name/` rows, and
//! a footer bar carrying either the key hints or, while the session is
//! confirming, the yes/no prompt.
//!
//! This module stays pure rendering: it reads the browser state and produces
//! widgets. The only feedback into state is the visible row count, which the
//! browser needs for its scroll window.

use crate::app::browser::BrowserState;
use crate::core::index::Entry;
use crate::core::selection::Mode;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthChar;

/// Renders the entire session UI for one frame.
pub fn render(frame: &mut Frame, browser: &mut BrowserState) {
    let chunks =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(frame.area());
    let list_area = chunks[0];
    let footer_area = chunks[1];

    // Rows inside the border; the browser scrolls against this height.
    let page_rows = list_area.height.saturating_sub(2) as usize;
    browser.set_page_rows(page_rows);
    let inner_width = list_area.width.saturating_sub(2) as usize;

    let title = match browser.title() {
        Some(title) => format!(" {} ", title),
        None => format!(" {} ", browser.current_rel().display()),
    };

    let mut lines: Vec<Line> = Vec::with_capacity(page_rows);
    for (idx, entry) in browser
        .entries()
        .iter()
        .enumerate()
        .skip(browser.offset())
        .take(page_rows)
    {
        let is_cursor = idx == browser.cursor();
        let is_selected = browser.selection().contains(&browser.rel_path_of(entry));
        lines.push(entry_line(
            entry,
            is_cursor,
            is_selected,
            inner_width,
        ));
    }

    let listing = Paragraph::new(lines).block(
        Block::bordered().title(Line::styled(title, Style::default().add_modifier(Modifier::BOLD))),
    );
    frame.render_widget(listing, list_area);

    let footer = Paragraph::new(footer_text(browser)).style(footer_style(browser));
    frame.render_widget(footer, footer_area);
}

/// Builds one listing row: ` [*] name/`, clipped to the pane width and
/// padded out so cursor highlighting covers the full row.
fn entry_line(entry: &Entry, is_cursor: bool, is_selected: bool, width: usize) -> Line<'static> {
    let marker = if is_selected { '*' } else { ' ' };

    let mut display_name = entry.name_str().into_owned();
    if entry.is_dir() && !entry.name_str().ends_with('/') {
        display_name.push('/');
    }

    let mut text = clip_to_width(&format!(" [{}] {}", marker, display_name), width);
    if is_cursor {
        while text.chars().map(|c| c.width().unwrap_or(0)).sum::<usize>() < width {
            text.push(' ');
        }
    }

    let style = match (is_cursor, is_selected) {
        (true, true) => Style::default().fg(Color::Black).bg(Color::Green),
        (true, false) => Style::default().fg(Color::Black).bg(Color::Cyan),
        (false, true) => Style::default().fg(Color::Green),
        (false, false) => Style::default(),
    };
    Line::styled(text, style)
}

fn footer_text(browser: &BrowserState) -> String {
    if browser.is_confirming() {
        return format!(" {} selection? (y/N) ", browser.operation().label());
    }
    match browser.mode() {
        Mode::FileSelection => {
            " [↑/↓] Navigate  [←/→] Out/In  [Space] Select  [Enter] Confirm  [s] Settings  [q] Quit "
                .to_string()
        }
        Mode::DirectoryPicker => {
            " [↑/↓] Navigate  [←/→] Out/In  [Space] Select  [Enter] Confirm  [q] Quit ".to_string()
        }
    }
}

fn footer_style(browser: &BrowserState) -> Style {
    if browser.is_confirming() {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

/// Clips a string to at most `width` terminal columns, never splitting a
/// wide character in half.
fn clip_to_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

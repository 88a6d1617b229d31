//! Terminal setup and the event loop for pusher.
//!
//! Handles raw mode and alternate screen setup/teardown and feeds key events
//! into one browsing session until it ends. The loop is single-threaded and
//! blocks on each input event; every keypress produces at most one redraw.

use crate::app::browser::{BrowserState, KeypressResult};
use crate::ui;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::io;

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user confirmed; the browser holds the result.
    Accepted,
    /// Quit, discarding any pending selection.
    Cancelled,
    /// The user asked for the configuration screens (file selection only).
    Settings,
}

/// Initializes the terminal in raw mode and alternate screen and runs one
/// browsing session to completion.
///
/// Blocks until the session ends. Returns an std::io::Error if terminal
/// setup or teardown fails.
pub fn run_session(browser: &mut BrowserState) -> io::Result<SessionEnd> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, browser);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    result
}

/// Draws the session, blocks for the next event, and dispatches it until the
/// browser reports a terminal result. Resize events just trigger the redraw
/// at the top of the loop.
fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    browser: &mut BrowserState,
) -> io::Result<SessionEnd>
where
    io::Error: From<<B as Backend>::Error>,
{
    loop {
        terminal.draw(|f| ui::render(f, browser))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match browser.handle_keypress(key) {
                    KeypressResult::Quit => return Ok(SessionEnd::Cancelled),
                    KeypressResult::Accepted => return Ok(SessionEnd::Accepted),
                    KeypressResult::OpenSettings => return Ok(SessionEnd::Settings),
                    KeypressResult::Continue => {}
                }
            }
            Event::Resize(_, _) => {}
            _ => {}
        }
    }
}

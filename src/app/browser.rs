//! Browsing session state machine for pusher.
//!
//! [BrowserState] owns everything one interactive session needs: the session
//! root, the current directory relative to it, the listing rows, cursor and
//! scroll offset, the selection set and the session phase. Key events mutate
//! it through [BrowserState::handle_keypress]; rendering only reads it (plus
//! the viewport height fed back via [BrowserState::set_page_rows]), so the
//! transition logic is testable without a terminal.
//!
//! Directory-enter and confirm are deliberately two distinct bindings
//! (`l`/Right enters, Enter confirms) so a highlighted directory never makes
//! confirmation ambiguous.

use crate::core::index::{self, Entry};
use crate::core::selection::{Mode, SelectionSet};
use crate::core::transfer::TransferMode;

use crossterm::event::{KeyCode, KeyEvent};
use std::path::{Path, PathBuf};

/// Enumeration for each individual keypress result processed.
#[derive(Debug, PartialEq, Eq)]
pub enum KeypressResult {
    Continue,
    Quit,
    Accepted,
    OpenSettings,
}

/// Session phase: interactive browsing, or the transient yes/no prompt shown
/// before a file-selection session commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Browsing,
    Confirming,
}

/// State of one interactive browsing session.
///
/// Created once per session, mutated by every input event, dropped when the
/// session ends. The root is fixed for the session's lifetime; all other
/// paths are kept relative to it.
pub struct BrowserState {
    root: PathBuf,
    current: PathBuf,
    entries: Vec<Entry>,
    cursor: usize,
    offset: usize,
    page_rows: usize,
    selection: SelectionSet,
    mode: Mode,
    phase: Phase,
    operation: TransferMode,
    title: Option<String>,
}

impl BrowserState {
    pub fn new(root: PathBuf, mode: Mode, operation: TransferMode) -> Self {
        let mut browser = Self {
            root,
            current: PathBuf::from("."),
            entries: Vec::new(),
            cursor: 0,
            offset: 0,
            page_rows: 0,
            selection: SelectionSet::new(),
            mode,
            phase: Phase::Browsing,
            operation,
            title: None,
        };
        browser.refresh_entries();
        browser
    }

    /// Overrides the pane title (pickers show a task instead of the path).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    // Getters / Accessors

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn current_rel(&self) -> &Path {
        &self.current
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn operation(&self) -> TransferMode {
        self.operation
    }

    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[inline]
    pub fn is_confirming(&self) -> bool {
        self.phase == Phase::Confirming
    }

    /// Relative path a listing row stands for: `.` is the listed directory
    /// itself, `..` its parent, anything else a child.
    pub fn rel_path_of(&self, entry: &Entry) -> PathBuf {
        if entry.is_self_link() {
            self.current.clone()
        } else if entry.is_parent_link() {
            index::parent_rel(&self.current)
        } else {
            index::join_rel(&self.current, entry.name())
        }
    }

    /// Sorted selection, for building a [crate::core::transfer::TransferRequest].
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.selection.snapshot()
    }

    /// The picked directory as an absolute path (picker mode, after accept).
    pub fn picked_dir(&self) -> Option<PathBuf> {
        self.selection
            .single()
            .map(|rel| index::resolve(&self.root, rel))
    }

    /// Feeds the visible row count back from the renderer.
    ///
    /// Keeps the cursor inside the window when the terminal shrinks; for an
    /// unchanged size this is idempotent.
    pub fn set_page_rows(&mut self, rows: usize) {
        self.page_rows = rows;
        if rows == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + rows {
            self.offset = self.cursor + 1 - rows;
        }
    }

    /// Central key handler for the session.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if self.phase == Phase::Confirming {
            return self.handle_confirm_prompt(key);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => KeypressResult::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_up();
                KeypressResult::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_down();
                KeypressResult::Continue
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => {
                self.go_parent();
                KeypressResult::Continue
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.enter_dir();
                KeypressResult::Continue
            }
            KeyCode::Char(' ') => {
                self.toggle_selection();
                KeypressResult::Continue
            }
            KeyCode::Enter => self.confirm(),
            KeyCode::Char('s') if self.mode == Mode::FileSelection => KeypressResult::OpenSettings,
            _ => KeypressResult::Continue,
        }
    }

    /// `y` commits, quit keys cancel the session, anything else resumes
    /// browsing with the selection untouched.
    fn handle_confirm_prompt(&mut self, key: KeyEvent) -> KeypressResult {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => KeypressResult::Accepted,
            KeyCode::Char('q') | KeyCode::Esc => KeypressResult::Quit,
            _ => {
                self.phase = Phase::Browsing;
                KeypressResult::Continue
            }
        }
    }

    /// Moves the cursor up one row, clamping at the top. When the cursor
    /// leaves the window the scroll offset follows by exactly one row.
    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            if self.cursor < self.offset {
                self.offset -= 1;
            }
        }
    }

    /// Moves the cursor down one row, clamping at the bottom of the listing.
    fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            if self.page_rows > 0 && self.cursor >= self.offset + self.page_rows {
                self.offset += 1;
            }
        }
    }

    /// Descends into the highlighted directory. Synthetic rows and files are
    /// no-ops; `..` has its own binding.
    fn enter_dir(&mut self) {
        let Some(entry) = self.entries.get(self.cursor) else {
            return;
        };
        if entry.is_synthetic() || !entry.is_dir() {
            return;
        }

        self.current = index::join_rel(&self.current, entry.name());
        self.reset_listing();
    }

    /// Ascends exactly one level; a no-op at the session root.
    fn go_parent(&mut self) {
        if index::is_root_rel(&self.current) {
            return;
        }
        self.current = index::parent_rel(&self.current);
        self.reset_listing();
    }

    fn reset_listing(&mut self) {
        self.cursor = 0;
        self.offset = 0;
        self.refresh_entries();
    }

    /// Toggles the row under the cursor; a no-op on an empty listing.
    fn toggle_selection(&mut self) {
        if let Some(entry) = self.entries.get(self.cursor) {
            let path = self.rel_path_of(entry);
            self.selection.toggle(self.mode, path, entry);
        }
    }

    /// Confirm action. With nothing selected this is silently ignored; the
    /// picker commits immediately, file selection asks first.
    fn confirm(&mut self) -> KeypressResult {
        if self.selection.is_empty() {
            return KeypressResult::Continue;
        }
        match self.mode {
            Mode::DirectoryPicker => KeypressResult::Accepted,
            Mode::FileSelection => {
                self.phase = Phase::Confirming;
                KeypressResult::Continue
            }
        }
    }

    /// Re-lists the current directory from disk, clamping cursor and offset
    /// into the new listing.
    fn refresh_entries(&mut self) {
        self.entries = index::list(&self.root, &self.current);
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
        self.offset = self.offset.min(self.cursor);
    }
}

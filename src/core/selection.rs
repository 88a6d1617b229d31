//! Selection state for pusher.
//!
//! A [SelectionSet] maps relative paths to "marked", independent of where the
//! cursor currently is; markers survive navigating anywhere in the tree and
//! live only for one browsing session. The [Mode] decides the toggle
//! semantics: multi-select for file selection, replace-with-one for the
//! directory picker.

use crate::core::index::Entry;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// How a browsing session interprets selection and confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Multi-select of arbitrary files and directories; confirming yields the
    /// whole marked list.
    FileSelection,
    /// Single directory pick; confirming yields one absolute path.
    DirectoryPicker,
}

/// Set of marked relative paths for one browsing session.
///
/// Paths enter and leave the set only through [SelectionSet::toggle]; plain
/// navigation never changes it.
#[derive(Debug, Default)]
pub struct SelectionSet {
    paths: HashSet<PathBuf>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles `path` according to `mode`.
    ///
    /// The parent row `..` is never selectable. In [Mode::DirectoryPicker]
    /// only directories can be picked, and picking replaces the previous
    /// choice. In [Mode::FileSelection] any other row toggles on and off;
    /// toggling `.` marks the listed directory itself as one unit, it does
    /// not expand into its children.
    pub fn toggle(&mut self, mode: Mode, path: PathBuf, entry: &Entry) {
        if entry.is_parent_link() {
            return;
        }

        match mode {
            Mode::DirectoryPicker => {
                if entry.is_dir() {
                    self.paths.clear();
                    self.paths.insert(path);
                }
            }
            Mode::FileSelection => {
                if !self.paths.remove(&path) {
                    self.paths.insert(path);
                }
            }
        }
    }

    #[inline]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The single selected path, if exactly one is marked.
    pub fn single(&self) -> Option<&Path> {
        if self.paths.len() == 1 {
            self.paths.iter().next().map(PathBuf::as_path)
        } else {
            None
        }
    }

    /// Realizes the set as a sorted vector.
    ///
    /// The order carries no meaning for consumers; sorting just makes the
    /// transfer argument list deterministic.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.paths.iter().cloned().collect();
        paths.sort();
        paths
    }
}

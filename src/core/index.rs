//! Directory listing and relative path handling for pusher.
//!
//! Provides the [Entry] struct representing one row of a directory listing,
//! including the synthetic `.` and `..` rows, and the [list] function that
//! produces the rows for one directory resolved against a session root.
//!
//! All browsing state is keyed by paths relative to the session root; the
//! helpers here ([join_rel], [parent_rel], [resolve], [is_root_rel]) keep
//! those paths normalized: no trailing separators, `.` stands for the root.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents a single row in a directory listing.
///
/// Holds the entry name and attribute flags. Besides real children, every
/// listing contains the synthetic `.` (the directory itself, selectable as a
/// unit) and, below the root, `..` (navigation only, never selectable).
#[derive(Debug, Clone)]
pub struct Entry {
    name: Box<OsStr>,
    flags: u8,
}

impl Entry {
    // Flag bit definitions
    pub(crate) const IS_DIR: u8 = 1 << 0;
    pub(crate) const IS_SELF: u8 = 1 << 1;
    pub(crate) const IS_PARENT: u8 = 1 << 2;

    pub fn new(name: OsString, flags: u8) -> Self {
        Entry {
            name: name.into_boxed_os_str(),
            flags,
        }
    }

    fn self_link() -> Self {
        Entry::new(OsString::from("."), Self::IS_DIR | Self::IS_SELF)
    }

    fn parent_link() -> Self {
        Entry::new(OsString::from(".."), Self::IS_DIR | Self::IS_PARENT)
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> std::borrow::Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags & Self::IS_DIR != 0
    }

    #[inline]
    pub fn is_self_link(&self) -> bool {
        self.flags & Self::IS_SELF != 0
    }

    #[inline]
    pub fn is_parent_link(&self) -> bool {
        self.flags & Self::IS_PARENT != 0
    }

    /// `true` for the `.` and `..` rows, which never resolve to a child.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.flags & (Self::IS_SELF | Self::IS_PARENT) != 0
    }
}

/// Lists the rows for `rel` (relative to `root`): `..` first when below the
/// root, then `.`, then the immediate children sorted by name.
///
/// The sort is plain lexical and case-sensitive. Symlinks pointing at
/// directories are treated as directories so they stay navigable.
///
/// A listing that cannot be read (permissions, directory removed between
/// navigations) yields an empty vector; the browser stays usable. The listing
/// is recomputed in full on every navigation, so external changes to the tree
/// show up on the next directory change without any cache invalidation.
pub fn list(root: &Path, rel: &Path) -> Vec<Entry> {
    let dir = resolve(root, rel);

    let read = match fs::read_dir(&dir) {
        Ok(read) => read,
        Err(_) => return Vec::new(),
    };

    let mut children: Vec<(OsString, bool)> = Vec::with_capacity(64);
    for entry in read {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let ft = match entry.file_type() {
            Ok(ft) => ft,
            Err(_) => continue,
        };

        let is_dir = if ft.is_symlink() {
            fs::metadata(entry.path()).map(|md| md.is_dir()).unwrap_or(false)
        } else {
            ft.is_dir()
        };
        children.push((entry.file_name(), is_dir));
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));

    let mut entries = Vec::with_capacity(children.len() + 2);
    if !is_root_rel(rel) {
        entries.push(Entry::parent_link());
    }
    entries.push(Entry::self_link());
    entries.extend(children.into_iter().map(|(name, is_dir)| {
        let flags = if is_dir { Entry::IS_DIR } else { 0 };
        Entry::new(name, flags)
    }));
    entries
}

/// `true` when `rel` denotes the session root itself.
#[inline]
pub fn is_root_rel(rel: &Path) -> bool {
    rel == Path::new(".")
}

/// Resolves a relative path against its root to an absolute path.
pub fn resolve(root: &Path, rel: &Path) -> PathBuf {
    if is_root_rel(rel) {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}

/// Joins a child name onto a relative directory, keeping the result
/// normalized (no leading `./` component).
pub fn join_rel(current: &Path, name: &OsStr) -> PathBuf {
    if is_root_rel(current) {
        PathBuf::from(name)
    } else {
        current.join(name)
    }
}

/// One level up from `current`; the parent of a single component is `.`.
pub fn parent_rel(current: &Path) -> PathBuf {
    match current.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

//! Core runtime logic for pusher.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [index]: directory listing rows and relative path handling (see [list], [Entry]).
//! - [selection]: the per-session set of marked relative paths.
//! - [transfer]: the rsync/symlink transfer engine and empty-directory prune.
//! - [terminal]: terminal setup/teardown and the crossterm/ratatui event loop.

pub mod index;
pub mod selection;
pub mod terminal;
pub mod transfer;

pub use index::{Entry, list};
pub use selection::{Mode, SelectionSet};
pub use terminal::{SessionEnd, run_session};
pub use transfer::{TransferMode, TransferReport, TransferRequest, execute};

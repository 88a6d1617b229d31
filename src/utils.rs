//! Utility helpers for pusher.

pub mod cli;

use std::path::PathBuf;

/// The user's home directory, if one can be determined.
pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

//! The configuration collaborator for pusher.
//!
//! A small durable key-value store backed by a JSON file, holding the two
//! roots the application works between: `source_dir` and `dest_dir`. The
//! browsing and transfer code never touches this store directly; it only
//! consumes the resolved absolute paths.
//!
//! A missing or corrupt file falls back to defaults so a first run lands in
//! the configuration flow instead of failing.

use serde::{Deserialize, Serialize};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persisted configuration: the source and destination roots, both optional
/// until the user has picked them.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    source_dir: Option<PathBuf>,
    dest_dir: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the default path, falling back to defaults
    /// when the file is missing or unparsable.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
        {
            Some(config) => config,
            None => Config::default(),
        }
    }

    /// Writes the configuration to the default path, creating parent
    /// directories as needed.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, content)
    }

    // Getters / Setters

    #[inline]
    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    #[inline]
    pub fn dest_dir(&self) -> Option<&Path> {
        self.dest_dir.as_deref()
    }

    pub fn set_source_dir(&mut self, path: PathBuf) {
        self.source_dir = Some(path);
    }

    pub fn set_dest_dir(&mut self, path: PathBuf) {
        self.dest_dir = Some(path);
    }

    /// Determine the configuration file path.
    /// Checks the PUSHER_CONFIG environment variable first,
    /// checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/pusher/config.json.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("PUSHER_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("pusher/config.json");
        }

        if let Some(home) = crate::utils::get_home() {
            return home.join(".config/pusher/config.json");
        }
        PathBuf::from("pusher.json")
    }
}

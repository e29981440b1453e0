//! Configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command_log::DEFAULT_TAG;

/// Default command log location, relative to the home directory.
pub const DEFAULT_LOG_FILE: &str = "~/.claude_command_log.txt";

/// Default Claude Code projects directory.
pub const DEFAULT_PROJECTS_DIR: &str = "~/.claude/projects";

/// Configuration for the command monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Base directory holding per-project session folders.
    pub projects_dir: PathBuf,
    /// Command log destination.
    pub log_file: PathBuf,
    /// Only watch project folders whose name contains this fragment.
    pub project_filter: Option<String>,
    /// Tag written after the `###` delimiter.
    pub tag: String,
    /// Debounce window for filesystem events, in milliseconds.
    pub debounce_ms: u64,
    /// Mark existing session content as seen instead of logging it.
    pub skip_existing: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from(DEFAULT_PROJECTS_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            project_filter: None,
            tag: DEFAULT_TAG.to_string(),
            debounce_ms: 100,
            skip_existing: false,
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Copy of this config with `~` expanded in every path.
    #[must_use]
    pub fn expanded(mut self) -> Self {
        self.projects_dir = expand_tilde(&self.projects_dir);
        self.log_file = expand_tilde(&self.log_file);
        self
    }
}

/// Expand a leading `~` to the home directory.
///
/// Paths without a leading `~`, or when the home directory is unknown, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

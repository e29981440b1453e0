//! Watcher error types.

use std::path::PathBuf;

/// Errors that can occur while reading or watching session files.
#[derive(thiserror::Error, Debug)]
pub enum WatcherError {
    /// Session file disappeared before it could be read.
    #[error("Session file deleted: {0}")]
    FileDeleted(PathBuf),

    /// Permission denied accessing file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Project filter is not a valid glob fragment.
    #[error("Invalid project filter {filter:?}: {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: glob::PatternError,
    },

    /// Notify watcher error.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatcherError {
    /// Classify an error returned while opening `path`.
    pub(crate) fn from_open(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileDeleted(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }
}

/// A session log line that could not be parsed as JSON.
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("Malformed JSONL record: {0}")]
    Malformed(#[from] serde_json::Error),
}

//! Command log error types.

use std::path::PathBuf;

/// Errors that can occur while appending to the command log.
#[derive(thiserror::Error, Debug)]
pub enum LogError {
    /// Failed to create the directory holding the log.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or write the log file.
    #[error("Failed to write command log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

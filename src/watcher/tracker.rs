//! Per-file line offset tracking.
//!
//! Remembers how many lines of each session file have already been handed
//! out, so every line is evaluated at most once per process lifetime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};

use super::error::WatcherError;

/// Read position for one session file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FileState {
    /// Complete lines consumed so far.
    lines: usize,
    /// Byte offset just past the last consumed line.
    offset: u64,
}

/// In-memory line offsets for every session file seen so far.
///
/// State lives only as long as the process; a restart starts every file
/// from its first line again.
#[derive(Debug, Default)]
pub struct LineTracker {
    files: HashMap<PathBuf, FileState>,
}

impl LineTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines of `path` already consumed (zero if unseen).
    #[must_use]
    pub fn consumed(&self, path: &Path) -> usize {
        self.files.get(path).map_or(0, |s| s.lines)
    }

    /// Number of files being tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Drop the state for `path`, so the next read starts from line one.
    pub fn forget(&mut self, path: &Path) {
        self.files.remove(path);
    }

    /// Read the complete lines appended to `path` since the last call.
    ///
    /// A trailing line without a newline is still being written and is left
    /// for the next pass. Line terminators are stripped.
    ///
    /// If the file shrank below the consumed offset it was truncated or
    /// replaced, and reading restarts from the beginning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read. The consumed
    /// count is left untouched in that case.
    pub async fn read_new_lines(&mut self, path: &Path) -> Result<Vec<String>, WatcherError> {
        let mut file = File::open(path)
            .await
            .map_err(|e| WatcherError::from_open(path, e))?;

        let file_len = file.metadata().await?.len();
        let mut state = self.files.get(path).copied().unwrap_or_default();

        if file_len < state.offset {
            tracing::warn!(
                path = %path.display(),
                old_offset = state.offset,
                new_len = file_len,
                "Session file truncated, rereading from the start"
            );
            state = FileState::default();
        }

        if file_len == state.offset {
            self.files.insert(path.to_path_buf(), state);
            return Ok(Vec::new());
        }

        file.seek(std::io::SeekFrom::Start(state.offset)).await?;
        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;

            if bytes_read == 0 || buf.last() != Some(&b'\n') {
                break;
            }

            state.offset += bytes_read as u64;
            state.lines += 1;

            let text = String::from_utf8_lossy(&buf);
            lines.push(text.trim_end_matches(['\n', '\r']).to_string());
        }

        tracing::trace!(
            path = %path.display(),
            new_lines = lines.len(),
            consumed = state.lines,
            "Read session file"
        );

        self.files.insert(path.to_path_buf(), state);
        Ok(lines)
    }

    /// Mark everything currently in `path` as consumed without returning it.
    ///
    /// Returns the number of lines skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub async fn seed(&mut self, path: &Path) -> Result<usize, WatcherError> {
        self.read_new_lines(path).await.map(|lines| lines.len())
    }
}

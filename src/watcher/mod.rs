//! Watcher module for Claude Code conversation files.
//!
//! Locates session files, reads only what was appended since the last pass,
//! and extracts the Bash invocations they record.

mod discovery;
mod dispatcher;
mod error;
mod jsonl;
mod tracker;

pub use discovery::{
    default_projects_dir, find_session_files, is_session_file, resolve_watch_dirs,
    SESSION_FILE_SUFFIX,
};
pub use dispatcher::{ChangeDispatcher, WatcherEvent};
pub use error::{RecordError, WatcherError};
pub use jsonl::*;
pub use tracker::LineTracker;

//! Command log output.
//!
//! Formats Bash invocations into single text lines and appends them to the
//! flat command log file.

mod error;
mod formatter;
mod writer;

pub use error::LogError;
pub use formatter::{format_timestamp, short_session_id, LogFormatter, DEFAULT_TAG, DELIMITER};
pub use writer::CommandLog;

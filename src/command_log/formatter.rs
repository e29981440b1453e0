//! Command log line formatting.
//!
//! Every logged command becomes one line:
//!
//! ```text
//! <command> ### [TAG] [<description> ]<YYYYMMDD HH:MM>[ <cwd>][ session:<id8>]
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::watcher::BashInvocation;

/// Default tag placed after the delimiter.
pub const DEFAULT_TAG: &str = "CLAUDE";

/// Separator between the command and its metadata.
pub const DELIMITER: &str = "###";

/// Output pattern for timestamps.
const TIME_FORMAT: &str = "%Y%m%d %H:%M";

/// Number of session id characters kept in the log.
const SESSION_ID_LEN: usize = 8;

/// Naive layouts accepted when the timestamp carries no offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Turns extracted invocations into command log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormatter {
    tag: String,
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl LogFormatter {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Format `invocation`, stamping the current local time if it has no
    /// timestamp of its own.
    #[must_use]
    pub fn format(&self, invocation: &BashInvocation) -> String {
        self.format_at(invocation, &Local::now())
    }

    /// Format `invocation`, using `now` when it has no timestamp.
    #[must_use]
    pub fn format_at(&self, invocation: &BashInvocation, now: &DateTime<Local>) -> String {
        let mut line = format!("{} {DELIMITER} [{}]", invocation.command, self.tag);

        if !invocation.description.is_empty() {
            line.push(' ');
            line.push_str(&invocation.description);
        }

        line.push(' ');
        if invocation.timestamp.is_empty() {
            line.push_str(&now.format(TIME_FORMAT).to_string());
        } else {
            line.push_str(
                &format_timestamp(&invocation.timestamp)
                    .unwrap_or_else(|| invocation.timestamp.clone()),
            );
        }

        if !invocation.cwd.is_empty() {
            line.push(' ');
            line.push_str(&invocation.cwd);
        }

        if !invocation.session_id.is_empty() {
            line.push_str(" session:");
            line.push_str(&short_session_id(&invocation.session_id));
        }

        line
    }
}

/// Reformat an ISO-8601 timestamp as `YYYYMMDD HH:MM`.
///
/// Offset-aware values keep their own offset (`Z` is UTC); naive values are
/// printed as written. Returns `None` if the string is not recognised.
#[must_use]
pub fn format_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format(TIME_FORMAT).to_string());
    }

    let with_offset = raw
        .strip_suffix('Z')
        .map_or_else(|| raw.to_string(), |s| format!("{s}+00:00"));
    for layout in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, layout) {
            return Some(dt.format(TIME_FORMAT).to_string());
        }
    }

    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
    {
        return Some(dt.format(TIME_FORMAT).to_string());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.format(TIME_FORMAT).to_string())
}

/// First eight characters of a session id.
#[must_use]
pub fn short_session_id(session_id: &str) -> String {
    session_id.chars().take(SESSION_ID_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn invocation(command: &str) -> BashInvocation {
        BashInvocation {
            command: command.to_string(),
            ..BashInvocation::default()
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_format_full_line() {
        let inv = BashInvocation {
            command: "ls -la".to_string(),
            description: "list files".to_string(),
            timestamp: "2024-03-15T10:30:00Z".to_string(),
            cwd: "/home/user".to_string(),
            session_id: "abcdef1234567890".to_string(),
        };

        assert_eq!(
            LogFormatter::default().format(&inv),
            "ls -la ### [CLAUDE] list files 20240315 10:30 /home/user session:abcdef12"
        );
    }

    #[test]
    fn test_format_omits_empty_segments() {
        let inv = BashInvocation {
            timestamp: "2024-03-15T10:30:00Z".to_string(),
            ..invocation("git status")
        };

        assert_eq!(
            LogFormatter::default().format(&inv),
            "git status ### [CLAUDE] 20240315 10:30"
        );
    }

    #[test]
    fn test_format_missing_timestamp_uses_now() {
        let line = LogFormatter::default().format_at(&invocation("pwd"), &fixed_now());
        assert_eq!(line, "pwd ### [CLAUDE] 20250102 03:04");
    }

    #[test]
    fn test_format_unparseable_timestamp_kept_verbatim() {
        let inv = BashInvocation {
            timestamp: "yesterday-ish".to_string(),
            ..invocation("make")
        };
        assert_eq!(
            LogFormatter::default().format(&inv),
            "make ### [CLAUDE] yesterday-ish"
        );
    }

    #[test]
    fn test_format_command_verbatim_with_delimiter() {
        let inv = BashInvocation {
            timestamp: "2024-03-15T10:30:00Z".to_string(),
            ..invocation("echo '### [CLAUDE]' && \\\n  true")
        };
        let line = LogFormatter::default().format(&inv);
        assert!(line.starts_with("echo '### [CLAUDE]' && \\\n  true ### [CLAUDE] "));
    }

    #[test]
    fn test_format_custom_tag() {
        let inv = BashInvocation {
            timestamp: "2024-03-15T10:30:00Z".to_string(),
            ..invocation("ls")
        };
        let formatter = LogFormatter::new("AGENT");
        assert_eq!(formatter.tag(), "AGENT");
        assert_eq!(formatter.format(&inv), "ls ### [AGENT] 20240315 10:30");
    }

    #[test]
    fn test_format_timestamp_variants() {
        assert_eq!(
            format_timestamp("2024-03-15T10:30:00Z").as_deref(),
            Some("20240315 10:30")
        );
        assert_eq!(
            format_timestamp("2024-03-15T10:30:00.123Z").as_deref(),
            Some("20240315 10:30")
        );
        // Keeps its own offset rather than converting
        assert_eq!(
            format_timestamp("2024-03-15T10:30:00+05:30").as_deref(),
            Some("20240315 10:30")
        );
        assert_eq!(
            format_timestamp("2024-03-15T23:59Z").as_deref(),
            Some("20240315 23:59")
        );
        assert_eq!(
            format_timestamp("2024-03-15T08:05:09").as_deref(),
            Some("20240315 08:05")
        );
        assert_eq!(
            format_timestamp("2024-03-15").as_deref(),
            Some("20240315 00:00")
        );
        assert_eq!(format_timestamp("15/03/2024"), None);
        assert_eq!(format_timestamp(""), None);
    }

    #[test]
    fn test_short_session_id() {
        assert_eq!(short_session_id("abcdef1234567890"), "abcdef12");
        assert_eq!(short_session_id("abc"), "abc");
        assert_eq!(short_session_id("ééééééééé"), "éééééééé");
    }
}

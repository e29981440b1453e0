//! Bash invocation extraction from Claude Code conversation files.
//!
//! Session files under `~/.claude/projects/<hash>/*.jsonl` hold one JSON
//! object per line. Assistant entries carry a `message.content` array whose
//! `tool_use` blocks describe tool calls; the ones named `Bash` are the shell
//! commands we record.

use serde_json::Value;

use super::error::RecordError;

/// Entry `type` for assistant-authored turns.
pub const ASSISTANT_ENTRY_TYPE: &str = "assistant";

/// Content block `type` for tool calls.
pub const TOOL_USE_BLOCK_TYPE: &str = "tool_use";

/// Tool name Claude Code uses for shell execution.
pub const BASH_TOOL_NAME: &str = "Bash";

/// A single Bash tool call pulled out of an assistant entry.
///
/// Missing or non-string fields are carried as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BashInvocation {
    /// The shell command, verbatim.
    pub command: String,
    /// Free-text description supplied alongside the command.
    pub description: String,
    /// ISO-8601 timestamp of the assistant entry.
    pub timestamp: String,
    /// Working directory of the session.
    pub cwd: String,
    /// Conversation identifier.
    pub session_id: String,
}

/// Extract every Bash invocation from one JSONL line, in content order.
///
/// Lines that are valid JSON but not qualifying assistant entries yield an
/// empty list.
///
/// # Errors
///
/// Returns [`RecordError::Malformed`] if the line is not valid JSON.
pub fn extract_invocations(line: &str) -> Result<Vec<BashInvocation>, RecordError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let entry: Value = serde_json::from_str(trimmed)?;
    Ok(invocations_from_entry(&entry))
}

/// Extract Bash invocations from an already-parsed entry.
#[must_use]
pub fn invocations_from_entry(entry: &Value) -> Vec<BashInvocation> {
    if entry.get("type").and_then(Value::as_str) != Some(ASSISTANT_ENTRY_TYPE) {
        return Vec::new();
    }

    let Some(blocks) = entry
        .get("message")
        .filter(|m| m.is_object())
        .and_then(|m| m.get("content"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    blocks
        .iter()
        .filter(|block| is_bash_tool_use(block))
        .map(|block| {
            let input = block.get("input");
            BashInvocation {
                command: string_field(input, "command"),
                description: string_field(input, "description"),
                timestamp: string_field(Some(entry), "timestamp"),
                cwd: string_field(Some(entry), "cwd"),
                session_id: string_field(Some(entry), "sessionId"),
            }
        })
        .collect()
}

fn is_bash_tool_use(block: &Value) -> bool {
    block.get("type").and_then(Value::as_str) == Some(TOOL_USE_BLOCK_TYPE)
        && block.get("name").and_then(Value::as_str) == Some(BASH_TOOL_NAME)
}

fn string_field(value: Option<&Value>, key: &str) -> String {
    value
        .and_then(|v| v.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

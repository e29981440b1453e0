//! Colored CLI display utilities for monitor output.
//!
//! Console text meant for the operator goes through here; diagnostics go
//! through `tracing`.

use std::io::{self, Write};
use std::path::Path;

use owo_colors::OwoColorize;

/// How much of a command is echoed to the console.
const COMMAND_PREVIEW_LEN: usize = 50;

/// Cut a string to at most `max_chars` characters.
#[must_use]
pub fn preview(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Print a directory subscription.
pub fn print_watching(dir: &Path) {
    println!("{} {}", "Watching:".cyan().bold(), dir.display());
    let _ = io::stdout().flush();
}

/// Print the start of the initial scan.
pub fn print_scan_start() {
    println!("{}", "Processing existing files...".dimmed());
    let _ = io::stdout().flush();
}

/// Print the end of the initial scan.
pub fn print_scan_done(files: usize, logged: usize) {
    println!(
        "{} {files} files, {logged} commands logged",
        "Scan complete:".dimmed()
    );
    let _ = io::stdout().flush();
}

/// Print that live monitoring has begun.
pub fn print_monitoring_started(log_file: &Path) {
    println!(
        "{} Logging to {}",
        "Monitoring started.".green().bold(),
        log_file.display()
    );
    println!("{}", "Press Ctrl+C to stop...".dimmed());
    let _ = io::stdout().flush();
}

/// Print that monitoring stopped.
pub fn print_monitoring_stopped() {
    println!("\n{}", "Monitoring stopped.".yellow().bold());
    let _ = io::stdout().flush();
}

/// Print a freshly logged command.
pub fn print_logged(command: &str) {
    println!(
        "{} {}...",
        "Logged:".green(),
        preview(command, COMMAND_PREVIEW_LEN)
    );
    let _ = io::stdout().flush();
}

/// Print a startup failure.
pub fn print_error(message: &str) {
    println!("{} {}", "[ERROR]".red().bold(), message);
    let _ = io::stdout().flush();
}

/// Print a non-fatal processing failure on stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_string() {
        assert_eq!(preview("ls -la", 50), "ls -la");
    }

    #[test]
    fn test_preview_exact_length() {
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn test_preview_long_string() {
        assert_eq!(preview("hello world", 5), "hello");
    }

    #[test]
    fn test_preview_multibyte() {
        assert_eq!(preview("héllo wörld", 7), "héllo w");
        assert_eq!(preview("日本語のコマンド", 3), "日本語");
    }

    #[test]
    fn test_preview_zero() {
        assert_eq!(preview("anything", 0), "");
    }
}

//! Command monitor: the per-file processing routine and its event loop.
//!
//! A single [`CommandMonitor`] owns the line tracker and the command log.
//! It is driven first by the initial scan and then by the dispatcher's
//! event queue, one file at a time.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::command_log::{CommandLog, LogFormatter};
use crate::config::MonitorConfig;
use crate::display;
use crate::watcher::{extract_invocations, find_session_files, LineTracker, WatcherError, WatcherEvent};

/// Outcome of one pass over a session file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileReport {
    /// New lines read.
    pub lines: usize,
    /// Commands appended to the log.
    pub logged: usize,
    /// Lines that were not valid JSON.
    pub malformed: usize,
    /// Commands that could not be written.
    pub failed: usize,
}

/// Outcome of the initial scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Session files visited.
    pub files: usize,
    /// Commands appended to the log.
    pub logged: usize,
    /// Files whose pass was abandoned.
    pub errors: usize,
}

/// Reads session files and records their Bash invocations.
#[derive(Debug)]
pub struct CommandMonitor {
    tracker: LineTracker,
    formatter: LogFormatter,
    log: CommandLog,
    skip_existing: bool,
}

impl CommandMonitor {
    #[must_use]
    pub fn new(log: CommandLog, formatter: LogFormatter) -> Self {
        Self {
            tracker: LineTracker::new(),
            formatter,
            log,
            skip_existing: false,
        }
    }

    /// Build a monitor from an already-expanded config.
    #[must_use]
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            CommandLog::new(config.log_file.clone()),
            LogFormatter::new(config.tag.clone()),
        )
        .with_skip_existing(config.skip_existing)
    }

    /// Seed existing files during the initial scan instead of logging them.
    #[must_use]
    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    #[must_use]
    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    #[must_use]
    pub fn tracker(&self) -> &LineTracker {
        &self.tracker
    }

    /// Process the lines appended to `path` since the last pass.
    ///
    /// Malformed lines are skipped. A command that cannot be written is
    /// reported and dropped; its line still counts as consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read. Nothing is
    /// consumed in that case.
    pub async fn process_file(&mut self, path: &Path) -> Result<FileReport, WatcherError> {
        let lines = self.tracker.read_new_lines(path).await?;
        let mut report = FileReport {
            lines: lines.len(),
            ..FileReport::default()
        };

        for line in &lines {
            let invocations = match extract_invocations(line) {
                Ok(invocations) => invocations,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping malformed line");
                    report.malformed += 1;
                    continue;
                }
            };

            for invocation in invocations {
                let entry = self.formatter.format(&invocation);
                match self.log.append(&entry).await {
                    Ok(()) => {
                        report.logged += 1;
                        display::print_logged(&invocation.command);
                    }
                    Err(e) => {
                        tracing::error!(
                            path = %path.display(),
                            error = %e,
                            "Failed to record command"
                        );
                        display::print_warning(&format!(
                            "Error processing {}: {e}",
                            path.display()
                        ));
                        report.failed += 1;
                    }
                }
            }
        }

        if report.lines > 0 {
            tracing::debug!(
                path = %path.display(),
                lines = report.lines,
                logged = report.logged,
                malformed = report.malformed,
                failed = report.failed,
                "Processed session file"
            );
        }

        Ok(report)
    }

    /// Process every session file that already exists under `dirs`.
    ///
    /// With `skip_existing` set, files are only marked as read. A file that
    /// cannot be read is reported and the scan moves on.
    pub async fn bootstrap(&mut self, dirs: &[PathBuf]) -> ScanReport {
        let mut report = ScanReport::default();

        for dir in dirs {
            for file in find_session_files(dir) {
                report.files += 1;
                let result = if self.skip_existing {
                    self.tracker.seed(&file).await.map(|_| 0)
                } else {
                    self.process_file(&file).await.map(|r| r.logged)
                };
                match result {
                    Ok(logged) => report.logged += logged,
                    Err(e) => {
                        report.errors += 1;
                        Self::report_failure(&file, &e);
                    }
                }
            }
        }

        tracing::info!(
            files = report.files,
            logged = report.logged,
            errors = report.errors,
            "Initial scan complete"
        );
        report
    }

    /// Apply one dispatcher event.
    pub async fn handle_event(&mut self, event: WatcherEvent) {
        match event {
            WatcherEvent::Changed(path) => {
                if let Err(e) = self.process_file(&path).await {
                    Self::report_failure(&path, &e);
                }
            }
            WatcherEvent::Removed(path) => {
                tracing::debug!(path = %path.display(), "Session file removed");
                self.tracker.forget(&path);
            }
            WatcherEvent::Error(e) => {
                tracing::warn!(error = %e, "File watcher error");
                display::print_warning(&e.to_string());
            }
        }
    }

    /// Consume dispatcher events until `cancel` fires or the channel closes.
    pub async fn run(
        &mut self,
        mut events: mpsc::UnboundedReceiver<WatcherEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Monitor cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        tracing::debug!("Event channel closed");
                        break;
                    }
                },
            }
        }
    }

    fn report_failure(path: &Path, err: &WatcherError) {
        tracing::warn!(path = %path.display(), error = %err, "Abandoning pass over session file");
        display::print_warning(&format!("Error processing {}: {err}", path.display()));
    }
}

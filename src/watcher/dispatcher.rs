//! Filesystem change dispatch with notify integration.
//!
//! Subscribes to one or more project directories and turns raw notify
//! events into a queue of session file paths for a single consumer.

use std::path::PathBuf;
use std::time::Duration;

use notify_debouncer_full::{
    new_debouncer,
    notify::{self, EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, DebouncedEvent, Debouncer, RecommendedCache,
};
use tokio::sync::mpsc;

use super::discovery::is_session_file;
use super::error::WatcherError;

/// Events emitted by the dispatcher.
#[derive(Debug)]
pub enum WatcherEvent {
    /// A session file was created or modified.
    Changed(PathBuf),
    /// A session file was removed.
    Removed(PathBuf),
    /// The underlying watcher reported an error.
    Error(WatcherError),
}

/// Watches project directories recursively for session file changes.
///
/// Uses notify-debouncer-full and forwards events to a tokio mpsc channel.
/// Dropping the dispatcher tears down every subscription and closes the
/// channel.
pub struct ChangeDispatcher {
    dirs: Vec<PathBuf>,
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl ChangeDispatcher {
    /// Start watching `dirs` recursively.
    ///
    /// Returns the dispatcher and a receiver for watcher events.
    ///
    /// # Errors
    ///
    /// Returns an error if the watcher cannot be created or a directory
    /// cannot be subscribed.
    pub fn start(
        dirs: Vec<PathBuf>,
        debounce: Duration,
    ) -> Result<(Self, mpsc::UnboundedReceiver<WatcherEvent>), WatcherError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            Self::forward(result, &event_tx);
        })?;

        for dir in &dirs {
            debouncer.watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!(dir = %dir.display(), "Subscribed to directory");
        }

        Ok((Self { dirs, debouncer }, event_rx))
    }

    /// Translate a debounced batch into dispatcher events.
    fn forward(result: DebounceEventResult, event_tx: &mpsc::UnboundedSender<WatcherEvent>) {
        match result {
            Ok(events) => {
                for event in classify(&events) {
                    if event_tx.send(event).is_err() {
                        tracing::trace!("Event receiver dropped");
                        return;
                    }
                }
            }
            Err(errors) => {
                for error in errors {
                    let _ = event_tx.send(WatcherEvent::Error(WatcherError::Notify(error)));
                }
            }
        }
    }

    /// Directories being watched.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Stop watching and release every subscription.
    pub fn stop(self) {
        self.debouncer.stop();
    }
}

/// Map raw events to session file events, one per path per batch.
fn classify(events: &[DebouncedEvent]) -> Vec<WatcherEvent> {
    let mut out: Vec<WatcherEvent> = Vec::new();

    for event in events {
        let removed = match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => false,
            EventKind::Remove(_) => true,
            _ => continue,
        };

        for path in &event.paths {
            if !is_session_file(path) || (!removed && path.is_dir()) {
                continue;
            }
            let already = out.iter().any(|e| match e {
                WatcherEvent::Changed(p) => !removed && p == path,
                WatcherEvent::Removed(p) => removed && p == path,
                WatcherEvent::Error(_) => false,
            });
            if already {
                continue;
            }
            out.push(if removed {
                WatcherEvent::Removed(path.clone())
            } else {
                WatcherEvent::Changed(path.clone())
            });
        }
    }

    out
}

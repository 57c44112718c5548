//! Registry watcher for development mode.
//!
//! Watches the registry document and reports debounced change events so
//! the CLI can regenerate the target automatically.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Event types for registry changes.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The registry document was modified.
    Modified(PathBuf),
    /// The registry document was deleted.
    Deleted(PathBuf),
    /// An error occurred.
    Error(String),
}

/// Watcher for a single registry document.
pub struct RegistryWatcher {
    /// The registry file to watch.
    path: PathBuf,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl RegistryWatcher {
    /// Create a new watcher for the given registry file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            debounce_ms: 500,
        }
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Start watching for changes to the registry document.
    ///
    /// Returns a receiver that yields watch events. The debouncer must be
    /// kept alive for events to keep flowing.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();

        let registry_path = self.path.clone();
        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        let path = event.path;

                        // The parent directory is watched; only the
                        // registry document itself is interesting.
                        if path.file_name() != registry_path.file_name() {
                            continue;
                        }

                        let watch_event = if path.exists() {
                            WatchEvent::Modified(path)
                        } else {
                            WatchEvent::Deleted(path)
                        };

                        let _ = tx.send(watch_event);
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        // Watch the containing directory: editors typically replace the
        // file rather than writing it in place.
        let watch_root = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        debouncer
            .watcher()
            .watch(watch_root, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Init(e.to_string()))?;

        Ok((debouncer, rx))
    }

    /// Get the registry file being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

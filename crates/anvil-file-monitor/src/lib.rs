//! Classified file-change events and the dirty-file pull contract.
//!
//! # Ownership / layering
//!
//! This crate intentionally owns *no* operating-system integration. An OS
//! watcher backend (or a test harness) classifies raw filesystem activity
//! into [`FileEvent`]s and records them into a [`DirtyFileLog`]; consumers
//! such as the POM graph manager pull batches of dirty paths through the
//! [`FileMonitor`] trait. Each consumer has its own high-water mark, so two
//! consumers pulling from the same log never steal each other's changes.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use parking_lot::Mutex;

/// The classified operation a file event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOperation {
    Created,
    Updated,
    Renamed,
    Deleted,
    MonitoringStart,
    MonitoringFinish,
}

impl FileOperation {
    /// Whether this operation dirties the file's content for consumers.
    ///
    /// Monitoring lifecycle events describe the watcher, not the file.
    pub fn is_content_change(self) -> bool {
        !matches!(self, Self::MonitoringStart | Self::MonitoringFinish)
    }
}

/// A change event for a single path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEvent {
    pub path: PathBuf,
    pub operation: FileOperation,
}

impl FileEvent {
    pub fn new(path: impl Into<PathBuf>, operation: FileOperation) -> Self {
        Self {
            path: path.into(),
            operation,
        }
    }
}

/// Pull side of the file-monitoring boundary.
///
/// `get_dirty_files` returns every path that changed since the same
/// `consumer_key` last asked, and marks those changes as seen for that key.
pub trait FileMonitor: Send + Sync {
    fn get_dirty_files(&self, consumer_key: &str) -> BTreeSet<PathBuf>;
}

#[derive(Debug, Default)]
struct LogInner {
    events: Vec<FileEvent>,
    seen: HashMap<String, usize>,
}

/// In-memory append-only implementation of [`FileMonitor`].
///
/// The event log is append-only for the life of the session; per-consumer
/// offsets into it implement the "seen" marking required by the contract.
#[derive(Debug, Default)]
pub struct DirtyFileLog {
    inner: Mutex<LogInner>,
}

impl DirtyFileLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a classified event to the log.
    pub fn record(&self, event: FileEvent) {
        tracing::trace!(path = %event.path.display(), operation = ?event.operation, "file event");
        self.inner.lock().events.push(event);
    }

    /// Number of events recorded so far (monitoring lifecycle included).
    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().events.is_empty()
    }
}

impl FileMonitor for DirtyFileLog {
    fn get_dirty_files(&self, consumer_key: &str) -> BTreeSet<PathBuf> {
        let mut inner = self.inner.lock();
        let from = inner.seen.get(consumer_key).copied().unwrap_or(0);
        let dirty: BTreeSet<PathBuf> = inner.events[from..]
            .iter()
            .filter(|event| event.operation.is_content_change())
            .map(|event| event.path.clone())
            .collect();
        let high_water = inner.events.len();
        inner.seen.insert(consumer_key.to_string(), high_water);
        dirty
    }
}

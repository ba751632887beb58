//! Result sink trait and error types
//!
//! This module defines the interface every output realization implements.
//! Probe tasks call `deliver` concurrently, so sinks guard their writer
//! with a lock taken once per batch.

use crate::entry::Entry;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for discovered entries
///
/// Implementations must be thread-safe.
pub trait ResultSink: Send + Sync {
    /// Writes one probe's entries as a batch
    ///
    /// An entry that fails to write is logged and dropped; the rest of the
    /// batch is still written. Nothing is retried.
    ///
    /// # Returns
    ///
    /// The number of entries actually written
    fn deliver(&self, entries: &[Entry]) -> usize;

    /// Flushes buffered output at the end of a graceful run
    fn finish(&self) -> SinkResult<()>;
}

/// Sink that keeps entries in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Entry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries delivered so far, in delivery order
    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ResultSink for MemorySink {
    fn deliver(&self, entries: &[Entry]) -> usize {
        let mut stored = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        stored.extend_from_slice(entries);
        entries.len()
    }

    fn finish(&self) -> SinkResult<()> {
        Ok(())
    }
}

//! Persistent probe log
//!
//! The sink keeps every record in memory and, on each append, rewrites the
//! whole log file as a pretty-printed `{"logs": [...]}` document. Appends are
//! serialized through one async mutex so concurrent workers never interleave
//! writes.
//!
//! Each append costs O(records so far) and the rewrite is not atomic: a crash
//! mid-write can leave a truncated file behind.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::{LogRecord, LogStructure};

/// Errors raised by the log sink
#[derive(Error, Debug)]
pub enum SinkError {
    /// Log file could not be reset, opened or written
    #[error("Log file I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Log structure could not be serialized
    #[error("Failed to serialize log structure: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Shared, lock-guarded log accumulator backed by a JSON file
pub struct LogSink {
    path: PathBuf,
    state: Mutex<LogStructure>,
}

impl LogSink {
    /// Create a sink writing to `path` without touching the file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(LogStructure::default()),
        }
    }

    /// Truncate (or create) the log file and return an empty sink for it
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Io` if the file cannot be truncated; this is a
    /// fatal startup condition.
    pub async fn reset(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        tokio::fs::write(&path, b"")
            .await
            .map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "Log file reset");
        Ok(Self::new(path))
    }

    /// Append a record and rewrite the log file
    ///
    /// Persistence failures are logged and swallowed; the in-memory log
    /// grows regardless.
    pub async fn append(&self, record: &LogRecord) {
        let mut state = self.state.lock().await;
        state.logs.push(record.to_string());

        if let Err(e) = self.persist(&state).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist log");
        }
    }

    async fn persist(&self, state: &LogStructure) -> Result<(), SinkError> {
        let bytes = state.to_json_pretty()?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| SinkError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Snapshot of all records appended so far, in order
    pub async fn records(&self) -> Vec<String> {
        self.state.lock().await.logs.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.logs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.logs.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

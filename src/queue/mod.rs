//! Shared round-robin work queue
//!
//! Workers rotate entries through a single ordered queue: pop the front
//! entry under the lock, release the lock, process the entry, then lock again
//! to push it onto the tail. The lock is never held across processing, so
//! network I/O in one worker does not block the others. While an entry is in
//! flight the queue is one shorter than configured; every pop is matched by
//! exactly one push, so the configured length is restored once the rotation
//! completes.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

/// Errors raised by the work queue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Every entry is currently in flight, or the queue was configured empty
    #[error("Work queue is empty")]
    Empty,
}

/// What a single rotation did with the entry it popped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Entry was handed to the processor
    Processed,
    /// Entry was blank and went straight back to the tail
    Skipped,
}

/// Clonable handle to the shared queue
#[derive(Debug, Clone, Default)]
pub struct WorkQueue {
    entries: Arc<Mutex<VecDeque<String>>>,
}

impl WorkQueue {
    pub fn new(urls: impl IntoIterator<Item = String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(urls.into_iter().collect())),
        }
    }

    /// Current length; excludes entries that are in flight
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Copy of the current queue order
    pub async fn snapshot(&self) -> Vec<String> {
        self.entries.lock().await.iter().cloned().collect()
    }

    /// Remove and return the front entry
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Empty` when nothing is queued.
    pub async fn pop_front(&self) -> Result<String, QueueError> {
        self.entries.lock().await.pop_front().ok_or(QueueError::Empty)
    }

    /// Return an entry to the tail
    pub async fn push_back(&self, entry: String) {
        self.entries.lock().await.push_back(entry);
    }

    /// Pop the front entry, run `process` on it without holding the lock,
    /// then push the entry back onto the tail
    ///
    /// Blank or whitespace-only entries are rotated but never processed.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Empty` if there was nothing to pop; the queue is
    /// left untouched in that case.
    pub async fn rotate_and_process<F, Fut>(&self, process: F) -> Result<Rotation, QueueError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = ()>,
    {
        let entry = self.pop_front().await?;

        let rotation = if entry.trim().is_empty() {
            Rotation::Skipped
        } else {
            process(entry.clone()).await;
            Rotation::Processed
        };

        self.push_back(entry).await;
        Ok(rotation)
    }
}

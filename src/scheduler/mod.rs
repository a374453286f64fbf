//! Concurrent polling scheduler
//!
//! The scheduler launches a fixed pool of workers over one shared
//! [`WorkQueue`]. Each worker loops forever: rotate one entry through the
//! queue, probing it with the shared [`Prober`] and appending the record to
//! the shared [`LogSink`]. Workers coordinate only through the queue; there is
//! no fairness guarantee and no per-URL pacing.
//!
//! # Shutdown
//!
//! Production runs use [`Scheduler::run_forever`], which never returns.
//! [`Scheduler::run`] accepts a `watch` receiver so callers (tests) can stop
//! the pool. Workers check the signal between rotations only, so a rotation
//! that has started always pushes its entry back.
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            │          WorkQueue           │
//!            │  [u1] [u2] [u3] ... [un]     │
//!            └───▲──────────────────────┬───┘
//!      push back │                      │ pop front
//!            ┌───┴──────────────────────▼───┐
//!            │  worker 1 .. worker N        │──► Prober ──► LogSink
//!            └──────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::AppConfig;
use crate::error::Result;
use crate::prober::Prober;
use crate::queue::{QueueError, Rotation, WorkQueue};
use crate::sink::LogSink;

/// Idle delay when every entry is currently in flight
const EMPTY_QUEUE_IDLE: Duration = Duration::from_millis(10);

/// Counters shared by all workers
#[derive(Debug, Default)]
struct Counters {
    rotations: AtomicU64,
    probes: AtomicU64,
    skipped: AtomicU64,
    idle: AtomicU64,
}

/// Snapshot of scheduler activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Completed pop/push rotations
    pub rotations: u64,
    /// Rotations that handed a non-blank entry to the prober
    pub probes: u64,
    /// Rotations of blank entries
    pub skipped: u64,
    /// Attempts that found the queue empty
    pub idle: u64,
}

/// Fixed worker pool rotating over a shared work queue
pub struct Scheduler {
    queue: WorkQueue,
    prober: Arc<Prober>,
    sink: Arc<LogSink>,
    workers: usize,
    counters: Arc<Counters>,
}

impl Scheduler {
    pub fn new(queue: WorkQueue, prober: Arc<Prober>, sink: Arc<LogSink>, workers: usize) -> Self {
        Self {
            queue,
            prober,
            sink,
            workers,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Build a scheduler the way the binary starts up
    ///
    /// Loads the config, resets the log file, loads the targets and builds
    /// the HTTP client, in that order. The log file is reset before the
    /// target list is read, so a bad target file still leaves an empty log.
    ///
    /// # Errors
    ///
    /// Returns the first failing step as an [`crate::error::Error`]; every
    /// one of them is fatal for the binary.
    pub async fn from_files(config_path: &Path, log_path: &Path) -> Result<Self> {
        let config = AppConfig::from_file(config_path)?;
        let sink = LogSink::reset(log_path).await?;
        let targets = config.load_targets()?;
        let prober = Prober::new()?;

        tracing::info!(
            config = %config_path.display(),
            target_file = %config.target_file.display(),
            workers = config.num_workers,
            urls = targets.len(),
            probeable = targets.probeable(),
            "urlpoll starting"
        );

        Ok(Self::new(
            WorkQueue::new(targets.urls),
            Arc::new(prober),
            Arc::new(sink),
            config.num_workers,
        ))
    }

    /// Handle to the queue the workers rotate over
    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    /// Handle to the shared log sink
    pub fn sink(&self) -> &Arc<LogSink> {
        &self.sink
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            rotations: self.counters.rotations.load(Ordering::Relaxed),
            probes: self.counters.probes.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
            idle: self.counters.idle.load(Ordering::Relaxed),
        }
    }

    /// Poll until the process is killed
    pub async fn run_forever(&self) -> SchedulerStats {
        // The sender stays alive for the whole call, so no shutdown ever fires
        let (_shutdown, shutdown_rx) = watch::channel(false);
        self.run(shutdown_rx).await
    }

    /// Run the worker pool until `shutdown` flips to `true`
    ///
    /// With zero workers or an empty queue no worker is started and the call
    /// simply waits for the shutdown signal.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> SchedulerStats {
        let queue_len = self.queue.len().await;

        if self.workers == 0 || queue_len == 0 {
            tracing::warn!(
                workers = self.workers,
                urls = queue_len,
                "Nothing to poll; waiting without starting workers"
            );
            wait_for_shutdown(&mut shutdown).await;
            return self.stats();
        }

        tracing::info!(workers = self.workers, urls = queue_len, "Starting polling workers");

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    queue: self.queue.clone(),
                    prober: self.prober.clone(),
                    sink: self.sink.clone(),
                    counters: self.counters.clone(),
                };
                tokio::spawn(worker.run(shutdown.clone()))
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Polling worker terminated abnormally");
            }
        }

        let stats = self.stats();
        tracing::info!(
            rotations = stats.rotations,
            probes = stats.probes,
            skipped = stats.skipped,
            "Polling workers stopped"
        );
        stats
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender means nobody can ever stop us; park instead of spinning
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// One polling loop
struct Worker {
    id: usize,
    queue: WorkQueue,
    prober: Arc<Prober>,
    sink: Arc<LogSink>,
    counters: Arc<Counters>,
}

impl Worker {
    async fn run(self, shutdown: watch::Receiver<bool>) {
        tracing::debug!(worker = self.id, "Worker started");

        while !*shutdown.borrow() {
            let prober = &self.prober;
            let sink = &self.sink;

            let result = self
                .queue
                .rotate_and_process(|url| async move {
                    prober.check(&url, sink).await;
                })
                .await;

            match result {
                Ok(Rotation::Processed) => {
                    self.counters.rotations.fetch_add(1, Ordering::Relaxed);
                    self.counters.probes.fetch_add(1, Ordering::Relaxed);
                }
                Ok(Rotation::Skipped) => {
                    self.counters.rotations.fetch_add(1, Ordering::Relaxed);
                    self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                    // Blank-only queues never hit an await point that yields
                    tokio::task::yield_now().await;
                }
                Err(QueueError::Empty) => {
                    self.counters.idle.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(worker = self.id, "Queue empty, all entries in flight");
                    tokio::time::sleep(EMPTY_QUEUE_IDLE).await;
                }
            }
        }

        tracing::debug!(worker = self.id, "Worker stopped");
    }
}

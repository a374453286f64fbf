//! urlpoll - continuous URL availability poller
//!
//! A fixed pool of workers rotates a list of URLs round-robin, issues one
//! HTTP GET per visit, classifies the response as UP or DOWN and appends a
//! timestamped record to a JSON log file.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Startup configuration and target list loading
//! - [`prober`] - Single HTTP probe and UP/DOWN classification
//! - [`queue`] - Shared work queue with pop/process/push rotation
//! - [`scheduler`] - Worker pool driving the rotation forever
//! - [`sink`] - In-memory log mirrored to the log file
//! - [`models`] - Outcomes, log records and the log document
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use urlpoll::config::{CONFIG_FILE_NAME, LOG_FILE_NAME};
//! use urlpoll::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scheduler =
//!         Scheduler::from_files(Path::new(CONFIG_FILE_NAME), Path::new(LOG_FILE_NAME)).await?;
//!     scheduler.run_forever().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod prober;
pub mod queue;
pub mod scheduler;
pub mod sink;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AppConfig, TargetList};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{LogRecord, LogStructure, Outcome, Status};
    pub use crate::prober::Prober;
    pub use crate::queue::{Rotation, WorkQueue};
    pub use crate::scheduler::{Scheduler, SchedulerStats};
    pub use crate::sink::LogSink;
}

// Direct re-exports for convenience
pub use models::{LogRecord, Outcome, Status};

//! Unified error handling for the urlpoll crate
//!
//! Each component owns a small domain error; this module folds the ones that
//! can stop startup into a single [`Error`] enum so [`Scheduler::from_files`]
//! can propagate anything with `?`.
//!
//! # Architecture
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping the startup domain errors
//!
//! Only startup failures ever reach the binary. Probe and persistence
//! failures during polling are logged where they happen and never leave
//! their component.
//!
//! [`Scheduler::from_files`]: crate::scheduler::Scheduler::from_files

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::config::ConfigError;
pub use crate::prober::ProbeError;
pub use crate::queue::QueueError;
pub use crate::sink::SinkError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// HTTP client errors
    Network,
    /// Configuration and target list errors
    Config,
    /// Log file errors
    Storage,
}

impl ErrorCategory {
    /// Human readable label for the category
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Config => "config",
            Self::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unified error type for the urlpoll crate
#[derive(Error, Debug)]
pub enum Error {
    /// Config or target file could not be read or parsed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be built
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Log file could not be reset
    #[error("Log sink error: {0}")]
    Sink(#[from] SinkError),
}

impl Error {
    /// Check if rerunning without touching the inputs may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Probe(_) => true,
            Self::Sink(SinkError::Io { source, .. }) => matches!(
                source.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            Self::Sink(SinkError::Serialize(_)) => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Config,
            Self::Probe(_) => ErrorCategory::Network,
            Self::Sink(_) => ErrorCategory::Storage,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

//! Configuration management for the urlpoll daemon
//!
//! Two JSON documents are read once at startup: the application config
//! (`config.json` by default) naming the target file and the worker count,
//! and the target file itself holding the ordered URL list. Neither is ever
//! reloaded.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default application config file, relative to the working directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default log file, relative to the working directory
pub const LOG_FILE_NAME: &str = "log.json";

/// Errors raised while loading startup configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be opened or read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not the expected JSON shape
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the JSON file holding the URL list
    #[serde(rename = "targetFile")]
    pub target_file: PathBuf,

    /// Number of concurrent polling workers
    #[serde(rename = "numGoRoutines")]
    pub num_workers: usize,
}

/// Target file contents: the initial work queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetList {
    /// URLs in probing order; blanks and duplicates are kept as-is
    pub urls: Vec<String>,
}

impl AppConfig {
    /// Load the application config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// Load the target list this config points at
    pub fn load_targets(&self) -> Result<TargetList, ConfigError> {
        TargetList::from_file(&self.target_file)
    }
}

impl TargetList {
    /// Load a target list from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// Number of entries, blanks included
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether the list has no entries at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Number of entries that will actually be probed
    #[must_use]
    pub fn probeable(&self) -> usize {
        self.urls.iter().filter(|u| !u.trim().is_empty()).count()
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

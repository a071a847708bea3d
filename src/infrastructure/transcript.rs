//! Per-agent append-only conversation log artifact.
//!
//! One JSON array of `{role, message}` records per agent, appended by
//! read-modify-write. The artifact is write-only telemetry for the running
//! session: a missing file is created on first append and a corrupt file is
//! treated as empty, never fatal.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub role: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to write transcript {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode transcript {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct TranscriptLog {
    path: PathBuf,
}

impl TranscriptLog {
    pub fn new(log_dir: impl AsRef<Path>, role: &str) -> Self {
        Self {
            path: log_dir.as_ref().join(format!("{role}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, role: &str, message: &str) -> Result<(), TranscriptError> {
        let mut records = self.records();
        records.push(TranscriptRecord {
            role: role.to_string(),
            message: message.to_string(),
        });

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| TranscriptError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        let encoded =
            serde_json::to_string(&records).map_err(|source| TranscriptError::Encode {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, encoded).map_err(|source| TranscriptError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Reads the records back. Missing or corrupt files read as empty.
    pub fn records(&self) -> Vec<TranscriptRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "No readable transcript; starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "Corrupt transcript; treating as empty");
                Vec::new()
            }
        }
    }
}

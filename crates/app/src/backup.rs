//! File-backed backup and restore of component snapshots.

use std::{
    io::{self, ErrorKind as IoErrorKind},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::{
    errors::{Classify, ErrorKind},
    snapshot::Snapshottable,
};

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid JSON for {name}", path.display())]
    Decode {
        name: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {name}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Classify for BackupError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::InternalServer
    }
}

/// JSON documents stored as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FileBackup {
    dir: PathBuf,
}

impl FileBackup {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Read a document, falling back to `T::default()` when the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or decoded.
    pub async fn load<T>(&self, name: &str) -> Result<T, BackupError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path_for(name);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == IoErrorKind::NotFound => {
                warn!(path = %path.display(), "no backup found, starting empty");

                return Ok(T::default());
            }
            Err(source) => return Err(BackupError::Read { path, source }),
        };

        serde_json::from_slice(&bytes).map_err(|source| BackupError::Decode {
            name: name.to_string(),
            path,
            source,
        })
    }

    /// Read the last snapshot written for component `S`.
    ///
    /// # Errors
    ///
    /// See [`FileBackup::load`].
    pub async fn restore<S: Snapshottable>(&self) -> Result<S::Snapshot, BackupError> {
        self.load(S::NAME).await
    }

    /// Snapshot `component` and write it under its stable name.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be encoded or written.
    pub async fn save<S: Snapshottable>(&self, component: &S) -> Result<(), BackupError> {
        let snapshot = component.snapshot().await;

        self.store(S::NAME, &snapshot).await
    }

    /// Write a document atomically: readers see either the old file or the
    /// complete new one.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be encoded or written.
    pub async fn store<T: Serialize>(&self, name: &str, value: &T) -> Result<(), BackupError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| BackupError::Encode {
            name: name.to_string(),
            source,
        })?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| BackupError::Write {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path_for(name);
        let staging = self.dir.join(format!(".{name}.json.tmp"));

        fs::write(&staging, &bytes)
            .await
            .map_err(|source| BackupError::Write {
                path: staging.clone(),
                source,
            })?;

        fs::rename(&staging, &path)
            .await
            .map_err(|source| BackupError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = bytes.len(), "wrote backup");

        Ok(())
    }
}

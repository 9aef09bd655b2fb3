use std::{io, path::PathBuf};

use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by the on-disk JSON documents.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing or renaming a file failed.
    #[error("storage I/O failure on `{path}`")]
    Io {
        /// File the operation targeted.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file exists but does not hold the expected JSON document.
    #[error("corrupt JSON document `{path}`")]
    Corrupt {
        /// File that failed to parse.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A value could not be turned into JSON.
    #[error("failed to serialize document for `{path}`")]
    Serialize {
        /// File the value was destined for.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Wrap an I/O failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the document exists but could not be parsed.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Corrupt { .. })
    }
}

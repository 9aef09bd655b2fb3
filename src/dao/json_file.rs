use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;

use crate::dao::storage::{StorageError, StorageResult};

/// A JSON document stored as one whole file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so readers only ever observe a complete document.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: Arc<Path>,
}

impl JsonFile {
    /// Handle on the document stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::from(path.into()),
        }
    }

    /// Location of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document, returning `None` when the file is absent.
    pub async fn read<T>(&self) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let bytes = match fs::read(&*self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::io(&*self.path, err)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                path: self.path.to_path_buf(),
                source,
            })
    }

    /// Serialize `value` and atomically replace the document with it.
    pub async fn write<T>(&self, value: &T) -> StorageResult<()>
    where
        T: ?Sized + Serialize,
    {
        let payload =
            serde_json::to_vec_pretty(value).map_err(|source| StorageError::Serialize {
                path: self.path.to_path_buf(),
                source,
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::io(parent, err))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, &payload)
            .await
            .map_err(|err| StorageError::io(&temp, err))?;
        fs::rename(&temp, &*self.path)
            .await
            .map_err(|err| StorageError::io(&*self.path, err))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("document"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        value: u32,
    }

    #[tokio::test]
    async fn absent_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFile::new(dir.path().join("missing.json"));
        assert_eq!(file.read::<Doc>().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read_and_no_temp_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFile::new(dir.path().join("nested/doc.json"));
        file.write(&Doc { value: 3 }).await.unwrap();

        assert_eq!(file.read::<Doc>().await.unwrap(), Some(Doc { value: 3 }));
        assert!(!dir.path().join("nested/doc.json.tmp").exists());
    }

    #[tokio::test]
    async fn garbage_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = JsonFile::new(path).read::<Doc>().await.unwrap_err();
        assert!(err.is_corrupt());
    }
}

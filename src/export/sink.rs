//! Save targets for exported files.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::ExportResult;

/// Destination of an exported file.
///
/// Implementations decide where the bytes end up; the returned path
/// identifies the saved file for logging and for the caller. Saving runs
/// on the export task, so implementations must not block the runtime.
#[async_trait]
pub trait SaveTarget: Send + Sync {
    async fn save(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> ExportResult<PathBuf>;
}

/// Writes exports into a directory, creating it on first save.
///
/// A file with the same name is overwritten.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SaveTarget for DirectorySink {
    async fn save(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> ExportResult<PathBuf> {
        // Only the final component is used; names never escape the directory
        let name = Path::new(file_name).file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid export file name {file_name:?}"),
            )
        })?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), mime_type, len = bytes.len(), "saved export");
        Ok(path)
    }
}

/// A file captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps exports in memory, in save order.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<SavedFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every file saved so far.
    pub fn files(&self) -> Vec<SavedFile> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SaveTarget for MemorySink {
    async fn save(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> ExportResult<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SavedFile {
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
                bytes: bytes.to_vec(),
            });
        Ok(PathBuf::from(file_name))
    }
}

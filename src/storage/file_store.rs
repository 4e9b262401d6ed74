//! One-slot blob store for the selected PDF.
//!
//! The registration workflow stages exactly one file at a time, so the
//! store keys nothing: save replaces whatever was there, load returns it
//! or nothing. The disk implementation keeps the bytes and a small JSON
//! sidecar with the file name and MIME type.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::models::SelectedFile;

const BLOB_FILE: &str = "staged.bin";
const META_FILE: &str = "staged.json";

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn save(&self, file: &SelectedFile) -> Result<(), StorageError>;

    async fn load(&self) -> Result<Option<SelectedFile>, StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize)]
struct BlobMeta {
    file_name: String,
    mime_type: String,
}

/// File store backed by the temp-file directory.
pub struct DiskFileStore {
    dir: PathBuf,
}

impl DiskFileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn blob_path(&self) -> PathBuf {
        self.dir.join(BLOB_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn save(&self, file: &SelectedFile) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let meta = BlobMeta {
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
        };
        // Meta second so a crash between the writes never leaves a
        // readable meta pointing at stale bytes from a previous file.
        tokio::fs::write(self.blob_path(), &file.bytes).await?;
        tokio::fs::write(self.meta_path(), serde_json::to_vec(&meta)?).await?;
        tracing::debug!(
            file_name = %file.file_name,
            size = file.bytes.len(),
            "file staged"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<SelectedFile>, StorageError> {
        let meta_bytes = match tokio::fs::read(self.meta_path()).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let meta: BlobMeta = serde_json::from_slice(&meta_bytes)?;
        let bytes = tokio::fs::read(self.blob_path()).await?;
        Ok(Some(SelectedFile {
            file_name: meta.file_name,
            mime_type: meta.mime_type,
            bytes,
        }))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        // Meta first, so a partial clear is indistinguishable from empty
        for path in [self.meta_path(), self.blob_path()] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

/// In-memory file store for tests.
#[derive(Default)]
pub struct MemoryFileStore {
    slot: Mutex<Option<SelectedFile>>,
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn save(&self, file: &SelectedFile) -> Result<(), StorageError> {
        *self.slot.lock().unwrap() = Some(file.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<SelectedFile>, StorageError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

//! Draft persistence across the registration → confirmation navigation.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::StagedDraft;

/// Fixed file name for the serialized draft (one draft at a time).
const DRAFT_FILE: &str = "draft.json";
/// Marker file for "user pressed back on the confirmation step".
const RETURNING_FLAG_FILE: &str = "returning";

/// Holds at most one staged draft plus the returning-from-confirmation
/// flag. Cleared explicitly on submission or cancellation.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn save(&self, draft: &StagedDraft) -> Result<(), StorageError>;

    async fn load(&self) -> Result<Option<StagedDraft>, StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;

    /// Mark that the next registration-page visit should rehydrate the
    /// draft instead of starting fresh.
    async fn set_returning(&self) -> Result<(), StorageError>;

    /// Read and clear the returning flag.
    async fn take_returning(&self) -> Result<bool, StorageError>;
}

/// Draft store backed by files in the session directory.
pub struct DiskDraftStore {
    dir: PathBuf,
}

impl DiskDraftStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn draft_path(&self) -> PathBuf {
        self.dir.join(DRAFT_FILE)
    }

    fn flag_path(&self) -> PathBuf {
        self.dir.join(RETURNING_FLAG_FILE)
    }
}

#[async_trait]
impl DraftStore for DiskDraftStore {
    async fn save(&self, draft: &StagedDraft) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec(draft)?;
        tokio::fs::write(self.draft_path(), json).await?;
        tracing::debug!(file_key = %draft.file_key, "draft persisted");
        Ok(())
    }

    async fn load(&self) -> Result<Option<StagedDraft>, StorageError> {
        match tokio::fs::read(self.draft_path()).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        for path in [self.draft_path(), self.flag_path()] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    async fn set_returning(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.flag_path(), b"1").await?;
        Ok(())
    }

    async fn take_returning(&self) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(self.flag_path()).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory draft store for tests.
#[derive(Default)]
pub struct MemoryDraftStore {
    draft: Mutex<Option<StagedDraft>>,
    returning: Mutex<bool>,
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save(&self, draft: &StagedDraft) -> Result<(), StorageError> {
        *self.draft.lock().unwrap() = Some(draft.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<StagedDraft>, StorageError> {
        Ok(self.draft.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.draft.lock().unwrap() = None;
        *self.returning.lock().unwrap() = false;
        Ok(())
    }

    async fn set_returning(&self) -> Result<(), StorageError> {
        *self.returning.lock().unwrap() = true;
        Ok(())
    }

    async fn take_returning(&self) -> Result<bool, StorageError> {
        Ok(std::mem::take(&mut *self.returning.lock().unwrap()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DraftFields;

    fn staged() -> StagedDraft {
        let mut fields = DraftFields::default();
        fields.set("type", "通達".into());
        fields.set("title", "タイトル".into());
        StagedDraft {
            fields,
            file_key: "documents/1_a.pdf".into(),
            file_name: "a.pdf".into(),
        }
    }

    #[tokio::test]
    async fn disk_store_roundtrips_draft() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskDraftStore::new(dir.path().to_path_buf());

        assert!(store.load().await.unwrap().is_none());
        store.save(&staged()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(staged()));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disk_store_overwrites_previous_draft() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskDraftStore::new(dir.path().to_path_buf());

        store.save(&staged()).await.unwrap();
        let mut second = staged();
        second.fields.title = "別のタイトル".into();
        store.save(&second).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn returning_flag_is_taken_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskDraftStore::new(dir.path().to_path_buf());

        assert!(!store.take_returning().await.unwrap());
        store.set_returning().await.unwrap();
        assert!(store.take_returning().await.unwrap());
        assert!(!store.take_returning().await.unwrap());
    }

    #[tokio::test]
    async fn clear_also_drops_returning_flag() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskDraftStore::new(dir.path().to_path_buf());

        store.save(&staged()).await.unwrap();
        store.set_returning().await.unwrap();
        store.clear().await.unwrap();
        assert!(!store.take_returning().await.unwrap());
    }
}

//! Confirmation step: read-only review of the staged draft, then the
//! final create call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::DocumentApi;
use crate::error::AppError;
use crate::models::{Document, SelectedFile, StagedDraft};
use crate::storage::{DraftStore, FileStore};

/// What the confirmation page has to show.
pub enum ConfirmationState {
    Ready {
        draft: StagedDraft,
        /// Staged file for the PDF preview; the draft is still
        /// confirmable without it since the object store already holds
        /// the upload.
        file: Option<SelectedFile>,
    },
    /// Nothing staged, there is nothing to confirm.
    RedirectToRegistration,
}

#[derive(Debug)]
pub enum ConfirmOutcome {
    Created(Document),
    /// The draft disappeared between rendering and submitting.
    NothingStaged,
    /// A confirm is already running; this submission was dropped.
    InFlight,
}

pub struct ConfirmationController {
    api: Arc<dyn DocumentApi>,
    drafts: Arc<dyn DraftStore>,
    files: Arc<dyn FileStore>,
    in_flight: AtomicBool,
}

impl ConfirmationController {
    pub fn new(
        api: Arc<dyn DocumentApi>,
        drafts: Arc<dyn DraftStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            api,
            drafts,
            files,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Load the staged draft and file for rendering.
    pub async fn rehydrate(&self) -> Result<ConfirmationState, AppError> {
        match self.drafts.load().await? {
            Some(draft) => Ok(ConfirmationState::Ready {
                file: self.files.load().await?,
                draft,
            }),
            None => Ok(ConfirmationState::RedirectToRegistration),
        }
    }

    /// Create the document from the staged draft. On success both
    /// storage tiers are cleared; on failure everything stays in place
    /// so the user can retry.
    pub async fn confirm(&self) -> Result<ConfirmOutcome, AppError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("confirm already in flight, dropping re-submission");
            return Ok(ConfirmOutcome::InFlight);
        }

        let outcome = self.create_from_staged().await;
        self.in_flight.store(false, Ordering::Release);
        outcome
    }

    async fn create_from_staged(&self) -> Result<ConfirmOutcome, AppError> {
        let Some(draft) = self.drafts.load().await? else {
            return Ok(ConfirmOutcome::NothingStaged);
        };

        let payload = draft
            .fields
            .to_payload()
            .with_file(&draft.file_key, &draft.file_name);
        let created = self.api.create(&payload).await?;

        // Best-effort cleanup; the document exists either way
        if let Err(err) = self.drafts.clear().await {
            tracing::warn!(%err, "failed to clear draft after creation");
        }
        if let Err(err) = self.files.clear().await {
            tracing::warn!(%err, "failed to clear staged file after creation");
        }
        Ok(ConfirmOutcome::Created(created))
    }

    /// Return to the registration form, flagging it to rehydrate the
    /// draft instead of starting fresh.
    pub async fn back(&self) -> Result<(), AppError> {
        self.drafts.set_returning().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::api::{ListFilters, UploadSlot};
    use crate::error::{ApiError, ApiOperation};
    use crate::models::{DocumentPayload, DraftFields, SearchResult};
    use crate::storage::{MemoryDraftStore, MemoryFileStore};

    #[derive(Default)]
    struct FakeApi {
        fail_create: AtomicBool,
        created: Mutex<Vec<DocumentPayload>>,
    }

    #[async_trait]
    impl DocumentApi for FakeApi {
        async fn list(&self, _: &ListFilters) -> Result<Vec<Document>, ApiError> {
            Ok(Vec::new())
        }
        async fn get(&self, _: &str) -> Result<Document, ApiError> {
            unimplemented!()
        }
        async fn create(&self, payload: &DocumentPayload) -> Result<Document, ApiError> {
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(ApiError::Server {
                    op: ApiOperation::CreateDocument,
                    status: 500,
                });
            }
            self.created.lock().unwrap().push(payload.clone());
            Ok(Document {
                id: "100".to_string(),
                ..Default::default()
            })
        }
        async fn update(&self, _: &str, _: &DocumentPayload) -> Result<Document, ApiError> {
            unimplemented!()
        }
        async fn delete(&self, _: &str) -> Result<(), ApiError> {
            Ok(())
        }
        async fn search(&self, _: &str, _: u32) -> Result<Vec<SearchResult>, ApiError> {
            Ok(Vec::new())
        }
        async fn request_upload_slot(&self, _: &str, _: &str) -> Result<UploadSlot, ApiError> {
            unimplemented!()
        }
        async fn upload(&self, _: &str, _: &str, _: Vec<u8>) -> Result<(), ApiError> {
            unimplemented!()
        }
        async fn download(&self, _: &str) -> Result<Vec<u8>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn staged_draft() -> StagedDraft {
        let mut fields = DraftFields::default();
        fields.set("type", "技術情報".into());
        fields.set("title", "X".into());
        fields.set("department", "Y".into());
        fields.set("date", "2025-04-28".into());
        StagedDraft {
            fields,
            file_key: "documents/1_x.pdf".into(),
            file_name: "x.pdf".into(),
        }
    }

    struct Harness {
        api: Arc<FakeApi>,
        drafts: Arc<MemoryDraftStore>,
        files: Arc<MemoryFileStore>,
        controller: ConfirmationController,
    }

    impl Harness {
        fn new() -> Self {
            let api = Arc::new(FakeApi::default());
            let drafts = Arc::new(MemoryDraftStore::default());
            let files = Arc::new(MemoryFileStore::default());
            let controller = ConfirmationController::new(
                api.clone(),
                drafts.clone(),
                files.clone(),
            );
            Self {
                api,
                drafts,
                files,
                controller,
            }
        }
    }

    #[tokio::test]
    async fn rehydrate_redirects_when_nothing_is_staged() {
        let harness = Harness::new();
        assert!(matches!(
            harness.controller.rehydrate().await.unwrap(),
            ConfirmationState::RedirectToRegistration
        ));
    }

    #[tokio::test]
    async fn rehydrate_returns_the_staged_draft_and_file() {
        let harness = Harness::new();
        harness.drafts.save(&staged_draft()).await.unwrap();
        harness
            .files
            .save(&SelectedFile {
                file_name: "x.pdf".into(),
                mime_type: "application/pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
            })
            .await
            .unwrap();

        let ConfirmationState::Ready { draft, file } =
            harness.controller.rehydrate().await.unwrap()
        else {
            panic!("expected a ready state");
        };
        assert_eq!(draft, staged_draft());
        assert_eq!(file.unwrap().bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn confirm_creates_with_the_staged_file_key_and_clears_both_tiers() {
        let harness = Harness::new();
        harness.drafts.save(&staged_draft()).await.unwrap();

        let outcome = harness.controller.confirm().await.unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Created(_)));

        let created = harness.api.created.lock().unwrap();
        assert_eq!(created[0].file_key.as_deref(), Some("documents/1_x.pdf"));
        assert_eq!(created[0].title, "X");
        drop(created);

        assert!(harness.drafts.load().await.unwrap().is_none());
        assert!(harness.files.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_create_keeps_the_draft_for_retry() {
        let harness = Harness::new();
        harness.drafts.save(&staged_draft()).await.unwrap();
        harness.api.fail_create.store(true, Ordering::SeqCst);

        let err = harness.controller.confirm().await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::Server { .. })));
        assert!(harness.drafts.load().await.unwrap().is_some());

        // The in-flight guard was released, so a retry goes through
        harness.api.fail_create.store(false, Ordering::SeqCst);
        let outcome = harness.controller.confirm().await.unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Created(_)));
    }

    #[tokio::test]
    async fn confirm_with_nothing_staged_reports_it() {
        let harness = Harness::new();
        assert!(matches!(
            harness.controller.confirm().await.unwrap(),
            ConfirmOutcome::NothingStaged
        ));
    }

    #[tokio::test]
    async fn back_sets_the_returning_flag() {
        let harness = Harness::new();
        harness.drafts.save(&staged_draft()).await.unwrap();
        harness.controller.back().await.unwrap();
        assert!(harness.drafts.take_returning().await.unwrap());
    }
}

//! Registration form controller.
//!
//! Drives the two-tab registration form for both flows: creating a new
//! document (which goes through a confirmation step) and editing an
//! existing one (which updates directly and returns to the viewer). All
//! persistence goes through the injected stores, all network through the
//! injected API client.

use std::sync::Arc;

use crate::api::DocumentApi;
use crate::error::{AppError, ValidationError, MAX_FILE_SIZE};
use crate::models::{
    CreateDraft, DraftFields, DraftValidation, EditDraft, SelectedFile, StagedDraft,
};
use crate::storage::{DraftStore, FileStore};

const PDF_MIME: &str = "application/pdf";

/// Where the form goes after a successful proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProceedOutcome {
    /// Create flow: draft staged, continue to the confirmation step.
    Confirmation,
    /// Edit flow: updated directly, return to the viewer.
    Viewer { document_id: String },
}

enum DraftKind {
    Create(CreateDraft),
    Edit(EditDraft),
}

pub struct RegistrationController {
    api: Arc<dyn DocumentApi>,
    drafts: Arc<dyn DraftStore>,
    files: Arc<dyn FileStore>,
    draft: DraftKind,
}

impl RegistrationController {
    /// Open the form for a new document. When the user is coming back
    /// from the confirmation step the staged draft is rehydrated;
    /// otherwise a fresh start clears any residue from an earlier
    /// abandoned attempt.
    pub async fn start_create(
        api: Arc<dyn DocumentApi>,
        drafts: Arc<dyn DraftStore>,
        files: Arc<dyn FileStore>,
    ) -> Result<Self, AppError> {
        let draft = if drafts.take_returning().await? {
            match drafts.load().await? {
                Some(staged) => CreateDraft {
                    fields: staged.fields,
                    file: files.load().await?,
                },
                None => CreateDraft::default(),
            }
        } else {
            drafts.clear().await?;
            files.clear().await?;
            CreateDraft::default()
        };
        Ok(Self {
            api,
            drafts,
            files,
            draft: DraftKind::Create(draft),
        })
    }

    /// Rebuild the create-flow controller for a form submission. Unlike
    /// [`start_create`](Self::start_create) this never clears staged
    /// state and leaves the returning flag alone; the submitted fields
    /// overwrite the rehydrated ones and a previously staged file stands
    /// in when no new one was picked.
    pub async fn resume_create(
        api: Arc<dyn DocumentApi>,
        drafts: Arc<dyn DraftStore>,
        files: Arc<dyn FileStore>,
    ) -> Result<Self, AppError> {
        let draft = match drafts.load().await? {
            Some(staged) => CreateDraft {
                fields: staged.fields,
                file: files.load().await?,
            },
            None => CreateDraft::default(),
        };
        Ok(Self {
            api,
            drafts,
            files,
            draft: DraftKind::Create(draft),
        })
    }

    /// Open the form pre-populated from an existing document.
    pub async fn start_edit(
        api: Arc<dyn DocumentApi>,
        drafts: Arc<dyn DraftStore>,
        files: Arc<dyn FileStore>,
        document_id: &str,
    ) -> Result<Self, AppError> {
        let document = api.get(document_id).await?;
        let fields = DraftFields {
            doc_type: document.doc_type,
            title: document.title,
            department: document.department,
            division: document.division,
            number: document.number,
            person_in_charge: document.person_in_charge,
            internal_contact: document.internal_contact,
            external_contact: document.external_contact,
            email: document.email,
            distribution_target: document.distribution_target,
            date: document.date,
            end_date: document.end_date,
        };
        Ok(Self {
            api,
            drafts,
            files,
            draft: DraftKind::Edit(EditDraft {
                document_id: document_id.to_string(),
                fields,
                replacement: None,
            }),
        })
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.draft, DraftKind::Edit(_))
    }

    pub fn fields(&self) -> &DraftFields {
        match &self.draft {
            DraftKind::Create(draft) => &draft.fields,
            DraftKind::Edit(draft) => &draft.fields,
        }
    }

    fn fields_mut(&mut self) -> &mut DraftFields {
        match &mut self.draft {
            DraftKind::Create(draft) => &mut draft.fields,
            DraftKind::Edit(draft) => &mut draft.fields,
        }
    }

    pub fn selected_file_name(&self) -> Option<&str> {
        let file = match &self.draft {
            DraftKind::Create(draft) => &draft.file,
            DraftKind::Edit(draft) => &draft.replacement,
        };
        file.as_ref().map(|f| f.file_name.as_str())
    }

    /// Unconstrained field entry; both tabs write into the same set.
    pub fn set_field(&mut self, name: &str, value: String) {
        self.fields_mut().set(name, value);
    }

    /// Accept a picked file, or reject it without touching state.
    /// PDF only, 10 MiB cap, declared MIME backed up by content
    /// sniffing.
    pub fn select_file(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ValidationError> {
        if mime_type != PDF_MIME {
            return Err(ValidationError::NotAPdf);
        }
        if bytes.len() as u64 > MAX_FILE_SIZE {
            return Err(ValidationError::FileTooLarge {
                size: bytes.len() as u64,
            });
        }
        if let Some(kind) = infer::get(&bytes) {
            if kind.mime_type() != PDF_MIME {
                return Err(ValidationError::NotAPdf);
            }
        }

        let file = SelectedFile {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        };
        match &mut self.draft {
            DraftKind::Create(draft) => draft.file = Some(file),
            DraftKind::Edit(draft) => draft.replacement = Some(file),
        }
        Ok(())
    }

    /// Validate, then run the staged sequence. Create: slot, upload,
    /// persist draft and file, hand off to the confirmation step. Edit:
    /// upload a replacement only if one was picked, update directly.
    /// The slot/upload/persist steps run strictly in order and the first
    /// failure aborts the rest.
    pub async fn proceed(&self) -> Result<ProceedOutcome, AppError> {
        match &self.draft {
            DraftKind::Create(draft) => {
                draft.validate()?;
                // validate() guarantees the file is present
                let Some(ref file) = draft.file else {
                    return Err(ValidationError::MissingFields(vec!["PDFファイル"]).into());
                };

                let slot = self
                    .api
                    .request_upload_slot(&file.file_name, &file.mime_type)
                    .await?;
                self.api
                    .upload(&slot.upload_url, &file.mime_type, file.bytes.clone())
                    .await?;

                let staged = StagedDraft {
                    fields: draft.fields.clone(),
                    file_key: slot.file_key,
                    file_name: file.file_name.clone(),
                };
                self.drafts.save(&staged).await?;
                self.files.save(file).await?;
                tracing::info!(file_key = %staged.file_key, "draft staged for confirmation");
                Ok(ProceedOutcome::Confirmation)
            }
            DraftKind::Edit(draft) => {
                draft.validate()?;
                let mut payload = draft.fields.to_payload();
                if let Some(ref replacement) = draft.replacement {
                    let slot = self
                        .api
                        .request_upload_slot(&replacement.file_name, &replacement.mime_type)
                        .await?;
                    self.api
                        .upload(&slot.upload_url, &replacement.mime_type, replacement.bytes.clone())
                        .await?;
                    payload = payload.with_file(&slot.file_key, &replacement.file_name);
                }
                let updated = self.api.update(&draft.document_id, &payload).await?;
                Ok(ProceedOutcome::Viewer {
                    document_id: updated.id,
                })
            }
        }
    }

    /// Discard the draft and both storage tiers.
    pub async fn cancel(&mut self) -> Result<(), AppError> {
        self.drafts.clear().await?;
        self.files.clear().await?;
        match &mut self.draft {
            DraftKind::Create(draft) => *draft = CreateDraft::default(),
            DraftKind::Edit(draft) => draft.replacement = None,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::api::{ListFilters, UploadSlot};
    use crate::error::ApiError;
    use crate::models::{Document, DocumentPayload, SearchResult};
    use crate::storage::{MemoryDraftStore, MemoryFileStore};

    #[derive(Default)]
    struct FakeApi {
        slot_requests: AtomicUsize,
        uploads: AtomicUsize,
        updates: Mutex<Vec<(String, DocumentPayload)>>,
        existing: Mutex<Option<Document>>,
    }

    #[async_trait]
    impl DocumentApi for FakeApi {
        async fn list(&self, _: &ListFilters) -> Result<Vec<Document>, ApiError> {
            Ok(Vec::new())
        }
        async fn get(&self, id: &str) -> Result<Document, ApiError> {
            Ok(self.existing.lock().unwrap().clone().unwrap_or(Document {
                id: id.to_string(),
                ..Default::default()
            }))
        }
        async fn create(&self, _: &DocumentPayload) -> Result<Document, ApiError> {
            unimplemented!("create happens in the confirmation step")
        }
        async fn update(&self, id: &str, payload: &DocumentPayload) -> Result<Document, ApiError> {
            self.updates
                .lock()
                .unwrap()
                .push((id.to_string(), payload.clone()));
            Ok(Document {
                id: id.to_string(),
                ..Default::default()
            })
        }
        async fn delete(&self, _: &str) -> Result<(), ApiError> {
            Ok(())
        }
        async fn search(&self, _: &str, _: u32) -> Result<Vec<SearchResult>, ApiError> {
            Ok(Vec::new())
        }
        async fn request_upload_slot(
            &self,
            file_name: &str,
            _: &str,
        ) -> Result<UploadSlot, ApiError> {
            self.slot_requests.fetch_add(1, Ordering::SeqCst);
            Ok(UploadSlot {
                upload_url: "http://object-store/put".to_string(),
                file_key: format!("documents/1_{file_name}"),
            })
        }
        async fn upload(&self, _: &str, _: &str, _: Vec<u8>) -> Result<(), ApiError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn download(&self, _: &str) -> Result<Vec<u8>, ApiError> {
            Ok(Vec::new())
        }
    }

    struct Harness {
        api: Arc<FakeApi>,
        drafts: Arc<MemoryDraftStore>,
        files: Arc<MemoryFileStore>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                api: Arc::new(FakeApi::default()),
                drafts: Arc::new(MemoryDraftStore::default()),
                files: Arc::new(MemoryFileStore::default()),
            }
        }

        async fn create_controller(&self) -> RegistrationController {
            RegistrationController::start_create(
                self.api.clone(),
                self.drafts.clone(),
                self.files.clone(),
            )
            .await
            .unwrap()
        }

        async fn edit_controller(&self, id: &str) -> RegistrationController {
            RegistrationController::start_edit(
                self.api.clone(),
                self.drafts.clone(),
                self.files.clone(),
                id,
            )
            .await
            .unwrap()
        }
    }

    fn fill_mandatory(controller: &mut RegistrationController) {
        controller.set_field("type", "技術情報".into());
        controller.set_field("title", "X".into());
        controller.set_field("department", "Y".into());
        controller.set_field("date", "2025-04-28".into());
    }

    fn pdf_bytes(len: usize) -> Vec<u8> {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.resize(len, 0);
        bytes
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_any_network_call() {
        let harness = Harness::new();
        let mut controller = harness.create_controller().await;

        let err = controller
            .select_file("big.pdf", "application/pdf", pdf_bytes(12 * 1024 * 1024))
            .unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { .. }));
        assert!(controller.selected_file_name().is_none());
        assert_eq!(harness.api.slot_requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_pdf_mime_is_rejected() {
        let harness = Harness::new();
        let mut controller = harness.create_controller().await;

        let err = controller
            .select_file("memo.txt", "text/plain", b"hello".to_vec())
            .unwrap_err();
        assert_eq!(err, ValidationError::NotAPdf);
    }

    #[tokio::test]
    async fn sniffed_non_pdf_content_is_rejected_despite_declared_mime() {
        let harness = Harness::new();
        let mut controller = harness.create_controller().await;

        // PNG magic with a PDF MIME declared
        let png = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR".to_vec();
        let err = controller
            .select_file("fake.pdf", "application/pdf", png)
            .unwrap_err();
        assert_eq!(err, ValidationError::NotAPdf);
    }

    #[tokio::test]
    async fn missing_fields_are_reported_all_at_once() {
        let harness = Harness::new();
        let controller = harness.create_controller().await;

        let err = controller.proceed().await.unwrap_err();
        let AppError::Validation(ValidationError::MissingFields(labels)) = err else {
            panic!("expected a validation failure");
        };
        assert_eq!(
            labels,
            ["文書種類", "タイトル", "発信部門・部", "掲示期間", "PDFファイル"]
        );
        assert_eq!(harness.api.slot_requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn proceed_stages_draft_and_file_in_order() {
        let harness = Harness::new();
        let mut controller = harness.create_controller().await;
        fill_mandatory(&mut controller);
        controller
            .select_file("x.pdf", "application/pdf", pdf_bytes(2 * 1024 * 1024))
            .unwrap();

        let outcome = controller.proceed().await.unwrap();
        assert_eq!(outcome, ProceedOutcome::Confirmation);
        assert_eq!(harness.api.slot_requests.load(Ordering::SeqCst), 1);
        assert_eq!(harness.api.uploads.load(Ordering::SeqCst), 1);

        let staged = harness.drafts.load().await.unwrap().unwrap();
        assert_eq!(staged.file_key, "documents/1_x.pdf");
        assert_eq!(staged.fields.title, "X");
        let file = harness.files.load().await.unwrap().unwrap();
        assert_eq!(file.file_name, "x.pdf");
        assert_eq!(file.bytes.len(), 2 * 1024 * 1024);
    }

    #[tokio::test]
    async fn cancel_then_restart_leaves_no_residue() {
        let harness = Harness::new();
        let mut controller = harness.create_controller().await;
        fill_mandatory(&mut controller);
        controller
            .select_file("x.pdf", "application/pdf", pdf_bytes(1024))
            .unwrap();
        controller.proceed().await.unwrap();

        controller.cancel().await.unwrap();
        assert!(harness.drafts.load().await.unwrap().is_none());
        assert!(harness.files.load().await.unwrap().is_none());

        let fresh = harness.create_controller().await;
        assert_eq!(*fresh.fields(), DraftFields::default());
        assert!(fresh.selected_file_name().is_none());
    }

    #[tokio::test]
    async fn fresh_start_clears_an_abandoned_draft() {
        let harness = Harness::new();
        let mut controller = harness.create_controller().await;
        fill_mandatory(&mut controller);
        controller
            .select_file("x.pdf", "application/pdf", pdf_bytes(1024))
            .unwrap();
        controller.proceed().await.unwrap();

        // New visit without the returning flag
        let _fresh = harness.create_controller().await;
        assert!(harness.drafts.load().await.unwrap().is_none());
        assert!(harness.files.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn returning_from_confirmation_rehydrates_the_draft() {
        let harness = Harness::new();
        let mut controller = harness.create_controller().await;
        fill_mandatory(&mut controller);
        controller
            .select_file("x.pdf", "application/pdf", pdf_bytes(1024))
            .unwrap();
        controller.proceed().await.unwrap();

        harness.drafts.set_returning().await.unwrap();
        let back = harness.create_controller().await;
        assert_eq!(back.fields().title, "X");
        assert_eq!(back.selected_file_name(), Some("x.pdf"));
    }

    #[tokio::test]
    async fn edit_without_replacement_updates_without_file_fields() {
        let harness = Harness::new();
        *harness.api.existing.lock().unwrap() = Some(Document {
            id: "7".to_string(),
            doc_type: "規定".to_string(),
            title: "旧タイトル".to_string(),
            department: "総務部".to_string(),
            date: "2025-01-01".to_string(),
            file_name: "kitei.pdf".to_string(),
            file_key: "documents/7_kitei.pdf".to_string(),
            ..Default::default()
        });

        let mut controller = harness.edit_controller("7").await;
        assert_eq!(controller.fields().title, "旧タイトル");
        controller.set_field("title", "新タイトル".into());

        let outcome = controller.proceed().await.unwrap();
        assert_eq!(
            outcome,
            ProceedOutcome::Viewer {
                document_id: "7".to_string()
            }
        );
        assert_eq!(harness.api.slot_requests.load(Ordering::SeqCst), 0);

        let updates = harness.api.updates.lock().unwrap();
        let (id, payload) = &updates[0];
        assert_eq!(id, "7");
        assert_eq!(payload.title, "新タイトル");
        assert!(payload.file_key.is_none());
    }

    #[tokio::test]
    async fn edit_with_replacement_uploads_then_updates() {
        let harness = Harness::new();
        *harness.api.existing.lock().unwrap() = Some(Document {
            id: "7".to_string(),
            doc_type: "規定".to_string(),
            title: "t".to_string(),
            department: "d".to_string(),
            date: "2025-01-01".to_string(),
            ..Default::default()
        });

        let mut controller = harness.edit_controller("7").await;
        controller
            .select_file("new.pdf", "application/pdf", pdf_bytes(1024))
            .unwrap();
        controller.proceed().await.unwrap();

        assert_eq!(harness.api.slot_requests.load(Ordering::SeqCst), 1);
        assert_eq!(harness.api.uploads.load(Ordering::SeqCst), 1);
        let updates = harness.api.updates.lock().unwrap();
        assert_eq!(
            updates[0].1.file_key.as_deref(),
            Some("documents/1_new.pdf")
        );
    }
}

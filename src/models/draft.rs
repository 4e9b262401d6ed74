//! Client-local draft types for the registration workflow.
//!
//! A draft never reaches the backend as-is: the controller turns it into a
//! [`DocumentPayload`](super::DocumentPayload) at submission time. Create
//! and edit drafts are separate types so the "file mandatory only on
//! create" rule is visible in the type, with one shared validation trait.

use serde::{Deserialize, Serialize};

use super::DocumentPayload;
use crate::error::ValidationError;

/// Scalar form fields shared by both tabs of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftFields {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub title: String,
    pub department: String,
    pub division: String,
    pub number: String,
    pub person_in_charge: String,
    pub internal_contact: String,
    pub external_contact: String,
    pub email: String,
    pub distribution_target: String,
    pub date: String,
    pub end_date: String,
}

impl DraftFields {
    /// Set a field by its form name. Unknown names are ignored; entry is
    /// unconstrained by design (validation happens at proceed time).
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "type" => self.doc_type = value,
            "title" => self.title = value,
            "department" => self.department = value,
            "division" => self.division = value,
            "number" => self.number = value,
            "personInCharge" => self.person_in_charge = value,
            "internalContact" => self.internal_contact = value,
            "externalContact" => self.external_contact = value,
            "email" => self.email = value,
            "distributionTarget" => self.distribution_target = value,
            "date" => self.date = value,
            "endDate" => self.end_date = value,
            _ => {}
        }
    }

    /// Turn the fields into a request body. Empty optionals are dropped
    /// here so the wire payload stays clean.
    pub fn to_payload(&self) -> DocumentPayload {
        DocumentPayload {
            number: DocumentPayload::optional(&self.number),
            division: DocumentPayload::optional(&self.division),
            person_in_charge: DocumentPayload::optional(&self.person_in_charge),
            internal_contact: DocumentPayload::optional(&self.internal_contact),
            external_contact: DocumentPayload::optional(&self.external_contact),
            email: DocumentPayload::optional(&self.email),
            distribution_target: DocumentPayload::optional(&self.distribution_target),
            date: DocumentPayload::optional(&self.date),
            end_date: DocumentPayload::optional(&self.end_date),
            ..DocumentPayload::new(&self.doc_type, &self.title, &self.department)
        }
    }

    /// Labels of the mandatory scalar fields that are still empty.
    fn missing_scalar_labels(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.doc_type.is_empty() {
            missing.push("文書種類");
        }
        if self.title.trim().is_empty() {
            missing.push("タイトル");
        }
        if self.department.trim().is_empty() {
            missing.push("発信部門・部");
        }
        if self.date.is_empty() {
            missing.push("掲示期間");
        }
        missing
    }
}

/// A file picked in the form (and later, the staged copy of it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Shared validation contract for both draft variants.
pub trait DraftValidation {
    fn fields(&self) -> &DraftFields;

    /// Whether this variant still needs a file to be valid.
    fn missing_file(&self) -> bool;

    /// Check every mandatory field at once; the error lists all missing
    /// labels, not just the first.
    fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = self.fields().missing_scalar_labels();
        if self.missing_file() {
            missing.push("PDFファイル");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}

/// Draft for a brand-new document. A file must be attached.
#[derive(Debug, Clone, Default)]
pub struct CreateDraft {
    pub fields: DraftFields,
    pub file: Option<SelectedFile>,
}

impl DraftValidation for CreateDraft {
    fn fields(&self) -> &DraftFields {
        &self.fields
    }

    fn missing_file(&self) -> bool {
        self.file.is_none()
    }
}

/// Draft editing an existing document. The stored file is retained unless a
/// replacement is selected.
#[derive(Debug, Clone)]
pub struct EditDraft {
    pub document_id: String,
    pub fields: DraftFields,
    pub replacement: Option<SelectedFile>,
}

impl DraftValidation for EditDraft {
    fn fields(&self) -> &DraftFields {
        &self.fields
    }

    fn missing_file(&self) -> bool {
        false
    }
}

/// The scalar snapshot persisted between the registration and confirmation
/// steps, after the file has been staged to the object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedDraft {
    #[serde(flatten)]
    pub fields: DraftFields,
    pub file_key: String,
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_fields() -> DraftFields {
        let mut fields = DraftFields::default();
        fields.set("type", "技術情報".into());
        fields.set("title", "X".into());
        fields.set("department", "Y".into());
        fields.set("date", "2025-04-28".into());
        fields
    }

    fn pdf() -> SelectedFile {
        SelectedFile {
            file_name: "a.pdf".into(),
            mime_type: "application/pdf".into(),
            bytes: b"%PDF-1.4".to_vec(),
        }
    }

    #[test]
    fn set_ignores_unknown_names() {
        let mut fields = DraftFields::default();
        fields.set("unknownField", "value".into());
        assert_eq!(fields, DraftFields::default());
    }

    #[test]
    fn create_draft_reports_all_missing_labels_at_once() {
        let draft = CreateDraft::default();
        let err = draft.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "文書種類",
                "タイトル",
                "発信部門・部",
                "掲示期間",
                "PDFファイル",
            ])
        );
    }

    #[test]
    fn whitespace_only_title_counts_as_missing() {
        let mut draft = CreateDraft {
            fields: filled_fields(),
            file: Some(pdf()),
        };
        draft.fields.title = "   ".into();
        assert_eq!(
            draft.validate().unwrap_err(),
            ValidationError::MissingFields(vec!["タイトル"])
        );
    }

    #[test]
    fn create_draft_valid_with_file_and_mandatory_fields() {
        let draft = CreateDraft {
            fields: filled_fields(),
            file: Some(pdf()),
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn edit_draft_does_not_require_a_file() {
        let draft = EditDraft {
            document_id: "1".into(),
            fields: filled_fields(),
            replacement: None,
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn staged_draft_roundtrips_through_json() {
        let staged = StagedDraft {
            fields: filled_fields(),
            file_key: "documents/1745800000000_a.pdf".into(),
            file_name: "a.pdf".into(),
        };
        let json = serde_json::to_string(&staged).unwrap();
        // Flattened fields share the object with the file reference
        assert!(json.contains("\"type\":\"技術情報\""));
        assert!(json.contains("\"fileKey\""));
        let back: StagedDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, staged);
    }
}

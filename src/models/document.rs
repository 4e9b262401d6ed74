//! Wire model for persisted documents.

use serde::{Deserialize, Serialize};

/// A persisted document as returned by the backend.
///
/// The backend stores free-form strings and omits attributes it never
/// received, so every scalar defaults to empty and the ephemeral /
/// server-managed attributes are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub id: String,
    /// Free-text document kind; drawn from the fixed category vocabulary
    /// by the registration form, but not enforced by the backend.
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
    /// Display start date (ISO date string).
    pub date: String,
    /// Display end date (ISO date string).
    pub end_date: String,
    pub file_name: String,
    /// Object-store key of the attached PDF.
    pub file_key: String,
    /// Ephemeral signed URL, present only on single-document fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Document {
    /// Display kind, falling back the way the list page does.
    pub fn display_type(&self) -> &str {
        if self.doc_type.is_empty() {
            "未分類"
        } else {
            &self.doc_type
        }
    }

    /// Display title with the list page's fallback.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "無題"
        } else {
            &self.title
        }
    }
}

/// Create/update request body with an explicit optional-field contract:
/// empty and whitespace-only values are dropped before serialization, so
/// the wire payload never carries empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub title: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_in_charge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl DocumentPayload {
    pub fn new(doc_type: &str, title: &str, department: &str) -> Self {
        Self {
            doc_type: doc_type.to_string(),
            title: title.trim().to_string(),
            department: department.trim().to_string(),
            ..Default::default()
        }
    }

    /// Trim a value and keep it only when non-empty.
    pub fn optional(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Attach the staged file reference.
    pub fn with_file(mut self, file_key: &str, file_name: &str) -> Self {
        self.file_key = Some(file_key.to_string());
        self.file_name = Some(file_name.to_string());
        self
    }
}

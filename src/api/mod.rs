//! Typed client for the document management backend.
//!
//! [`DocumentApi`] is the seam the controllers depend on; [`HttpApi`] is
//! the real implementation. Tests swap in an in-memory fake. No call is
//! retried or cached — every call reflects server state at call time.

mod http;

pub use http::HttpApi;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Document, DocumentPayload, SearchResult};

/// Server-side list filters. Title filtering happens on the backend; the
/// client never re-filters titles locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilters {
    pub title: Option<String>,
    pub category: Option<String>,
}

/// A signed upload slot issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    pub upload_url: String,
    pub file_key: String,
}

#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// List document summaries, optionally filtered server-side.
    async fn list(&self, filters: &ListFilters) -> Result<Vec<Document>, ApiError>;

    /// Fetch one document, including its ephemeral download URL.
    async fn get(&self, id: &str) -> Result<Document, ApiError>;

    /// Create a document; the server assigns the id.
    async fn create(&self, payload: &DocumentPayload) -> Result<Document, ApiError>;

    /// Update an existing document with a partial payload.
    async fn update(&self, id: &str, payload: &DocumentPayload) -> Result<Document, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;

    /// Semantic search over document content, capped at `limit` results.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, ApiError>;

    /// Ask the backend for a signed upload URL and object-store key.
    async fn request_upload_slot(
        &self,
        file_name: &str,
        mime_type: &str,
    ) -> Result<UploadSlot, ApiError>;

    /// Transfer raw file bytes directly to the object store (not the
    /// document API).
    async fn upload(
        &self,
        upload_url: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError>;

    /// Fetch raw file bytes from a signed download URL.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

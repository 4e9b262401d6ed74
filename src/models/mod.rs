//! Data model: wire types for the backend API, the static category tree,
//! and the client-local draft types.

pub mod category;
pub mod document;
pub mod draft;
pub mod search;

pub use category::{categories, find_category, Category, DOCUMENT_TYPES};
pub use document::{Document, DocumentPayload};
pub use draft::{CreateDraft, DraftFields, DraftValidation, EditDraft, SelectedFile, StagedDraft};
pub use search::SearchResult;

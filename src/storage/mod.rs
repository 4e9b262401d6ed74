//! Client-local storage tiers for the registration workflow.
//!
//! Two tiers, mirroring what the draft needs to survive the navigation to
//! the confirmation step: a JSON draft store for the scalar fields and a
//! one-slot blob store for the selected file. Both are trait-backed so
//! tests can use the in-memory implementations.

mod draft_store;
mod file_store;

pub use draft_store::{DiskDraftStore, DraftStore, MemoryDraftStore};
pub use file_store::{DiskFileStore, FileStore, MemoryFileStore};

//! docport: a locally-run web front end for a document management backend.
//!
//! The backend owns persistence (CRUD, semantic search, signed upload
//! URLs to object storage); docport owns everything in front of it: the
//! registration → confirmation workflow with its two client-local storage
//! tiers, the list page's category filtering / sorting / pagination, the
//! PDF viewer state and the search page. The controllers are headless and
//! injectable; the `server` module renders them as HTML.

pub mod api;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod listing;
pub mod models;
pub mod registration;
pub mod search;
pub mod server;
pub mod storage;
pub mod viewer;

pub use config::Settings;
pub use error::{ApiError, AppError, StorageError, ValidationError};

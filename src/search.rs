//! Semantic search over document content.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::DocumentApi;
use crate::error::{AppError, ValidationError};
use crate::models::SearchResult;

/// Fixed result cap sent with every query.
pub const RESULT_LIMIT: u32 = 50;

/// The page distinguishes "no search yet" from "searched, nothing found".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    NotSearched,
    NoResults {
        query: String,
    },
    Results {
        query: String,
        results: Vec<SearchResult>,
    },
}

pub struct SearchController {
    api: Arc<dyn DocumentApi>,
    in_flight: AtomicBool,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new(api: Arc<dyn DocumentApi>) -> Self {
        Self {
            api,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SearchState::NotSearched),
        }
    }

    /// Submit a query. Whitespace-only queries are a validation failure;
    /// a submission while another is in flight is dropped.
    pub async fn submit(&self, query: &str) -> Result<(), AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("search already in flight, ignoring re-submission");
            return Ok(());
        }

        let outcome = self.api.search(query, RESULT_LIMIT).await;
        self.in_flight.store(false, Ordering::Release);

        let results = outcome?;
        let mut state = self.state.lock().await;
        *state = if results.is_empty() {
            SearchState::NoResults {
                query: query.to_string(),
            }
        } else {
            SearchState::Results {
                query: query.to_string(),
                results,
            }
        };
        Ok(())
    }

    pub async fn state(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    pub async fn clear(&self) {
        *self.state.lock().await = SearchState::NotSearched;
    }
}

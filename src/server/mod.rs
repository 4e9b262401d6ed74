//! Web delivery for the document workspace.
//!
//! Server-rendered HTML over the headless controllers: list page with the
//! category sidebar, the registration → confirmation workflow, the PDF
//! viewer and the semantic search page. One running instance corresponds
//! to one user session; the draft tiers live in the instance's data
//! directory.

mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{DocumentApi, HttpApi};
use crate::config::Settings;
use crate::confirmation::ConfirmationController;
use crate::search::SearchController;
use crate::storage::{DiskDraftStore, DiskFileStore, DraftStore, FileStore};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn DocumentApi>,
    pub drafts: Arc<dyn DraftStore>,
    pub files: Arc<dyn FileStore>,
    pub confirmation: Arc<ConfirmationController>,
    pub search: Arc<SearchController>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        settings.ensure_directories()?;

        let api: Arc<dyn DocumentApi> = Arc::new(HttpApi::new(settings)?);
        let drafts: Arc<dyn DraftStore> = Arc::new(DiskDraftStore::new(settings.session_dir()));
        let files: Arc<dyn FileStore> = Arc::new(DiskFileStore::new(settings.temp_file_dir()));

        Ok(Self {
            confirmation: Arc::new(ConfirmationController::new(
                api.clone(),
                drafts.clone(),
                files.clone(),
            )),
            search: Arc::new(SearchController::new(api.clone())),
            api,
            drafts,
            files,
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

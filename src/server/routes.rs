//! Route table for the web interface.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_page))
        .route("/register", get(handlers::register_page).post(handlers::register_submit))
        .route("/register/cancel", post(handlers::register_cancel))
        .route("/confirm", get(handlers::confirm_page).post(handlers::confirm_submit))
        .route("/confirm/back", post(handlers::confirm_back))
        .route("/complete", get(handlers::complete_page))
        .route("/view/:id", get(handlers::viewer_page))
        .route(
            "/view/:id/delete",
            get(handlers::viewer_delete_page).post(handlers::viewer_delete),
        )
        .route("/search", get(handlers::search_page).post(handlers::search_submit))
        .route(
            "/documents/:id/delete",
            get(handlers::document_delete_page).post(handlers::document_delete),
        )
        .route("/static/style.css", get(handlers::stylesheet))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

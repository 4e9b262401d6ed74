//! Request handlers for the web interface.

use axum::extract::{Multipart, Path, Query, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::templates;
use super::AppState;
use crate::api::ListFilters;
use crate::confirmation::{ConfirmOutcome, ConfirmationState};
use crate::error::AppError;
use crate::listing::{ListEngine, ListState, SortField, SortOrder};
use crate::registration::{ProceedOutcome, RegistrationController};
use crate::viewer::ViewerController;

/// Failure rendered as an HTML error page.
pub enum PageError {
    App(AppError),
    BadRequest(String),
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<crate::error::ApiError> for PageError {
    fn from(err: crate::error::ApiError) -> Self {
        Self::App(err.into())
    }
}

impl From<crate::error::StorageError> for PageError {
    fn from(err: crate::error::StorageError) -> Self {
        Self::App(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::App(err) => {
                let status = match err {
                    AppError::Validation(_) => StatusCode::BAD_REQUEST,
                    AppError::Api(_) => StatusCode::BAD_GATEWAY,
                    AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Html(templates::error_page(&message))).into_response()
    }
}

type PageResult = Result<Response, PageError>;

fn parse_list_query(query: &str) -> (ListState, usize) {
    let mut state = ListState::default();
    let mut sort_field = None;
    let mut sort_order = SortOrder::Asc;
    let mut page = 1usize;

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "top" => state.top_category = Some(value.into_owned()),
            "sub" => state.checked_subs.push(value.into_owned()),
            "sort" => sort_field = SortField::from_param(&value),
            "order" => {
                if let Some(order) = SortOrder::from_param(&value) {
                    sort_order = order;
                }
            }
            "page" => page = value.parse().unwrap_or(1),
            "title" => {
                if !value.is_empty() {
                    state.title_filter = Some(value.into_owned());
                }
            }
            _ => {}
        }
    }
    state.sort = sort_field.map(|field| (field, sort_order));
    (state, page)
}

pub async fn list_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> PageResult {
    let (list_state, requested_page) = parse_list_query(query.as_deref().unwrap_or(""));
    let filters = ListFilters {
        title: list_state.title_filter.clone(),
        category: None,
    };
    let documents = state.api.list(&filters).await?;

    let mut engine = ListEngine::new(documents, list_state);
    engine.set_page(requested_page);
    Ok(Html(templates::list_page(&engine)).into_response())
}

#[derive(Deserialize)]
pub struct RegisterQuery {
    id: Option<String>,
}

async fn registration_controller(
    state: &AppState,
    edit_id: Option<&str>,
    resume: bool,
) -> Result<RegistrationController, AppError> {
    match edit_id {
        Some(id) => {
            RegistrationController::start_edit(
                state.api.clone(),
                state.drafts.clone(),
                state.files.clone(),
                id,
            )
            .await
        }
        None if resume => {
            RegistrationController::resume_create(
                state.api.clone(),
                state.drafts.clone(),
                state.files.clone(),
            )
            .await
        }
        None => {
            RegistrationController::start_create(
                state.api.clone(),
                state.drafts.clone(),
                state.files.clone(),
            )
            .await
        }
    }
}

pub async fn register_page(
    State(state): State<AppState>,
    Query(query): Query<RegisterQuery>,
) -> PageResult {
    let controller = registration_controller(&state, query.id.as_deref(), false).await?;
    Ok(Html(templates::register_page(
        controller.fields(),
        controller.selected_file_name(),
        query.id.as_deref(),
        None,
    ))
    .into_response())
}

struct SubmittedForm {
    fields: Vec<(String, String)>,
    file: Option<(String, String, Vec<u8>)>,
}

async fn read_multipart(multipart: &mut Multipart) -> Result<SubmittedForm, PageError> {
    let mut form = SubmittedForm {
        fields: Vec::new(),
        file: None,
    };
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| PageError::BadRequest(err.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let mut mime_type = field.content_type().unwrap_or_default().to_string();
            // Some browsers omit the part's content type; fall back to
            // the file name
            if mime_type.is_empty() {
                if let Some(guessed) = mime_guess::from_path(&file_name).first_raw() {
                    mime_type = guessed.to_string();
                }
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|err| PageError::BadRequest(err.to_string()))?;
            // An untouched file input submits an empty part
            if !file_name.is_empty() {
                form.file = Some((file_name, mime_type, bytes.to_vec()));
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|err| PageError::BadRequest(err.to_string()))?;
            form.fields.push((name, value));
        }
    }
    Ok(form)
}

pub async fn register_submit(
    State(state): State<AppState>,
    Query(query): Query<RegisterQuery>,
    mut multipart: Multipart,
) -> PageResult {
    let form = read_multipart(&mut multipart).await?;

    let mut controller = registration_controller(&state, query.id.as_deref(), true).await?;
    for (name, value) in form.fields {
        controller.set_field(&name, value);
    }
    if let Some((file_name, mime_type, bytes)) = form.file {
        if let Err(err) = controller.select_file(&file_name, &mime_type, bytes) {
            return Ok(Html(templates::register_page(
                controller.fields(),
                controller.selected_file_name(),
                query.id.as_deref(),
                Some(&err.to_string()),
            ))
            .into_response());
        }
    }

    match controller.proceed().await {
        Ok(ProceedOutcome::Confirmation) => Ok(Redirect::to("/confirm").into_response()),
        Ok(ProceedOutcome::Viewer { document_id }) => {
            Ok(Redirect::to(&format!("/view/{document_id}")).into_response())
        }
        Err(AppError::Validation(err)) => Ok(Html(templates::register_page(
            controller.fields(),
            controller.selected_file_name(),
            query.id.as_deref(),
            Some(&err.to_string()),
        ))
        .into_response()),
        Err(err) => Err(err.into()),
    }
}

pub async fn register_cancel(
    State(state): State<AppState>,
    Query(query): Query<RegisterQuery>,
) -> PageResult {
    let mut controller = registration_controller(&state, query.id.as_deref(), true).await?;
    controller.cancel().await?;
    let destination = match query.id {
        Some(id) => format!("/view/{id}"),
        None => "/".to_string(),
    };
    Ok(Redirect::to(&destination).into_response())
}

pub async fn confirm_page(State(state): State<AppState>) -> PageResult {
    match state.confirmation.rehydrate().await? {
        ConfirmationState::Ready { draft, file } => {
            Ok(Html(templates::confirm_page(&draft, file.as_ref())).into_response())
        }
        ConfirmationState::RedirectToRegistration => {
            Ok(Redirect::to("/register").into_response())
        }
    }
}

pub async fn confirm_submit(State(state): State<AppState>) -> PageResult {
    match state.confirmation.confirm().await? {
        ConfirmOutcome::Created(document) => {
            tracing::info!(id = %document.id, "registration completed");
            Ok(Redirect::to("/complete").into_response())
        }
        ConfirmOutcome::NothingStaged => Ok(Redirect::to("/register").into_response()),
        ConfirmOutcome::InFlight => Ok(Redirect::to("/confirm").into_response()),
    }
}

pub async fn confirm_back(State(state): State<AppState>) -> PageResult {
    state.confirmation.back().await?;
    Ok(Redirect::to("/register").into_response())
}

pub async fn complete_page() -> Html<String> {
    Html(templates::complete_page())
}

#[derive(Deserialize)]
pub struct ViewerQuery {
    page: Option<String>,
    zoom: Option<String>,
}

pub async fn viewer_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> PageResult {
    let mut viewer = ViewerController::load(&state.api, &id).await?;
    if let Some(ref page) = query.page {
        viewer.enter_page(page);
    }
    if let Some(ref zoom) = query.zoom {
        viewer.enter_zoom(zoom);
    }
    Ok(Html(templates::viewer_page(&viewer)).into_response())
}

pub async fn viewer_delete_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    let document = state.api.get(&id).await?;
    let action = format!("/view/{id}/delete");
    let cancel = format!("/view/{id}");
    Ok(Html(templates::delete_confirm_page(&document, &action, &cancel)).into_response())
}

pub async fn viewer_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    state.api.delete(&id).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn document_delete_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    let document = state.api.get(&id).await?;
    let action = format!("/documents/{id}/delete");
    Ok(Html(templates::delete_confirm_page(&document, &action, "/")).into_response())
}

pub async fn document_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    state.api.delete(&id).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn search_page(State(state): State<AppState>) -> Html<String> {
    Html(templates::search_page(&state.search.state().await, None))
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    query: String,
}

pub async fn search_submit(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<SearchForm>,
) -> PageResult {
    match state.search.submit(&form.query).await {
        Ok(()) => Ok(Redirect::to("/search").into_response()),
        Err(AppError::Validation(err)) => Ok(Html(templates::search_page(
            &state.search.state().await,
            Some(&err.to_string()),
        ))
        .into_response()),
        Err(err) => Err(err.into()),
    }
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], templates::CSS)
}

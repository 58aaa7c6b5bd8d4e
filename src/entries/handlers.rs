use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use bytes::Bytes;
use tracing::instrument;

use super::{
    dto::{AddEntryRequest, EntryResponse, MessageResponse},
    export::XLSX_CONTENT_TYPE,
    kind::EntryKind,
    services,
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

/// Routes for one entry kind, mounted at `/income` or `/expense`.
pub fn entry_routes(kind: EntryKind) -> Router<AppState> {
    let base = format!("/{}", kind.path());
    Router::new()
        .route(&base, get(list_entries).post(add_entry))
        .route(&format!("{base}/downloadexcel"), get(download_excel))
        .route(&format!("{base}/:id"), delete(delete_entry))
        .layer(Extension(kind))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn add_entry(
    State(state): State<AppState>,
    Extension(kind): Extension<EntryKind>,
    auth: AuthUser,
    payload: Result<Json<AddEntryRequest>, JsonRejection>,
) -> Result<Json<EntryResponse>, AppError> {
    let Json(payload) = payload?;
    let entry = services::add(state.entries(kind), kind, auth.id, payload).await?;
    Ok(Json(EntryResponse::new(kind, entry)))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(kind): Extension<EntryKind>,
    auth: AuthUser,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    let entries = services::list_all(state.entries(kind), auth.id).await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|e| EntryResponse::new(kind, e))
            .collect(),
    ))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(kind): Extension<EntryKind>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = services::delete(
        state.entries(kind),
        kind,
        state.config.policy,
        auth.id,
        &id,
    )
    .await?;
    Ok(Json(MessageResponse { message }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn download_excel(
    State(state): State<AppState>,
    Extension(kind): Extension<EntryKind>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bytes = services::export_spreadsheet(state.entries(kind), kind, auth.id).await?;
    let disposition = format!("attachment; filename=\"{}\"", kind.export_file_name());
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(bytes),
    ))
}

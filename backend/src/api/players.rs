//! Player endpoints: CRUD plus the fail-closed CSV import.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use super::types::{clamp_page_size, parse_json, parse_numeric, ApiError, ApiResult};
use super::AppState;
use crate::parser::parse_players_csv;
use crate::store::PlayerQuery;
use crate::validation::{validate_import_rows, validate_player_create, validate_player_update};

const DEFAULT_PAGE_SIZE: usize = 50;

/// GET /api/players
pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<serde_json::Value>> {
    let search = params
        .get("search")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let take = clamp_page_size(
        parse_numeric(params.get("take").map(String::as_str)),
        DEFAULT_PAGE_SIZE,
    );
    let skip = parse_numeric(params.get("skip").map(String::as_str)).max(0) as usize;

    let page = state.store.list_players(&PlayerQuery {
        search: search.clone(),
        take,
        skip,
    });

    Ok(Json(json!({
        "players": page.items,
        "total": page.total,
        "take": take,
        "skip": skip,
        "search": search,
    })))
}

/// POST /api/players
pub async fn create_player(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    let payload = parse_json(&body)?;
    let data = validate_player_create(&payload)?;

    let player = state.store.create_player(data);

    tracing::info!(player_id = %player.id, "Player created");

    Ok((StatusCode::CREATED, Json(json!({ "player": player }))))
}

/// GET /api/players/{id}
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let player = state.store.get_player(id)?;
    Ok(Json(json!({ "player": player })))
}

/// PUT /api/players/{id}
pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: String,
) -> ApiResult<Json<serde_json::Value>> {
    // Ensure not-found surfaces before body problems.
    state.store.get_player(id)?;

    let payload = parse_json(&body)?;
    let patch = validate_player_update(&payload)?;

    let player = state.store.update_player(id, patch)?;

    tracing::info!(player_id = %id, "Player updated");

    Ok(Json(json!({ "player": player })))
}

/// DELETE /api/players/{id}
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete_player(id)?;

    tracing::info!(player_id = %id, "Player deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/players/import
///
/// Fail-closed batch semantics: every row is validated before any write, and
/// a single bad row fails the whole import with one message per offender.
pub async fn import_players(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form_error = || ApiError::BadRequest("Request body must be form-data.".into());

    let mut file_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| form_error())? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|_| form_error())?;
            file_text = Some(String::from_utf8_lossy(&bytes).into_owned());
        }
    }

    let text = file_text.ok_or_else(|| {
        ApiError::BadRequest("Field \"file\" with a CSV file is required.".into())
    })?;

    let table = parse_players_csv(&text)?;

    if !table.row_errors.is_empty() {
        return Err(ApiError::CsvParse {
            details: table.row_errors,
        });
    }
    if table.records.is_empty() {
        return Err(ApiError::BadRequest("No records found in CSV.".into()));
    }

    let players =
        validate_import_rows(&table.records).map_err(|details| ApiError::CsvRows { details })?;

    let created = state.store.import_players(players);

    tracing::info!(count = created.len(), "Players imported");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "imported": created.len(), "players": created })),
    ))
}

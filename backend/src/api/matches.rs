//! Match endpoints: listing, creation, aggregate fetch, partial update with
//! team reconciliation, and cascading delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use super::types::{clamp_page_size, parse_json, parse_numeric, ApiError, ApiResult};
use super::AppState;
use crate::error::StoreError;
use crate::models::MatchStatus;
use crate::store::MatchQuery;
use crate::validation::{validate_match_create, validate_match_update};

const DEFAULT_PAGE_SIZE: usize = 20;

/// GET /api/matches
pub async fn list_matches(
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

    let status = match params.get("status").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            MatchStatus::from_code(raw)
                .ok_or_else(|| ApiError::BadRequest("Invalid status filter.".into()))?,
        ),
        None => None,
    };

    let page = state.store.list_matches(&MatchQuery {
        search: search.clone(),
        status,
        take,
        skip,
    });

    Ok(Json(json!({
        "matches": page.items,
        "total": page.total,
        "take": take,
        "skip": skip,
        "search": search,
        "status": status,
    })))
}

/// POST /api/matches
pub async fn create_match(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    let payload = parse_json(&body)?;
    let data = validate_match_create(&payload)?;

    let detail = state.store.create_match(data);

    tracing::info!(match_id = %detail.record.id, "Match created");

    Ok((StatusCode::CREATED, Json(json!({ "match": detail }))))
}

/// GET /api/matches/{id}
pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let detail = state.store.get_match(id)?;
    Ok(Json(json!({ "match": detail })))
}

/// PUT /api/matches/{id}
pub async fn update_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: String,
) -> ApiResult<Json<serde_json::Value>> {
    // Not-found wins over a malformed body, matching fetch-then-validate.
    if !state.store.match_exists(id) {
        return Err(StoreError::MatchNotFound.into());
    }

    let payload = parse_json(&body)?;
    let patch = validate_match_update(&payload)?;

    let detail = state.store.update_match(id, patch)?;

    tracing::info!(match_id = %id, "Match updated");

    Ok(Json(json!({ "match": detail })))
}

/// DELETE /api/matches/{id}
pub async fn delete_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete_match(id)?;

    tracing::info!(match_id = %id, "Match deleted");

    Ok(StatusCode::NO_CONTENT)
}

//! Event and roster endpoints: event creation with cross-reference checks,
//! the match timeline, and player assignment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;
use uuid::Uuid;

use super::types::{parse_json, ApiResult};
use super::AppState;
use crate::error::StoreError;
use crate::events::resolve_event_team;
use crate::validation::{validate_assignment_create, validate_event_create};

/// POST /api/matches/{id}/events
pub async fn create_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    if !state.store.match_exists(id) {
        return Err(StoreError::MatchNotFound.into());
    }

    let payload = parse_json(&body)?;
    let data = validate_event_create(&payload)?;

    let effective_team = resolve_event_team(state.store.as_ref(), id, data.team_id, data.player_id)?;
    let detail = state.store.create_event(id, data, effective_team)?;

    tracing::info!(match_id = %id, event_id = %detail.event.id, "Event recorded");

    Ok((StatusCode::CREATED, Json(json!({ "event": detail }))))
}

/// GET /api/matches/{id}/timeline
pub async fn timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let events = state.store.timeline(id)?;
    Ok(Json(json!({ "events": events })))
}

/// POST /api/matches/{id}/teams/{team_id}/players
pub async fn assign_player(
    State(state): State<AppState>,
    Path((id, team_id)): Path<(Uuid, Uuid)>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    let payload = parse_json(&body)?;
    let player_id = validate_assignment_create(&payload)?;

    let detail = state.store.assign_player(id, team_id, player_id)?;

    tracing::info!(match_id = %id, team_id = %team_id, player_id = %player_id, "Player assigned");

    Ok((StatusCode::CREATED, Json(json!({ "assignment": detail }))))
}

/// DELETE /api/matches/{id}/teams/{team_id}/players/{player_id}
pub async fn unassign_player(
    State(state): State<AppState>,
    Path((id, team_id, player_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.store.unassign_player(id, team_id, player_id)?;

    tracing::info!(match_id = %id, team_id = %team_id, player_id = %player_id, "Player unassigned");

    Ok(StatusCode::NO_CONTENT)
}

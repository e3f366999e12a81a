//! Whole-record validators composed from the field validators.
//!
//! Two strategies run over the same per-field functions:
//!
//! - **JSON bodies** fail fast: the first violated field aborts the record
//!   with a single message.
//! - **CSV import** checks every row and accumulates failures as
//!   `"Row <n>: <message>"` before failing the batch
//!   ([`validate_import_rows`]).
//!
//! Create variants collapse [`Field::Clear`] to `None` (clearing a field and
//! leaving it at its default are the same thing on create); update variants
//! keep the tri-state so partial updates can distinguish "leave unchanged"
//! from "clear". Update variants only look at keys present in the payload,
//! and an update that provides nothing is itself an error.
//!
//! Validators never consult storage; referential checks live in
//! [`crate::reconcile`] and [`crate::events`].

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{FieldError, ValidationError, ValidationResult};
use crate::fields::{self, Field};
use crate::models::MatchStatus;

// =============================================================================
// Validated Input Shapes
// =============================================================================

/// A validated match creation request.
#[derive(Debug, Clone, Default)]
pub struct MatchCreate {
    pub name: String,
    pub status: Option<MatchStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub tournament: Option<String>,
    pub notes: Option<String>,
    pub config: Option<Value>,
    pub teams: Option<Vec<TeamDraft>>,
}

/// A validated partial match update.
///
/// `teams: None` leaves the team collection untouched; `Some(list)` hands
/// the full incoming description to the reconciliation engine (an empty list
/// deletes every team).
#[derive(Debug, Clone, Default)]
pub struct MatchPatch {
    pub name: Option<String>,
    pub status: Option<MatchStatus>,
    pub start_time: Field<DateTime<Utc>>,
    pub location: Field<String>,
    pub tournament: Field<String>,
    pub notes: Field<String>,
    pub config: Field<Value>,
    pub teams: Option<Vec<TeamDraft>>,
}

impl MatchPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.start_time.is_absent()
            && self.location.is_absent()
            && self.tournament.is_absent()
            && self.notes.is_absent()
            && self.config.is_absent()
            && self.teams.is_none()
    }
}

/// An incoming team descriptor: an id means "update/retain this team", no id
/// means "create a new one under the match".
#[derive(Debug, Clone)]
pub struct TeamDraft {
    pub id: Option<Uuid>,
    pub name: String,
    pub color: Field<String>,
    pub is_home: Field<bool>,
}

/// A validated player creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerCreate {
    pub name: String,
    pub skill_rating: Option<u32>,
    pub position_pref: Option<String>,
}

/// A validated partial player update.
#[derive(Debug, Clone, Default)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub skill_rating: Field<u32>,
    pub position_pref: Field<String>,
}

impl PlayerPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.skill_rating.is_absent() && self.position_pref.is_absent()
    }
}

/// A validated event creation request. Referential checks against the
/// owning match happen afterwards, in [`crate::events`].
#[derive(Debug, Clone, Default)]
pub struct EventCreate {
    pub kind: String,
    pub team_id: Option<Uuid>,
    pub player_id: Option<Uuid>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub match_minute: Option<u32>,
    pub payload: Option<Value>,
    pub created_by: Option<String>,
}

// =============================================================================
// Match Validators
// =============================================================================

pub fn validate_match_create(body: &Value) -> ValidationResult<MatchCreate> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    Ok(MatchCreate {
        name: fields::required_string(obj.get("name"), "name", "Name")?,
        status: fields::status(obj.get("status"), true)?,
        start_time: fields::date(obj.get("startTime"), "startTime", "Start time", true)?
            .into_option(),
        location: fields::optional_string(obj.get("location"), "location", "Location", true)?
            .into_option(),
        tournament: fields::optional_string(obj.get("tournament"), "tournament", "Tournament", true)?
            .into_option(),
        notes: fields::optional_string(obj.get("notes"), "notes", "Notes", true)?.into_option(),
        config: fields::json_blob(obj.get("config"), "config", "Config must be an object.", true)?
            .into_option(),
        teams: parse_teams(obj.get("teams"), true)?,
    })
}

pub fn validate_match_update(body: &Value) -> ValidationResult<MatchPatch> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let mut patch = MatchPatch::default();

    if obj.contains_key("name") {
        patch.name = Some(fields::required_string(obj.get("name"), "name", "Name")?);
    }
    if obj.contains_key("status") {
        patch.status = fields::status(obj.get("status"), false)?;
    }
    if obj.contains_key("startTime") {
        patch.start_time = fields::date(obj.get("startTime"), "startTime", "Start time", false)?;
    }
    if obj.contains_key("location") {
        patch.location = fields::optional_string(obj.get("location"), "location", "Location", true)?;
    }
    if obj.contains_key("tournament") {
        patch.tournament =
            fields::optional_string(obj.get("tournament"), "tournament", "Tournament", true)?;
    }
    if obj.contains_key("notes") {
        patch.notes = fields::optional_string(obj.get("notes"), "notes", "Notes", true)?;
    }
    if obj.contains_key("config") {
        patch.config =
            fields::json_blob(obj.get("config"), "config", "Config must be an object.", false)?;
    }
    if obj.contains_key("teams") {
        patch.teams = parse_teams(obj.get("teams"), false)?;
    }

    if patch.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    Ok(patch)
}

fn parse_teams(value: Option<&Value>, allow_empty: bool) -> ValidationResult<Option<Vec<TeamDraft>>> {
    let items = match value {
        None | Some(Value::Null) => {
            // On update, a null team list means "the empty list".
            return Ok(if allow_empty { None } else { Some(Vec::new()) });
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return if allow_empty {
                Ok(None)
            } else {
                Err(FieldError::new("teams", "Teams must be an array.").into())
            };
        }
    };

    items
        .iter()
        .map(parse_team)
        .collect::<ValidationResult<Vec<_>>>()
        .map(Some)
}

fn parse_team(value: &Value) -> ValidationResult<TeamDraft> {
    let obj = value
        .as_object()
        .ok_or_else(|| FieldError::new("teams", "Each team must be an object."))?;

    Ok(TeamDraft {
        id: fields::identifier(obj.get("id"), "id", true)?.into_option(),
        name: fields::required_string(obj.get("name"), "name", "Name")?,
        color: fields::optional_string(obj.get("color"), "color", "Color", true)?,
        is_home: fields::boolean(obj.get("isHome"), "isHome", "Home flag")?,
    })
}

// =============================================================================
// Player Validators
// =============================================================================

pub fn validate_player_create(body: &Value) -> ValidationResult<PlayerCreate> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    Ok(PlayerCreate {
        name: fields::required_string(obj.get("name"), "name", "Name")?,
        skill_rating: fields::skill_rating(obj.get("skillRating"), true)?.into_option(),
        position_pref: fields::position_pref(obj.get("positionPref"), true)?.into_option(),
    })
}

pub fn validate_player_update(body: &Value) -> ValidationResult<PlayerPatch> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let mut patch = PlayerPatch::default();

    if obj.contains_key("name") {
        patch.name = Some(fields::required_string(obj.get("name"), "name", "Name")?);
    }
    if obj.contains_key("skillRating") {
        patch.skill_rating = fields::skill_rating(obj.get("skillRating"), false)?;
    }
    if obj.contains_key("positionPref") {
        patch.position_pref = fields::position_pref(obj.get("positionPref"), false)?;
    }

    if patch.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    Ok(patch)
}

// =============================================================================
// Event Validator
// =============================================================================

pub fn validate_event_create(body: &Value) -> ValidationResult<EventCreate> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    Ok(EventCreate {
        kind: fields::required_string(obj.get("type"), "type", "Event type")?,
        team_id: fields::identifier(obj.get("teamId"), "teamId", true)?.into_option(),
        player_id: fields::identifier(obj.get("playerId"), "playerId", true)?.into_option(),
        occurred_at: fields::date(obj.get("occurredAt"), "occurredAt", "Occurred at", true)?
            .into_option(),
        match_minute: fields::match_minute(obj.get("matchMinute"), true)?.into_option(),
        payload: fields::json_blob(
            obj.get("payload"),
            "payload",
            "Payload must be an object or array.",
            true,
        )?
        .into_option(),
        created_by: fields::optional_string(obj.get("createdBy"), "createdBy", "Created by", true)?
            .into_option(),
    })
}

// =============================================================================
// Assignment Validator
// =============================================================================

/// Validate an assignment request body: `{ "playerId": "<uuid>" }`.
pub fn validate_assignment_create(body: &Value) -> ValidationResult<Uuid> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    fields::identifier(obj.get("playerId"), "playerId", true)?
        .into_option()
        .ok_or_else(|| FieldError::new("playerId", "Player id is required.").into())
}

// =============================================================================
// CSV Import
// =============================================================================

/// Validate one import row. Cells come in as trimmed strings keyed by
/// normalized header name; missing columns behave like missing keys.
pub fn validate_import_record(record: &HashMap<String, String>) -> ValidationResult<PlayerCreate> {
    let cell = |key: &str| record.get(key).map(|s| Value::String(s.clone()));

    let name = cell("name");
    let rating = cell("skillrating");
    let position = cell("positionpref");

    Ok(PlayerCreate {
        name: fields::required_string(name.as_ref(), "name", "Name")?,
        skill_rating: fields::skill_rating(rating.as_ref(), true)?.into_option(),
        position_pref: fields::position_pref(position.as_ref(), true)?.into_option(),
    })
}

/// The batch strategy: validate every row before anything is written.
///
/// All failures are reported together, one `"Row <n>: <message>"` entry per
/// offending row, with the header counted as row 1.
pub fn validate_import_rows(
    records: &[HashMap<String, String>],
) -> Result<Vec<PlayerCreate>, Vec<String>> {
    let mut players = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match validate_import_record(record) {
            Ok(player) => players.push(player),
            Err(err) => errors.push(format!("Row {}: {}", index + 2, err)),
        }
    }

    if errors.is_empty() {
        Ok(players)
    } else {
        Err(errors)
    }
}

// =============================================================================
// Tests
// =============================================================================

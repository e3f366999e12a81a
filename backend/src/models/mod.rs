//! Domain models for the Scoreline ingest pipeline.
//!
//! This module contains the core data structures used throughout the service:
//!
//! - [`Match`] - a sports match with its status and metadata
//! - [`MatchStatus`] - lifecycle status enum
//! - [`Team`] - a team owned by exactly one match
//! - [`Player`] - a player, independent of any match
//! - [`Assignment`] - links a player to a team within a match
//! - [`MatchEvent`] - something that happened during a match
//!
//! Aggregates ([`MatchDetail`], [`TeamDetail`], [`EventDetail`]) are the
//! response shapes assembled by the store; wire naming is camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// =============================================================================
// Match Status
// =============================================================================

/// Lifecycle status of a match.
///
/// Wire form is the screaming-snake symbol set
/// (`SCHEDULED`, `IN_PROGRESS`, `FINISHED`, `CANCELLED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Not started yet.
    #[default]
    Scheduled,
    /// Currently being played.
    InProgress,
    /// Played to completion.
    Finished,
    /// Called off.
    Cancelled,
}

impl MatchStatus {
    /// Parse a status from its wire symbol, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "SCHEDULED" => Some(Self::Scheduled),
            "IN_PROGRESS" => Some(Self::InProgress),
            "FINISHED" => Some(Self::Finished),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Convert to the wire symbol.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::Finished => "FINISHED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

// =============================================================================
// Match
// =============================================================================

/// A sports match.
///
/// `config` is an opaque structured blob the core never inspects beyond
/// "object or array shaped".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub name: String,
    pub status: MatchStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub tournament: Option<String>,
    pub notes: Option<String>,
    pub config: Option<Value>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Team
// =============================================================================

/// A team belonging to exactly one match.
///
/// `match_id` never changes after creation; the reconciliation engine is the
/// sole mutator of the match/team relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub match_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub is_home: Option<bool>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Player
// =============================================================================

/// A player, independent of any match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub skill_rating: Option<u32>,
    pub position_pref: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Assignment
// =============================================================================

/// Links one player to one team.
///
/// A player is assigned to at most one team per match; the store enforces
/// this at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Match Event
// =============================================================================

/// Something that happened during a match.
///
/// `payload` is an opaque structured blob, like [`Match::config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    pub id: Uuid,
    pub match_id: Uuid,
    pub team_id: Option<Uuid>,
    pub player_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: String,
    pub occurred_at: Option<DateTime<Utc>>,
    pub match_minute: Option<u32>,
    pub payload: Option<Value>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Aggregates
// =============================================================================

/// An assignment together with the assigned player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub player: Player,
}

/// A team together with its assigned players, in assignment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    pub players: Vec<AssignmentDetail>,
}

/// A match aggregate: teams (creation order, each with players) and events
/// (occurrence order).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub record: Match,
    pub teams: Vec<TeamDetail>,
    pub events: Vec<MatchEvent>,
}

/// A match with its teams only, as returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    #[serde(flatten)]
    pub record: Match,
    pub teams: Vec<Team>,
}

/// An event together with its resolved team and player references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: MatchEvent,
    pub team: Option<Team>,
    pub player: Option<Player>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_code() {
        assert_eq!(MatchStatus::from_code("SCHEDULED"), Some(MatchStatus::Scheduled));
        assert_eq!(MatchStatus::from_code("in_progress"), Some(MatchStatus::InProgress));
        assert_eq!(MatchStatus::from_code("  finished "), Some(MatchStatus::Finished));
        assert_eq!(MatchStatus::from_code("INPROGRESS"), None);
        assert_eq!(MatchStatus::from_code(""), None);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            MatchStatus::Scheduled,
            MatchStatus::InProgress,
            MatchStatus::Finished,
            MatchStatus::Cancelled,
        ] {
            assert_eq!(MatchStatus::from_code(status.as_code()), Some(status));
        }
    }

    #[test]
    fn test_status_wire_form() {
        let json = serde_json::to_string(&MatchStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_event_kind_serializes_as_type() {
        let event = MatchEvent {
            id: Uuid::new_v4(),
            match_id: Uuid::new_v4(),
            team_id: None,
            player_id: None,
            kind: "goal".into(),
            occurred_at: None,
            match_minute: Some(12),
            payload: None,
            created_by: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "goal");
        assert_eq!(json["matchMinute"], 12);
        assert!(json.get("kind").is_none());
    }
}

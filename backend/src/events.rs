//! Cross-reference checks for incoming events.
//!
//! An event may name a team, a player, both, or neither. Whatever it names
//! must be internally consistent with the owning match:
//!
//! - a supplied team must be owned by the match;
//! - a supplied player must be assigned to some team of the match;
//! - if both are supplied, the player's assignment team must equal the
//!   supplied team;
//! - if only the player is supplied, the event's effective team is the
//!   player's assignment team.
//!
//! Lookups go through [`EventLookup`], the narrow seam to the storage
//! collaborator, so the check itself stays storage-free and testable.

use uuid::Uuid;

use crate::error::ReferenceError;

/// The lookups the cross-reference check needs from storage.
pub trait EventLookup {
    /// Ids of the teams owned by the match, in creation order.
    fn owned_team_ids(&self, match_id: Uuid) -> Vec<Uuid>;

    /// The team the player is assigned to within the match, if any.
    fn assignment_team(&self, match_id: Uuid, player_id: Uuid) -> Option<Uuid>;
}

/// Resolve an event's effective team, rejecting inconsistent references.
///
/// Returns the team id the event should be stored with: the supplied team,
/// the player's assignment team when only a player was supplied, or `None`
/// when the event names neither.
pub fn resolve_event_team(
    lookup: &impl EventLookup,
    match_id: Uuid,
    team_id: Option<Uuid>,
    player_id: Option<Uuid>,
) -> Result<Option<Uuid>, ReferenceError> {
    if let Some(team) = team_id {
        if !lookup.owned_team_ids(match_id).contains(&team) {
            return Err(ReferenceError::ForeignTeam);
        }
    }

    let mut effective = team_id;

    if let Some(player) = player_id {
        let assigned = lookup
            .assignment_team(match_id, player)
            .ok_or(ReferenceError::UnassignedPlayer)?;

        match effective {
            None => effective = Some(assigned),
            Some(team) if team != assigned => return Err(ReferenceError::TeamMismatch),
            Some(_) => {}
        }
    }

    Ok(effective)
}

//! In-memory storage collaborator.
//!
//! Every multi-step mutation runs under a single write guard, which is what
//! makes it the "atomic transaction" the rest of the pipeline assumes: a
//! rejection partway leaves prior state unchanged, and reconciliation plans
//! are applied deletions-first, then updates, then creations, never as a
//! subset.
//!
//! Rows are stamped with a monotonic sequence number so creation order
//! survives the hash maps (list endpoints sort on it the way a database
//! would sort on `created_at`).

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::error::{ReferenceError, StoreError, StoreResult};
use crate::events::EventLookup;
use crate::models::{
    Assignment, AssignmentDetail, EventDetail, Match, MatchDetail, MatchEvent, MatchStatus,
    MatchSummary, Player, Team, TeamDetail,
};
use crate::reconcile::{plan_teams, TeamPlan};
use crate::validation::{EventCreate, MatchCreate, MatchPatch, PlayerCreate, PlayerPatch, TeamDraft};

// =============================================================================
// Queries and Pages
// =============================================================================

/// Filters for the match list.
#[derive(Debug, Clone, Default)]
pub struct MatchQuery {
    /// Case-insensitive name substring.
    pub search: Option<String>,
    pub status: Option<MatchStatus>,
    pub take: usize,
    pub skip: usize,
}

/// Filters for the player list.
#[derive(Debug, Clone, Default)]
pub struct PlayerQuery {
    pub search: Option<String>,
    pub take: usize,
    pub skip: usize,
}

/// One page of a listing plus the unpaged total.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

// =============================================================================
// Store
// =============================================================================

struct Stamped<T> {
    row: T,
    seq: u64,
}

#[derive(Default)]
struct Inner {
    seq: u64,
    matches: HashMap<Uuid, Stamped<Match>>,
    teams: HashMap<Uuid, Stamped<Team>>,
    players: HashMap<Uuid, Stamped<Player>>,
    assignments: HashMap<Uuid, Stamped<Assignment>>,
    events: HashMap<Uuid, Stamped<MatchEvent>>,
}

/// The in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Matches
    // -------------------------------------------------------------------------

    pub fn create_match(&self, input: MatchCreate) -> MatchDetail {
        let mut inner = self.write();

        let record = Match {
            id: Uuid::new_v4(),
            name: input.name,
            status: input.status.unwrap_or_default(),
            start_time: input.start_time,
            location: input.location,
            tournament: input.tournament,
            notes: input.notes,
            config: input.config,
            created_at: Utc::now(),
        };
        let id = record.id;
        let seq = next_seq(&mut inner);
        inner.matches.insert(
            id,
            Stamped {
                row: record.clone(),
                seq,
            },
        );

        for draft in input.teams.unwrap_or_default() {
            // Ids on create-path descriptors are ignored; every team is new.
            insert_team(&mut inner, id, draft);
        }

        match_detail(&inner, record)
    }

    pub fn match_exists(&self, id: Uuid) -> bool {
        self.read().matches.contains_key(&id)
    }

    pub fn get_match(&self, id: Uuid) -> StoreResult<MatchDetail> {
        let inner = self.read();
        let record = inner
            .matches
            .get(&id)
            .ok_or(StoreError::MatchNotFound)?
            .row
            .clone();
        Ok(match_detail(&inner, record))
    }

    pub fn list_matches(&self, query: &MatchQuery) -> Page<MatchSummary> {
        let inner = self.read();
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        let mut rows: Vec<&Stamped<Match>> = inner
            .matches
            .values()
            .filter(|s| {
                needle
                    .as_ref()
                    .map_or(true, |n| s.row.name.to_lowercase().contains(n))
            })
            .filter(|s| query.status.map_or(true, |status| s.row.status == status))
            .collect();
        rows.sort_by(|a, b| b.seq.cmp(&a.seq));

        let total = rows.len();
        let items = rows
            .into_iter()
            .skip(query.skip)
            .take(query.take)
            .map(|s| MatchSummary {
                record: s.row.clone(),
                teams: teams_of(&inner, s.row.id),
            })
            .collect();

        Page { items, total }
    }

    /// Apply a partial update, reconciling the team collection when the
    /// payload describes one. The plan is computed in full before anything
    /// is mutated, then applied deletions-first under the same guard, and
    /// the aggregate is re-read for a consistent snapshot.
    pub fn update_match(&self, id: Uuid, patch: MatchPatch) -> StoreResult<MatchDetail> {
        let mut inner = self.write();

        if !inner.matches.contains_key(&id) {
            return Err(StoreError::MatchNotFound);
        }

        let plan: Option<TeamPlan> = match &patch.teams {
            Some(incoming) => {
                let existing: Vec<Uuid> =
                    teams_of(&inner, id).iter().map(|team| team.id).collect();
                Some(plan_teams(&existing, incoming)?)
            }
            None => None,
        };

        if let Some(stamped) = inner.matches.get_mut(&id) {
            if let Some(name) = patch.name {
                stamped.row.name = name;
            }
            if let Some(status) = patch.status {
                stamped.row.status = status;
            }
            patch.start_time.apply(&mut stamped.row.start_time);
            patch.location.apply(&mut stamped.row.location);
            patch.tournament.apply(&mut stamped.row.tournament);
            patch.notes.apply(&mut stamped.row.notes);
            patch.config.apply(&mut stamped.row.config);
        }

        if let Some(plan) = plan {
            apply_team_plan(&mut inner, id, plan);
        }

        let record = inner
            .matches
            .get(&id)
            .map(|s| s.row.clone())
            .ok_or(StoreError::MatchNotFound)?;
        Ok(match_detail(&inner, record))
    }

    pub fn delete_match(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.write();

        inner.matches.remove(&id).ok_or(StoreError::MatchNotFound)?;

        let team_ids: Vec<Uuid> = inner
            .teams
            .values()
            .filter(|s| s.row.match_id == id)
            .map(|s| s.row.id)
            .collect();

        inner.events.retain(|_, s| s.row.match_id != id);
        inner
            .assignments
            .retain(|_, s| !team_ids.contains(&s.row.team_id));
        for team_id in team_ids {
            inner.teams.remove(&team_id);
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Players
    // -------------------------------------------------------------------------

    pub fn create_player(&self, input: PlayerCreate) -> Player {
        let mut inner = self.write();
        insert_player(&mut inner, input)
    }

    pub fn get_player(&self, id: Uuid) -> StoreResult<Player> {
        self.read()
            .players
            .get(&id)
            .map(|s| s.row.clone())
            .ok_or(StoreError::PlayerNotFound)
    }

    pub fn list_players(&self, query: &PlayerQuery) -> Page<Player> {
        let inner = self.read();
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        let mut rows: Vec<&Stamped<Player>> = inner
            .players
            .values()
            .filter(|s| {
                needle
                    .as_ref()
                    .map_or(true, |n| s.row.name.to_lowercase().contains(n))
            })
            .collect();
        rows.sort_by(|a, b| b.seq.cmp(&a.seq));

        let total = rows.len();
        let items = rows
            .into_iter()
            .skip(query.skip)
            .take(query.take)
            .map(|s| s.row.clone())
            .collect();

        Page { items, total }
    }

    pub fn update_player(&self, id: Uuid, patch: PlayerPatch) -> StoreResult<Player> {
        let mut inner = self.write();
        let stamped = inner.players.get_mut(&id).ok_or(StoreError::PlayerNotFound)?;

        if let Some(name) = patch.name {
            stamped.row.name = name;
        }
        patch.skill_rating.apply(&mut stamped.row.skill_rating);
        patch.position_pref.apply(&mut stamped.row.position_pref);

        Ok(stamped.row.clone())
    }

    pub fn delete_player(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.write();

        inner.players.remove(&id).ok_or(StoreError::PlayerNotFound)?;
        inner.assignments.retain(|_, s| s.row.player_id != id);
        for event in inner.events.values_mut() {
            if event.row.player_id == Some(id) {
                event.row.player_id = None;
            }
        }

        Ok(())
    }

    /// Batch insert for CSV import. The caller has already validated every
    /// row; one guard covers the whole batch.
    pub fn import_players(&self, inputs: Vec<PlayerCreate>) -> Vec<Player> {
        let mut inner = self.write();
        inputs
            .into_iter()
            .map(|input| insert_player(&mut inner, input))
            .collect()
    }

    pub fn player_count(&self) -> usize {
        self.read().players.len()
    }

    // -------------------------------------------------------------------------
    // Assignments
    // -------------------------------------------------------------------------

    /// Assign a player to a team of a match. At most one team per match per
    /// player, enforced here, at construction.
    pub fn assign_player(
        &self,
        match_id: Uuid,
        team_id: Uuid,
        player_id: Uuid,
    ) -> StoreResult<AssignmentDetail> {
        let mut inner = self.write();

        if !inner.matches.contains_key(&match_id) {
            return Err(StoreError::MatchNotFound);
        }
        let team_owned = inner
            .teams
            .get(&team_id)
            .map_or(false, |s| s.row.match_id == match_id);
        if !team_owned {
            return Err(ReferenceError::ForeignTeam.into());
        }
        let player = inner
            .players
            .get(&player_id)
            .ok_or(StoreError::PlayerNotFound)?
            .row
            .clone();

        let already_assigned = inner.assignments.values().any(|s| {
            s.row.player_id == player_id
                && inner
                    .teams
                    .get(&s.row.team_id)
                    .map_or(false, |t| t.row.match_id == match_id)
        });
        if already_assigned {
            return Err(StoreError::AlreadyAssigned);
        }

        let assignment = Assignment {
            id: Uuid::new_v4(),
            team_id,
            player_id,
            created_at: Utc::now(),
        };
        let seq = next_seq(&mut inner);
        inner.assignments.insert(
            assignment.id,
            Stamped {
                row: assignment.clone(),
                seq,
            },
        );

        Ok(AssignmentDetail { assignment, player })
    }

    pub fn unassign_player(
        &self,
        match_id: Uuid,
        team_id: Uuid,
        player_id: Uuid,
    ) -> StoreResult<()> {
        let mut inner = self.write();

        let assignment_id = inner
            .assignments
            .values()
            .find(|s| {
                s.row.team_id == team_id
                    && s.row.player_id == player_id
                    && inner
                        .teams
                        .get(&team_id)
                        .map_or(false, |t| t.row.match_id == match_id)
            })
            .map(|s| s.row.id)
            .ok_or(StoreError::AssignmentNotFound)?;

        inner.assignments.remove(&assignment_id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Insert an event. `team_id` is the effective team resolved by the
    /// cross-reference check, not the raw input value.
    pub fn create_event(
        &self,
        match_id: Uuid,
        input: EventCreate,
        team_id: Option<Uuid>,
    ) -> StoreResult<EventDetail> {
        let mut inner = self.write();

        if !inner.matches.contains_key(&match_id) {
            return Err(StoreError::MatchNotFound);
        }

        let event = MatchEvent {
            id: Uuid::new_v4(),
            match_id,
            team_id,
            player_id: input.player_id,
            kind: input.kind,
            occurred_at: input.occurred_at,
            match_minute: input.match_minute,
            payload: input.payload,
            created_by: input.created_by,
            created_at: Utc::now(),
        };
        let seq = next_seq(&mut inner);
        inner.events.insert(
            event.id,
            Stamped {
                row: event.clone(),
                seq,
            },
        );

        Ok(event_detail(&inner, event))
    }

    pub fn timeline(&self, match_id: Uuid) -> StoreResult<Vec<EventDetail>> {
        let inner = self.read();

        if !inner.matches.contains_key(&match_id) {
            return Err(StoreError::MatchNotFound);
        }

        Ok(events_of(&inner, match_id)
            .into_iter()
            .map(|event| event_detail(&inner, event))
            .collect())
    }
}

impl EventLookup for MemoryStore {
    fn owned_team_ids(&self, match_id: Uuid) -> Vec<Uuid> {
        teams_of(&self.read(), match_id)
            .into_iter()
            .map(|team| team.id)
            .collect()
    }

    fn assignment_team(&self, match_id: Uuid, player_id: Uuid) -> Option<Uuid> {
        let inner = self.read();
        inner
            .assignments
            .values()
            .find(|s| {
                s.row.player_id == player_id
                    && inner
                        .teams
                        .get(&s.row.team_id)
                        .map_or(false, |t| t.row.match_id == match_id)
            })
            .map(|s| s.row.team_id)
    }
}

// =============================================================================
// Internals
// =============================================================================

fn next_seq(inner: &mut Inner) -> u64 {
    inner.seq += 1;
    inner.seq
}

fn insert_team(inner: &mut Inner, match_id: Uuid, draft: TeamDraft) -> Uuid {
    let team = Team {
        id: Uuid::new_v4(),
        match_id,
        name: draft.name,
        color: draft.color.into_option(),
        is_home: draft.is_home.into_option(),
        created_at: Utc::now(),
    };
    let id = team.id;
    let seq = next_seq(inner);
    inner.teams.insert(id, Stamped { row: team, seq });
    id
}

fn insert_player(inner: &mut Inner, input: PlayerCreate) -> Player {
    let player = Player {
        id: Uuid::new_v4(),
        name: input.name,
        skill_rating: input.skill_rating,
        position_pref: input.position_pref,
        created_at: Utc::now(),
    };
    let seq = next_seq(inner);
    inner.players.insert(
        player.id,
        Stamped {
            row: player.clone(),
            seq,
        },
    );
    player
}

/// Delete, then update, then create. Order matters and is part of the
/// contract with the reconciliation engine.
fn apply_team_plan(inner: &mut Inner, match_id: Uuid, plan: TeamPlan) {
    for team_id in &plan.delete {
        remove_team(inner, *team_id);
    }

    for (team_id, draft) in plan.update {
        if let Some(stamped) = inner.teams.get_mut(&team_id) {
            stamped.row.name = draft.name;
            draft.color.apply(&mut stamped.row.color);
            draft.is_home.apply(&mut stamped.row.is_home);
        }
    }

    for draft in plan.create {
        insert_team(inner, match_id, draft);
    }
}

fn remove_team(inner: &mut Inner, team_id: Uuid) {
    inner.teams.remove(&team_id);
    inner.assignments.retain(|_, s| s.row.team_id != team_id);
    // Events keep existing but lose the dangling team reference.
    for event in inner.events.values_mut() {
        if event.row.team_id == Some(team_id) {
            event.row.team_id = None;
        }
    }
}

fn teams_of(inner: &Inner, match_id: Uuid) -> Vec<Team> {
    let mut rows: Vec<&Stamped<Team>> = inner
        .teams
        .values()
        .filter(|s| s.row.match_id == match_id)
        .collect();
    rows.sort_by_key(|s| s.seq);
    rows.into_iter().map(|s| s.row.clone()).collect()
}

fn roster_of(inner: &Inner, team_id: Uuid) -> Vec<AssignmentDetail> {
    let mut rows: Vec<&Stamped<Assignment>> = inner
        .assignments
        .values()
        .filter(|s| s.row.team_id == team_id)
        .collect();
    rows.sort_by_key(|s| s.seq);
    rows.into_iter()
        .filter_map(|s| {
            inner.players.get(&s.row.player_id).map(|p| AssignmentDetail {
                assignment: s.row.clone(),
                player: p.row.clone(),
            })
        })
        .collect()
}

fn events_of(inner: &Inner, match_id: Uuid) -> Vec<MatchEvent> {
    let mut rows: Vec<&Stamped<MatchEvent>> = inner
        .events
        .values()
        .filter(|s| s.row.match_id == match_id)
        .collect();
    rows.sort_by_key(|s| (s.row.occurred_at.unwrap_or(s.row.created_at), s.seq));
    rows.into_iter().map(|s| s.row.clone()).collect()
}

fn event_detail(inner: &Inner, event: MatchEvent) -> EventDetail {
    let team = event
        .team_id
        .and_then(|id| inner.teams.get(&id))
        .map(|s| s.row.clone());
    let player = event
        .player_id
        .and_then(|id| inner.players.get(&id))
        .map(|s| s.row.clone());
    EventDetail { event, team, player }
}

fn match_detail(inner: &Inner, record: Match) -> MatchDetail {
    let teams = teams_of(inner, record.id)
        .into_iter()
        .map(|team| TeamDetail {
            players: roster_of(inner, team.id),
            team,
        })
        .collect();
    let events = events_of(inner, record.id);
    MatchDetail {
        record,
        teams,
        events,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::resolve_event_team;
    use crate::fields::Field;
    use chrono::TimeZone;

    fn draft(name: &str) -> TeamDraft {
        TeamDraft {
            id: None,
            name: name.to_string(),
            color: Field::Absent,
            is_home: Field::Absent,
        }
    }

    fn match_with_teams(store: &MemoryStore, names: &[&str]) -> MatchDetail {
        store.create_match(MatchCreate {
            name: "Test Match".into(),
            teams: Some(names.iter().map(|n| draft(n)).collect()),
            ..Default::default()
        })
    }

    #[test]
    fn test_create_match_with_teams_in_order() {
        let store = MemoryStore::new();
        let detail = match_with_teams(&store, &["Alpha", "Beta"]);

        assert_eq!(detail.record.status, MatchStatus::Scheduled);
        let names: Vec<_> = detail.teams.iter().map(|t| t.team.name.clone()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert!(detail.teams.iter().all(|t| t.team.match_id == detail.record.id));
    }

    #[test]
    fn test_update_omitted_fields_unchanged() {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let created = store.create_match(MatchCreate {
            name: "Original".into(),
            start_time: Some(start),
            location: Some("Arena".into()),
            ..Default::default()
        });

        let updated = store
            .update_match(
                created.record.id,
                MatchPatch {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.record.name, "Renamed");
        assert_eq!(updated.record.start_time, Some(start));
        assert_eq!(updated.record.location.as_deref(), Some("Arena"));
    }

    #[test]
    fn test_update_clear_fields() {
        let store = MemoryStore::new();
        let created = store.create_match(MatchCreate {
            name: "M".into(),
            location: Some("Arena".into()),
            notes: Some("bring cones".into()),
            ..Default::default()
        });

        let updated = store
            .update_match(
                created.record.id,
                MatchPatch {
                    location: Field::Clear,
                    notes: Field::Set("rescheduled".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.record.location, None);
        assert_eq!(updated.record.notes.as_deref(), Some("rescheduled"));
    }

    #[test]
    fn test_update_reconciles_teams() {
        let store = MemoryStore::new();
        let created = match_with_teams(&store, &["Keep", "Drop"]);
        let keep_id = created.teams[0].team.id;

        let updated = store
            .update_match(
                created.record.id,
                MatchPatch {
                    teams: Some(vec![
                        TeamDraft {
                            id: Some(keep_id),
                            name: "Kept".into(),
                            color: Field::Set("green".into()),
                            is_home: Field::Absent,
                        },
                        draft("Fresh"),
                    ]),
                    ..Default::default()
                },
            )
            .unwrap();

        let names: Vec<_> = updated.teams.iter().map(|t| t.team.name.clone()).collect();
        assert_eq!(names, vec!["Kept", "Fresh"]);
        assert_eq!(updated.teams[0].team.id, keep_id);
        assert_eq!(updated.teams[0].team.color.as_deref(), Some("green"));
    }

    #[test]
    fn test_update_with_foreign_team_mutates_nothing() {
        let store = MemoryStore::new();
        let victim = match_with_teams(&store, &["Mine"]);
        let other = match_with_teams(&store, &["Theirs"]);
        let foreign_id = other.teams[0].team.id;

        let result = store.update_match(
            victim.record.id,
            MatchPatch {
                name: Some("Should not land".into()),
                teams: Some(vec![TeamDraft {
                    id: Some(foreign_id),
                    name: "Hijack".into(),
                    color: Field::Absent,
                    is_home: Field::Absent,
                }]),
                ..Default::default()
            },
        );
        assert!(matches!(
            result,
            Err(StoreError::Reconcile(crate::error::ReconcileError::ForeignTeam))
        ));

        // Prior state fully intact, on both matches.
        let unchanged = store.get_match(victim.record.id).unwrap();
        assert_eq!(unchanged.record.name, "Test Match");
        assert_eq!(unchanged.teams[0].team.name, "Mine");
        assert_eq!(store.get_match(other.record.id).unwrap().teams[0].team.name, "Theirs");
    }

    #[test]
    fn test_update_teams_absent_vs_empty() {
        let store = MemoryStore::new();
        let created = match_with_teams(&store, &["A", "B"]);

        let untouched = store
            .update_match(
                created.record.id,
                MatchPatch {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(untouched.teams.len(), 2);

        let emptied = store
            .update_match(
                created.record.id,
                MatchPatch {
                    teams: Some(Vec::new()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(emptied.teams.is_empty());
    }

    #[test]
    fn test_delete_match_cascades() {
        let store = MemoryStore::new();
        let detail = match_with_teams(&store, &["A"]);
        let match_id = detail.record.id;
        let team_id = detail.teams[0].team.id;

        let player = store.create_player(PlayerCreate {
            name: "P".into(),
            ..Default::default()
        });
        store.assign_player(match_id, team_id, player.id).unwrap();
        store
            .create_event(
                match_id,
                EventCreate {
                    kind: "goal".into(),
                    ..Default::default()
                },
                Some(team_id),
            )
            .unwrap();

        store.delete_match(match_id).unwrap();

        assert!(matches!(store.get_match(match_id), Err(StoreError::MatchNotFound)));
        assert!(store.owned_team_ids(match_id).is_empty());
        assert_eq!(store.assignment_team(match_id, player.id), None);
        // Players survive the cascade.
        assert!(store.get_player(player.id).is_ok());
    }

    #[test]
    fn test_assignment_unique_per_match() {
        let store = MemoryStore::new();
        let detail = match_with_teams(&store, &["A", "B"]);
        let match_id = detail.record.id;
        let player = store.create_player(PlayerCreate {
            name: "P".into(),
            ..Default::default()
        });

        store
            .assign_player(match_id, detail.teams[0].team.id, player.id)
            .unwrap();
        let second = store.assign_player(match_id, detail.teams[1].team.id, player.id);
        assert!(matches!(second, Err(StoreError::AlreadyAssigned)));

        // First assignment intact.
        assert_eq!(
            store.assignment_team(match_id, player.id),
            Some(detail.teams[0].team.id)
        );
    }

    #[test]
    fn test_assign_rejects_foreign_team_and_unknown_player() {
        let store = MemoryStore::new();
        let mine = match_with_teams(&store, &["A"]);
        let other = match_with_teams(&store, &["B"]);

        let result = store.assign_player(mine.record.id, other.teams[0].team.id, Uuid::new_v4());
        assert!(matches!(
            result,
            Err(StoreError::Reference(ReferenceError::ForeignTeam))
        ));

        let result = store.assign_player(mine.record.id, mine.teams[0].team.id, Uuid::new_v4());
        assert!(matches!(result, Err(StoreError::PlayerNotFound)));
    }

    #[test]
    fn test_event_resolution_through_store() {
        let store = MemoryStore::new();
        let detail = match_with_teams(&store, &["T"]);
        let match_id = detail.record.id;
        let team_id = detail.teams[0].team.id;
        let player = store.create_player(PlayerCreate {
            name: "P".into(),
            ..Default::default()
        });
        store.assign_player(match_id, team_id, player.id).unwrap();

        // Player-only event resolves the assignment team.
        let effective = resolve_event_team(&store, match_id, None, Some(player.id)).unwrap();
        assert_eq!(effective, Some(team_id));

        let created = store
            .create_event(
                match_id,
                EventCreate {
                    kind: "goal".into(),
                    player_id: Some(player.id),
                    ..Default::default()
                },
                effective,
            )
            .unwrap();
        assert_eq!(created.event.team_id, Some(team_id));
        assert_eq!(created.team.as_ref().map(|t| t.id), Some(team_id));
        assert_eq!(created.player.as_ref().map(|p| p.id), Some(player.id));
    }

    #[test]
    fn test_timeline_ordering() {
        let store = MemoryStore::new();
        let detail = match_with_teams(&store, &[]);
        let match_id = detail.record.id;

        let later = Utc.with_ymd_and_hms(2024, 6, 1, 19, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();

        store
            .create_event(
                match_id,
                EventCreate {
                    kind: "second".into(),
                    occurred_at: Some(later),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        store
            .create_event(
                match_id,
                EventCreate {
                    kind: "first".into(),
                    occurred_at: Some(earlier),
                    ..Default::default()
                },
                None,
            )
            .unwrap();

        let kinds: Vec<_> = store
            .timeline(match_id)
            .unwrap()
            .into_iter()
            .map(|e| e.event.kind)
            .collect();
        assert_eq!(kinds, vec!["first", "second"]);

        assert!(matches!(
            store.timeline(Uuid::new_v4()),
            Err(StoreError::MatchNotFound)
        ));
    }

    #[test]
    fn test_import_players_batch() {
        let store = MemoryStore::new();
        let players = store.import_players(vec![
            PlayerCreate {
                name: "A".into(),
                skill_rating: Some(5),
                ..Default::default()
            },
            PlayerCreate {
                name: "B".into(),
                ..Default::default()
            },
        ]);
        assert_eq!(players.len(), 2);
        assert_eq!(store.player_count(), 2);
    }

    #[test]
    fn test_list_matches_filters_and_pages() {
        let store = MemoryStore::new();
        for name in ["City Derby", "Cup Final", "Friendly"] {
            store.create_match(MatchCreate {
                name: name.into(),
                ..Default::default()
            });
        }

        let page = store.list_matches(&MatchQuery {
            search: Some("c".into()),
            take: 1,
            skip: 0,
            ..Default::default()
        });
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        // Newest first.
        assert_eq!(page.items[0].record.name, "Cup Final");

        let filtered = store.list_matches(&MatchQuery {
            status: Some(MatchStatus::Finished),
            take: 20,
            ..Default::default()
        });
        assert_eq!(filtered.total, 0);
    }

    #[test]
    fn test_player_update_tri_state() {
        let store = MemoryStore::new();
        let player = store.create_player(PlayerCreate {
            name: "P".into(),
            skill_rating: Some(4),
            position_pref: Some("wing".into()),
        });

        let updated = store
            .update_player(
                player.id,
                PlayerPatch {
                    skill_rating: Field::Clear,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.skill_rating, None);
        assert_eq!(updated.position_pref.as_deref(), Some("wing"));

        store.delete_player(player.id).unwrap();
        assert!(matches!(store.get_player(player.id), Err(StoreError::PlayerNotFound)));
    }

    #[test]
    fn test_unassign_player() {
        let store = MemoryStore::new();
        let detail = match_with_teams(&store, &["A"]);
        let match_id = detail.record.id;
        let team_id = detail.teams[0].team.id;
        let player = store.create_player(PlayerCreate {
            name: "P".into(),
            ..Default::default()
        });

        store.assign_player(match_id, team_id, player.id).unwrap();
        store.unassign_player(match_id, team_id, player.id).unwrap();
        assert_eq!(store.assignment_team(match_id, player.id), None);

        let again = store.unassign_player(match_id, team_id, player.id);
        assert!(matches!(again, Err(StoreError::AssignmentNotFound)));
    }
}

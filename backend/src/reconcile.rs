//! Team reconciliation: diff a match's owned teams against an incoming
//! description.
//!
//! Given the set of team ids a match currently owns and an ordered list of
//! incoming descriptors, [`plan_teams`] computes the three operation sets —
//! delete, update, create — before anything is mutated. A descriptor that
//! names a team owned by a different match rejects the whole plan; nothing
//! is applied.
//!
//! The store applies a plan as one atomic unit, deletions first, then
//! updates, then creations, and re-reads the aggregate afterwards.

use std::collections::HashSet;
use uuid::Uuid;

use crate::error::ReconcileError;
use crate::validation::TeamDraft;

/// The computed operation sets for one reconciliation.
///
/// The three sets partition every referenced team: `delete` is exactly the
/// existing ids not referenced by any descriptor (existing order preserved),
/// `update` is the descriptors carrying a recognized id, `create` is the
/// descriptors without one, both in incoming order.
#[derive(Debug, Clone, Default)]
pub struct TeamPlan {
    pub delete: Vec<Uuid>,
    pub update: Vec<(Uuid, TeamDraft)>,
    pub create: Vec<TeamDraft>,
}

/// Compute the delete/update/create plan for a match's team collection.
pub fn plan_teams(existing: &[Uuid], incoming: &[TeamDraft]) -> Result<TeamPlan, ReconcileError> {
    let owned: HashSet<Uuid> = existing.iter().copied().collect();
    let mut referenced: HashSet<Uuid> = HashSet::new();

    for draft in incoming {
        if let Some(id) = draft.id {
            if !owned.contains(&id) {
                return Err(ReconcileError::ForeignTeam);
            }
            referenced.insert(id);
        }
    }

    Ok(TeamPlan {
        delete: existing
            .iter()
            .copied()
            .filter(|id| !referenced.contains(id))
            .collect(),
        update: incoming
            .iter()
            .filter_map(|draft| draft.id.map(|id| (id, draft.clone())))
            .collect(),
        create: incoming
            .iter()
            .filter(|draft| draft.id.is_none())
            .cloned()
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;

    fn draft(id: Option<Uuid>, name: &str) -> TeamDraft {
        TeamDraft {
            id,
            name: name.to_string(),
            color: Field::Absent,
            is_home: Field::Absent,
        }
    }

    #[test]
    fn test_plan_partitions_referenced_teams() {
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();
        let existing = vec![keep, drop];
        let incoming = vec![draft(Some(keep), "Keep"), draft(None, "New")];

        let plan = plan_teams(&existing, &incoming).unwrap();

        assert_eq!(plan.delete, vec![drop]);
        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.update[0].0, keep);
        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.create[0].name, "New");

        // No id appears in more than one set.
        assert!(!plan.delete.contains(&keep));
        assert!(plan.update.iter().all(|(id, _)| !plan.delete.contains(id)));
    }

    #[test]
    fn test_foreign_id_rejects_whole_plan() {
        let owned = Uuid::new_v4();
        let foreign = Uuid::new_v4();
        let incoming = vec![draft(Some(owned), "Fine"), draft(Some(foreign), "Stolen")];

        let result = plan_teams(&[owned], &incoming);
        assert!(matches!(result, Err(ReconcileError::ForeignTeam)));
    }

    #[test]
    fn test_empty_incoming_deletes_everything() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let plan = plan_teams(&[a, b], &[]).unwrap();

        assert_eq!(plan.delete, vec![a, b]);
        assert!(plan.update.is_empty());
        assert!(plan.create.is_empty());
    }

    #[test]
    fn test_empty_existing_creates_everything() {
        let plan = plan_teams(&[], &[draft(None, "A"), draft(None, "B")]).unwrap();
        assert!(plan.delete.is_empty());
        assert!(plan.update.is_empty());
        assert_eq!(plan.create.len(), 2);
    }

    #[test]
    fn test_delete_preserves_existing_order() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let incoming = vec![draft(Some(ids[2]), "Kept")];

        let plan = plan_teams(&ids, &incoming).unwrap();
        assert_eq!(plan.delete, vec![ids[0], ids[1], ids[3]]);
    }
}

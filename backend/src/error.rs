//! Error types for the Scoreline ingest pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV tokenizing/parsing errors
//! - [`FieldError`] - single-field validation errors
//! - [`ValidationError`] - whole-record validation errors
//! - [`ReconcileError`] - team reconciliation errors
//! - [`ReferenceError`] - event cross-reference errors
//! - [`StoreError`] - storage collaborator errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors that abort a CSV parse as a whole.
///
/// Per-row problems (a data row wider than the header) are not fatal and are
/// collected on [`crate::parser::CsvTable::row_errors`] instead.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// End of input reached while still inside a quoted field.
    #[error("CSV contains unmatched quote characters.")]
    UnmatchedQuote,

    /// No header cell normalizes to `name`.
    #[error("CSV header must include a \"name\" column.")]
    MissingNameColumn,
}

// =============================================================================
// Field Validation Errors
// =============================================================================

/// A single field failed its validation rule.
///
/// `field` is the wire key (`"startTime"`, `"skillRating"`, ...); the message
/// is the human-readable text returned to the caller and already names the
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

// =============================================================================
// Record Validation Errors
// =============================================================================

/// A whole record failed validation.
///
/// Record validators fail fast: the first violated field aborts the record,
/// so there is always exactly one message. CSV import accumulates these
/// per row instead (see [`crate::validation::validate_import_rows`]).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The request body was not a JSON object.
    #[error("Body must be a JSON object.")]
    NotAnObject,

    /// An update payload contained no recognized fields.
    #[error("At least one field must be provided for update.")]
    EmptyUpdate,

    /// A field violated its rule.
    #[error(transparent)]
    Field(#[from] FieldError),
}

// =============================================================================
// Reconciliation Errors
// =============================================================================

/// Errors from the team reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// An incoming descriptor carries the id of a team owned by another match.
    #[error("One or more teams do not belong to this match.")]
    ForeignTeam,
}

// =============================================================================
// Cross-Reference Errors
// =============================================================================

/// Errors from event team/player cross-reference checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The supplied team is not owned by the event's match.
    #[error("Team does not belong to this match.")]
    ForeignTeam,

    /// The supplied player has no assignment within the event's match.
    #[error("Player is not assigned to this match.")]
    UnassignedPlayer,

    /// The player's assignment team differs from the supplied team.
    #[error("Player assignment does not match the provided team.")]
    TeamMismatch,
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from the storage collaborator.
///
/// Not-found conditions are distinguishable from rule violations so the API
/// layer can map them to distinct outcomes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed match does not exist.
    #[error("Match not found.")]
    MatchNotFound,

    /// The addressed player does not exist.
    #[error("Player not found.")]
    PlayerNotFound,

    /// The addressed assignment does not exist.
    #[error("Assignment not found.")]
    AssignmentNotFound,

    /// The player already has a team within this match.
    #[error("Player is already assigned to a team in this match.")]
    AlreadyAssigned,

    /// Team reconciliation rejected the update.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// A cross-reference check rejected the operation.
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

impl StoreError {
    /// True for "the addressed entity does not exist" outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::MatchNotFound
                | StoreError::PlayerNotFound
                | StoreError::AssignmentNotFound
        )
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for field validators.
pub type FieldResult<T> = Result<T, FieldError>;

/// Result type for record validators.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // FieldError -> ValidationError
        let field_err = FieldError::new("name", "Name is required.");
        let validation_err: ValidationError = field_err.into();
        assert_eq!(validation_err.to_string(), "Name is required.");

        // ReconcileError -> StoreError
        let store_err: StoreError = ReconcileError::ForeignTeam.into();
        assert!(store_err.to_string().contains("do not belong"));
    }

    #[test]
    fn test_not_found_classification() {
        assert!(StoreError::MatchNotFound.is_not_found());
        assert!(StoreError::PlayerNotFound.is_not_found());
        assert!(!StoreError::AlreadyAssigned.is_not_found());
        assert!(!StoreError::Reconcile(ReconcileError::ForeignTeam).is_not_found());
    }
}

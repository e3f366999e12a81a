//! # Scoreline - sports match data validation and storage
//!
//! Scoreline ingests untyped external data (JSON request bodies and CSV
//! files) describing matches, teams, players and match events, and turns it
//! into validated, internally consistent records.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  JSON / CSV │────▶│  Validation │────▶│  Reconcile / │────▶│    Store    │
//! │   (untyped) │     │ (tri-state) │     │  Cross-ref   │     │  (atomic)   │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! Partial updates carry explicit tri-state fields ([`fields::Field`]):
//! a key absent from the payload leaves the stored value unchanged, a key
//! supplied as null/empty clears it, and a key with a usable value replaces
//! it. Team collections are reconciled against incoming descriptions
//! ([`reconcile::plan_teams`]) and applied as one atomic unit; events are
//! cross-checked against team/player assignments
//! ([`events::resolve_event_team`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scoreline::server::start_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     start_server(3000).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain records (Match, Team, Player, Assignment, MatchEvent)
//! - [`fields`] - Tri-state field validators
//! - [`parser`] - Hand-rolled CSV tokenizer for player import
//! - [`validation`] - Whole-record validators (fail-fast JSON, batch CSV)
//! - [`reconcile`] - Team collection reconciliation
//! - [`events`] - Event cross-reference checks
//! - [`store`] - In-memory storage collaborator
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod fields;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Reconciliation and cross-reference checks
pub mod events;
pub mod reconcile;

// Storage
pub mod store;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError, FieldError, ReconcileError, ReferenceError, StoreError, ValidationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Assignment, AssignmentDetail, EventDetail, Match, MatchDetail, MatchEvent, MatchStatus,
    MatchSummary, Player, Team, TeamDetail,
};

// =============================================================================
// Re-exports - Fields
// =============================================================================

pub use fields::Field;

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{normalize_header, parse_players_csv, parse_players_file, tokenize, CsvTable};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    validate_assignment_create, validate_event_create, validate_import_record,
    validate_import_rows, validate_match_create, validate_match_update, validate_player_create,
    validate_player_update, EventCreate, MatchCreate, MatchPatch, PlayerCreate, PlayerPatch,
    TeamDraft,
};

// =============================================================================
// Re-exports - Reconciliation
// =============================================================================

pub use reconcile::{plan_teams, TeamPlan};

// =============================================================================
// Re-exports - Events
// =============================================================================

pub use events::{resolve_event_team, EventLookup};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::{MatchQuery, MemoryStore, Page, PlayerQuery};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}

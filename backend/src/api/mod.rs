//! HTTP API module.
//!
//! Router and handlers for the Scoreline ingest API. Handlers validate and
//! cross-reference input, then hand validated shapes to the store; they hold
//! no state of their own beyond [`AppState`].

pub mod events;
pub mod matches;
pub mod players;
pub mod server;
pub mod types;

use std::sync::Arc;

use crate::store::MemoryStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
}

pub use server::{router, start_server};
pub use types::{ApiError, ApiResult};

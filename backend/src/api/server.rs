//! HTTP server for the Scoreline API.
//!
//! # API Endpoints
//!
//! | Method | Path                                            | Description                          |
//! |--------|-------------------------------------------------|--------------------------------------|
//! | GET    | `/health`                                       | Health check                         |
//! | GET    | `/api/matches`                                  | List matches (search/status/paging)  |
//! | POST   | `/api/matches`                                  | Create a match with optional teams   |
//! | GET    | `/api/matches/{id}`                             | Match aggregate                      |
//! | PUT    | `/api/matches/{id}`                             | Partial update + team reconciliation |
//! | DELETE | `/api/matches/{id}`                             | Cascading delete                     |
//! | GET    | `/api/matches/{id}/timeline`                    | Ordered events                       |
//! | POST   | `/api/matches/{id}/events`                      | Record an event                      |
//! | POST   | `/api/matches/{id}/teams/{tid}/players`         | Assign a player                      |
//! | DELETE | `/api/matches/{id}/teams/{tid}/players/{pid}`   | Unassign a player                    |
//! | GET    | `/api/players`                                  | List players                         |
//! | POST   | `/api/players`                                  | Create a player                      |
//! | GET    | `/api/players/{id}`                             | Fetch a player                       |
//! | PUT    | `/api/players/{id}`                             | Partial update                       |
//! | DELETE | `/api/players/{id}`                             | Delete a player                      |
//! | POST   | `/api/players/import`                           | CSV import (multipart, fail-closed)  |

use axum::{
    http::{header, Method},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{events, matches, players, AppState};
use crate::store::MemoryStore;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route(
            "/api/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            "/api/matches/{id}",
            get(matches::get_match)
                .put(matches::update_match)
                .delete(matches::delete_match),
        )
        .route("/api/matches/{id}/timeline", get(events::timeline))
        .route("/api/matches/{id}/events", post(events::create_event))
        .route(
            "/api/matches/{id}/teams/{team_id}/players",
            post(events::assign_player),
        )
        .route(
            "/api/matches/{id}/teams/{team_id}/players/{player_id}",
            delete(events::unassign_player),
        )
        .route(
            "/api/players",
            get(players::list_players).post(players::create_player),
        )
        .route("/api/players/import", post(players::import_players))
        .route(
            "/api/players/{id}",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the given port with a fresh store.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
    };
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Scoreline server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "scoreline",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

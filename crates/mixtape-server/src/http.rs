//! Short-lived HTTP endpoints that precede the persistent channel:
//! room creation, membership join, and health.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use mixtape_protocol::{PlayerId, RoomId};
use mixtape_room::{CleanupScheduler, RoomRegistry};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub cleanup: Arc<CleanupScheduler>,
}

/// Builds the HTTP API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/rooms", post(create_room))
        .route("/rooms/:id/join", post(join_room))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomRequest {
    connection_id: PlayerId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomResponse {
    room_id: RoomId,
}

async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Json<CreateRoomResponse> {
    let room_id = state.registry.create_room(req.connection_id);
    Json(CreateRoomResponse { room_id })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRoomRequest {
    connection_id: PlayerId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinRoomResponse {
    room_players: Vec<PlayerId>,
}

async fn join_room(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<JoinRoomRequest>,
) -> impl IntoResponse {
    let room_id = RoomId(id);
    match state.registry.join_room(&room_id, req.connection_id).await {
        Ok(snapshot) => {
            // A join that restores the minimum player count revives the
            // room: cancel any pending destruction timer. Won rooms are
            // terminal and stay condemned.
            if snapshot.members.len() >= 2 && snapshot.winner.is_none() {
                state.cleanup.cancel(&room_id);
            }
            Json(JoinRoomResponse {
                room_players: snapshot.members,
            })
            .into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "room not found").into_response(),
    }
}

//! Cluster-facing endpoints: state transfer and inbound replication events.
//!
//! Peers use these to bootstrap a joining node and to deliver the events
//! they publish. None of them fail on bad payloads; the coordinator logs and
//! ignores what it cannot decode.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use editlock_coordinator::replication::ApplyOutcome;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/cluster/state
///
/// Opaque snapshot of this node's lock table. An empty body means there is
/// nothing to transfer.
pub async fn export_state(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.coordinator.export_state();
    ([(CONTENT_TYPE, "application/octet-stream")], payload)
}

/// PUT /api/v1/cluster/state
///
/// Merge a snapshot exported by a peer. Returns how many entries changed.
pub async fn import_state(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let changed = state.coordinator.import_state(&body);
    Ok(Json(DataResponse {
        data: serde_json::json!({ "changed": changed }),
    }))
}

/// POST /api/v1/cluster/events
///
/// Apply a lock event published by a peer.
pub async fn receive_event(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let outcome = state.coordinator.receive_bytes(&body);
    let applied = !matches!(outcome, ApplyOutcome::Dropped);
    Ok(Json(DataResponse {
        data: serde_json::json!({ "applied": applied }),
    }))
}

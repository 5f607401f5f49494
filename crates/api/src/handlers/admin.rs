//! Operator endpoints: policy reload and on-demand sweep.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/locks/reload
///
/// Drop the cached lock policies so the next lookup re-reads every
/// descriptor source. Existing locks are reconciled by the next sweep.
pub async fn reload_configuration(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.coordinator.reload_configuration();
    tracing::info!("Lock configuration reload requested");
    Ok(Json(DataResponse {
        data: serde_json::json!({ "reloaded": true }),
    }))
}

/// POST /api/v1/admin/locks/expire
///
/// Run one expiration sweep now and report what it evicted.
pub async fn expire_locks(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = state.coordinator.expire_locks();
    Ok(Json(DataResponse { data: report }))
}

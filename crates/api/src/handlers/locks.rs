//! Handlers for acquiring, releasing and inspecting advisory locks.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use editlock_core::error::CoreError;
use editlock_core::locking::{validate_lock_key, LockInfo, LockRecord};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::identity::LockUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body for acquire and release requests.
#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub resource_type: String,
    pub resource_id: String,
}

/// Successful outcome of an acquire request.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AcquireResponse {
    /// The caller now holds the lock.
    Acquired,
    /// The resource type has no lock policy; the caller may proceed untracked.
    NotSupported,
}

/// Lock status of a single resource.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LockStatus {
    Known(LockInfo),
    Unlocked { state: &'static str },
}

impl From<Option<LockInfo>> for LockStatus {
    fn from(info: Option<LockInfo>) -> Self {
        match info {
            Some(info) => LockStatus::Known(info),
            None => LockStatus::Unlocked { state: "unlocked" },
        }
    }
}

fn conflict(holder: &LockRecord) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "{}/{} is locked by {} ({}) since {}",
        holder.resource_type,
        holder.resource_id,
        holder.owner_name,
        holder.owner_id,
        holder.acquired_at.to_rfc3339()
    )))
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/locks
///
/// Every lock this node currently knows about.
pub async fn list_locks(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.coordinator.current_locks(),
    }))
}

/// POST /api/v1/locks/acquire
///
/// Attempt to lock a resource for the calling user. Returns 409 if the
/// resource is already locked by anyone, including the caller.
pub async fn acquire_lock(
    LockUser(owner): LockUser,
    State(state): State<AppState>,
    Json(input): Json<LockRequest>,
) -> AppResult<impl IntoResponse> {
    validate_lock_key(&input.resource_type, &input.resource_id)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    match state
        .coordinator
        .lock_as(&owner, &input.resource_type, &input.resource_id)
    {
        None => Ok(Json(DataResponse {
            data: AcquireResponse::Acquired,
        })),
        Some(LockInfo::NotSupported) => {
            tracing::debug!(
                resource_type = %input.resource_type,
                "Lock requested for type without lock policy"
            );
            Ok(Json(DataResponse {
                data: AcquireResponse::NotSupported,
            }))
        }
        Some(LockInfo::Locked(holder)) => Err(conflict(&holder)),
    }
}

/// POST /api/v1/locks/release
///
/// Release a lock. Releasing a free resource is not an error.
pub async fn release_lock(
    LockUser(owner): LockUser,
    State(state): State<AppState>,
    Json(input): Json<LockRequest>,
) -> AppResult<impl IntoResponse> {
    validate_lock_key(&input.resource_type, &input.resource_id)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let released = state
        .coordinator
        .unlock(&input.resource_type, &input.resource_id);

    tracing::debug!(
        user_id = %owner.id,
        resource_type = %input.resource_type,
        resource_id = %input.resource_id,
        released,
        "Release requested"
    );

    Ok(Json(DataResponse {
        data: serde_json::json!({ "released": released }),
    }))
}

/// GET /api/v1/locks/{resource_type}/{resource_id}
///
/// Lock status of a resource: `locked` with the holder, `unlocked`, or
/// `not_supported`.
pub async fn get_lock_status(
    State(state): State<AppState>,
    Path((resource_type, resource_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    validate_lock_key(&resource_type, &resource_id)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let status = LockStatus::from(state.coordinator.lock_info(&resource_type, &resource_id));
    Ok(Json(DataResponse { data: status }))
}

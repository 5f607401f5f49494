//! Route definitions for the `/locks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::locks;
use crate::state::AppState;

/// Routes mounted at `/locks`.
///
/// Acquire and release identify the caller via the `x-user-id` and
/// `x-user-name` headers.
///
/// ```text
/// GET    /                                  -> list_locks
/// POST   /acquire                           -> acquire_lock
/// POST   /release                           -> release_lock
/// GET    /{resource_type}/{resource_id}     -> get_lock_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(locks::list_locks))
        .route("/acquire", post(locks::acquire_lock))
        .route("/release", post(locks::release_lock))
        .route(
            "/{resource_type}/{resource_id}",
            get(locks::get_lock_status),
        )
}

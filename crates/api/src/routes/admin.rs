//! Route definitions for `/admin/locks`.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin/locks`.
///
/// ```text
/// POST   /reload                  -> reload_configuration
/// POST   /expire                  -> expire_locks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reload", post(admin::reload_configuration))
        .route("/expire", post(admin::expire_locks))
}

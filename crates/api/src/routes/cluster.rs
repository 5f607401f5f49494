//! Route definitions for `/cluster`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cluster;
use crate::state::AppState;

/// Routes mounted at `/cluster`.
///
/// ```text
/// GET    /state                   -> export_state
/// PUT    /state                   -> import_state
/// POST   /events                  -> receive_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/state",
            get(cluster::export_state).put(cluster::import_state),
        )
        .route("/events", post(cluster::receive_event))
}

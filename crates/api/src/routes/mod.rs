pub mod admin;
pub mod cluster;
pub mod health;
pub mod locks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /locks                                           list
/// /locks/acquire                                   acquire (POST)
/// /locks/release                                   release (POST)
/// /locks/{resource_type}/{resource_id}             status
///
/// /admin/locks/reload                              reload policies (POST)
/// /admin/locks/expire                              run sweep now (POST)
///
/// /cluster/state                                   export (GET), import (PUT)
/// /cluster/events                                  inbound event (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/locks", locks::router())
        .nest("/admin/locks", admin::router())
        .nest("/cluster", cluster::router())
}

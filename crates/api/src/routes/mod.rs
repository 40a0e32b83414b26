pub mod family;
pub mod health;
pub mod monster;
pub mod monster_instance;
pub mod skill;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /counts                              inventory entity counts
///
/// /families                            list, create
/// /families/{id}                       get, update, delete
/// /families/{id}/monsters              dependent monsters
/// /families/{id}/deletion-blockers     delete guard check
///
/// /skills                              list, create
/// /skills/{id}                         get, update, delete
/// /skills/{id}/deletion-blockers       delete guard check
///
/// /monsters                            list, create
/// /monsters/{id}                       get, update, delete
/// /monsters/{id}/instances             dependent instances
/// /monsters/{id}/deletion-blockers     delete guard check
///
/// /monster-instances                   list, create
/// /monster-instances/{id}              get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/counts", get(handlers::dashboard::counts))
        .nest("/families", family::router())
        .nest("/skills", skill::router())
        .nest("/monsters", monster::router())
        .nest("/monster-instances", monster_instance::router())
}

//! Route definitions for the `/monsters` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::monster;
use crate::state::AppState;

/// Routes mounted at `/monsters`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete (guarded)
/// GET    /{id}/instances          -> list_instances
/// GET    /{id}/deletion-blockers  -> deletion_blockers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(monster::list).post(monster::create))
        .route(
            "/{id}",
            get(monster::get_by_id)
                .put(monster::update)
                .delete(monster::delete),
        )
        .route("/{id}/instances", get(monster::list_instances))
        .route("/{id}/deletion-blockers", get(monster::deletion_blockers))
}

//! Route definitions for the `/families` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::family;
use crate::state::AppState;

/// Routes mounted at `/families`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete (guarded)
/// GET    /{id}/monsters           -> list_monsters
/// GET    /{id}/deletion-blockers  -> deletion_blockers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(family::list).post(family::create))
        .route(
            "/{id}",
            get(family::get_by_id)
                .put(family::update)
                .delete(family::delete),
        )
        .route("/{id}/monsters", get(family::list_monsters))
        .route("/{id}/deletion-blockers", get(family::deletion_blockers))
}

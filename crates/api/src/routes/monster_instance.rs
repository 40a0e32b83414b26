//! Route definitions for the `/monster-instances` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::monster_instance;
use crate::state::AppState;

/// Routes mounted at `/monster-instances`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create (updates owner stock)
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update (updates owner stock on re-home)
/// DELETE /{id}  -> delete (updates owner stock)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(monster_instance::list).post(monster_instance::create),
        )
        .route(
            "/{id}",
            get(monster_instance::get_by_id)
                .put(monster_instance::update)
                .delete(monster_instance::delete),
        )
}

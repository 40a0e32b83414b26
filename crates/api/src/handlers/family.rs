//! Handlers for the `/families` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bestiary_core::error::CoreError;
use bestiary_core::types::DbId;
use bestiary_db::integrity::{self, DeleteCheck};
use bestiary_db::models::family::{CreateFamily, Family, UpdateFamily};
use bestiary_db::models::monster::Monster;
use bestiary_db::repositories::{FamilyRepo, MonsterRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/families
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateFamily>,
) -> AppResult<(StatusCode, Json<Family>)> {
    input.validate()?;
    let family = FamilyRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(family)))
}

/// GET /api/v1/families
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Family>>> {
    let families = FamilyRepo::list_all(&state.pool).await?;
    Ok(Json(families))
}

/// GET /api/v1/families/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Family>> {
    let family = FamilyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Family",
            id,
        }))?;
    Ok(Json(family))
}

/// GET /api/v1/families/{id}/monsters -- the family's dependent monsters.
pub async fn list_monsters(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Monster>>> {
    ensure_exists(&state, id).await?;
    let monsters = MonsterRepo::list_by_family(&state.pool, id).await?;
    Ok(Json(monsters))
}

/// PUT /api/v1/families/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFamily>,
) -> AppResult<Json<Family>> {
    input.validate()?;
    let family = FamilyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Family",
            id,
        }))?;
    Ok(Json(family))
}

/// GET /api/v1/families/{id}/deletion-blockers
pub async fn deletion_blockers(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteCheck>> {
    ensure_exists(&state, id).await?;
    let check = integrity::family_delete_check(&state.pool, id).await?;
    Ok(Json(check))
}

/// DELETE /api/v1/families/{id}
///
/// Blocked while any monster still belongs to the family.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let check = integrity::family_delete_check(&state.pool, id).await?;
    if !check.allowed {
        return Err(AppError::Core(CoreError::IntegrityBlocked {
            entity: "Family",
            blockers: check.blockers,
        }));
    }

    let deleted = FamilyRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Family",
            id,
        }))
    }
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    FamilyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Family",
            id,
        }))?;
    Ok(())
}

//! Handlers for the `/monsters` resource.
//!
//! `stock` is derived and therefore read-only at this surface: it is
//! absent from the create/update DTOs and changes only through instance
//! writes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bestiary_core::error::CoreError;
use bestiary_core::types::DbId;
use bestiary_db::integrity::{self, DeleteCheck};
use bestiary_db::models::monster::{CreateMonster, Monster, UpdateMonster};
use bestiary_db::models::monster_instance::MonsterInstance;
use bestiary_db::repositories::{MonsterInstanceRepo, MonsterRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/monsters
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateMonster>,
) -> AppResult<(StatusCode, Json<Monster>)> {
    input.validate()?;
    let monster = MonsterRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(monster)))
}

/// GET /api/v1/monsters
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Monster>>> {
    let monsters = MonsterRepo::list_all(&state.pool).await?;
    Ok(Json(monsters))
}

/// GET /api/v1/monsters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Monster>> {
    let monster = MonsterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Monster",
            id,
        }))?;
    Ok(Json(monster))
}

/// GET /api/v1/monsters/{id}/instances -- the monster's live instances.
pub async fn list_instances(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<MonsterInstance>>> {
    ensure_exists(&state, id).await?;
    let instances = MonsterInstanceRepo::list_by_monster(&state.pool, id).await?;
    Ok(Json(instances))
}

/// PUT /api/v1/monsters/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMonster>,
) -> AppResult<Json<Monster>> {
    input.validate()?;
    let monster = MonsterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Monster",
            id,
        }))?;
    Ok(Json(monster))
}

/// GET /api/v1/monsters/{id}/deletion-blockers
pub async fn deletion_blockers(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteCheck>> {
    ensure_exists(&state, id).await?;
    let check = integrity::monster_delete_check(&state.pool, id).await?;
    Ok(Json(check))
}

/// DELETE /api/v1/monsters/{id}
///
/// Blocked while the monster has live instances.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let check = integrity::monster_delete_check(&state.pool, id).await?;
    if !check.allowed {
        return Err(AppError::Core(CoreError::IntegrityBlocked {
            entity: "Monster",
            blockers: check.blockers,
        }));
    }

    let deleted = MonsterRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Monster",
            id,
        }))
    }
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    MonsterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Monster",
            id,
        }))?;
    Ok(())
}

//! Handlers for the `/monster-instances` resource.
//!
//! Creates, updates, and deletes go through the stock ledger: the
//! repository recomputes the owning monster's stock in the same
//! transaction as the instance write.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bestiary_core::error::CoreError;
use bestiary_core::types::DbId;
use bestiary_db::models::monster_instance::{
    CreateMonsterInstance, MonsterInstance, UpdateMonsterInstance,
};
use bestiary_db::repositories::MonsterInstanceRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/monster-instances
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateMonsterInstance>,
) -> AppResult<(StatusCode, Json<MonsterInstance>)> {
    input.validate()?;
    let instance = MonsterInstanceRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// GET /api/v1/monster-instances
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<MonsterInstance>>> {
    let instances = MonsterInstanceRepo::list_all(&state.pool).await?;
    Ok(Json(instances))
}

/// GET /api/v1/monster-instances/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MonsterInstance>> {
    let instance = MonsterInstanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MonsterInstance",
            id,
        }))?;
    Ok(Json(instance))
}

/// PUT /api/v1/monster-instances/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMonsterInstance>,
) -> AppResult<Json<MonsterInstance>> {
    input.validate()?;
    let instance = MonsterInstanceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MonsterInstance",
            id,
        }))?;
    Ok(Json(instance))
}

/// DELETE /api/v1/monster-instances/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = MonsterInstanceRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "MonsterInstance",
            id,
        }))
    }
}

//! Handlers for the `/skills` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bestiary_core::error::CoreError;
use bestiary_core::types::DbId;
use bestiary_db::integrity::{self, DeleteCheck};
use bestiary_db::models::skill::{CreateSkill, Skill, UpdateSkill};
use bestiary_db::repositories::SkillRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/skills
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSkill>,
) -> AppResult<(StatusCode, Json<Skill>)> {
    input.validate()?;
    let skill = SkillRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// GET /api/v1/skills
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Skill>>> {
    let skills = SkillRepo::list_all(&state.pool).await?;
    Ok(Json(skills))
}

/// GET /api/v1/skills/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Skill>> {
    let skill = SkillRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Skill", id }))?;
    Ok(Json(skill))
}

/// PUT /api/v1/skills/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSkill>,
) -> AppResult<Json<Skill>> {
    input.validate()?;
    let skill = SkillRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Skill", id }))?;
    Ok(Json(skill))
}

/// GET /api/v1/skills/{id}/deletion-blockers
pub async fn deletion_blockers(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteCheck>> {
    ensure_exists(&state, id).await?;
    let check = integrity::skill_delete_check(&state.pool, id).await?;
    Ok(Json(check))
}

/// DELETE /api/v1/skills/{id}
///
/// Blocked while any monster has the skill innate or any instance
/// knows it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let check = integrity::skill_delete_check(&state.pool, id).await?;
    if !check.allowed {
        return Err(AppError::Core(CoreError::IntegrityBlocked {
            entity: "Skill",
            blockers: check.blockers,
        }));
    }

    let deleted = SkillRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Skill", id }))
    }
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    SkillRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Skill", id }))?;
    Ok(())
}

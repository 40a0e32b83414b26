//! Handlers for the inventory dashboard.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use bestiary_db::repositories::{FamilyRepo, MonsterInstanceRepo, MonsterRepo, SkillRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// Entity counts shown on the inventory home page.
#[derive(Debug, Serialize)]
pub struct InventoryCounts {
    pub families: i64,
    pub monsters: i64,
    pub skills: i64,
    pub monster_instances: i64,
}

/// GET /api/v1/counts
pub async fn counts(State(state): State<AppState>) -> AppResult<Json<InventoryCounts>> {
    let (families, monsters, skills, monster_instances) = tokio::try_join!(
        FamilyRepo::count(&state.pool),
        MonsterRepo::count(&state.pool),
        SkillRepo::count(&state.pool),
        MonsterInstanceRepo::count(&state.pool),
    )?;

    Ok(Json(InventoryCounts {
        families,
        monsters,
        skills,
        monster_instances,
    }))
}

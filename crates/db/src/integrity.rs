//! Delete guards: read-only checks for records that would be orphaned
//! by deleting a family, skill, or monster.
//!
//! Handlers consult the guard before any destructive operation so the
//! caller sees the blocking records by name instead of a bare foreign
//! key error. The RESTRICT constraints in the schema back the guard up
//! against races.

use serde::Serialize;
use sqlx::PgPool;

use bestiary_core::types::DbId;

/// Result of a delete check: whether the delete may proceed, and the
/// names of the records blocking it if not.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteCheck {
    pub allowed: bool,
    pub blockers: Vec<String>,
}

impl DeleteCheck {
    fn from_blockers(blockers: Vec<String>) -> Self {
        Self {
            allowed: blockers.is_empty(),
            blockers,
        }
    }
}

/// Monsters still assigned to the family block its deletion.
pub async fn family_delete_check(pool: &PgPool, family_id: DbId) -> Result<DeleteCheck, sqlx::Error> {
    let blockers: Vec<String> =
        sqlx::query_scalar("SELECT name FROM monsters WHERE family_id = $1 ORDER BY name")
            .bind(family_id)
            .fetch_all(pool)
            .await?;
    Ok(DeleteCheck::from_blockers(blockers))
}

/// Monsters with the skill innate and instances that know it block its
/// deletion.
pub async fn skill_delete_check(pool: &PgPool, skill_id: DbId) -> Result<DeleteCheck, sqlx::Error> {
    let mut blockers: Vec<String> = sqlx::query_scalar(
        "SELECT m.name FROM monster_innate_skills j \
         JOIN monsters m ON m.id = j.monster_id \
         WHERE j.skill_id = $1 \
         ORDER BY m.name",
    )
    .bind(skill_id)
    .fetch_all(pool)
    .await?;

    let instances = instance_labels(
        pool,
        "SELECT i.nickname, i.id FROM monster_instance_skills j \
         JOIN monster_instances i ON i.id = j.instance_id \
         WHERE j.skill_id = $1 \
         ORDER BY i.nickname, i.id",
        skill_id,
    )
    .await?;
    blockers.extend(instances);

    Ok(DeleteCheck::from_blockers(blockers))
}

/// Live instances of the monster block its deletion.
pub async fn monster_delete_check(
    pool: &PgPool,
    monster_id: DbId,
) -> Result<DeleteCheck, sqlx::Error> {
    let blockers = instance_labels(
        pool,
        "SELECT nickname, id FROM monster_instances \
         WHERE monster_id = $1 \
         ORDER BY nickname, id",
        monster_id,
    )
    .await?;
    Ok(DeleteCheck::from_blockers(blockers))
}

/// Nicknames are not unique, so instance blockers are labelled
/// `nickname (#id)`.
async fn instance_labels(
    pool: &PgPool,
    query: &str,
    bind_id: DbId,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String, DbId)> = sqlx::query_as(query).bind(bind_id).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(nickname, id)| format!("{nickname} (#{id})"))
        .collect())
}

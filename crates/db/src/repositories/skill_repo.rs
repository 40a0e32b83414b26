//! Repository for the `skills` table.

use sqlx::PgPool;

use bestiary_core::types::DbId;

use crate::models::skill::{CreateSkill, Skill, UpdateSkill};

/// Column list for `skills` queries.
const SKILL_COLUMNS: &str = "id, name, info, magic_cost, created_at, updated_at";

/// Provides CRUD operations for skills.
pub struct SkillRepo;

impl SkillRepo {
    pub async fn create(pool: &PgPool, input: &CreateSkill) -> Result<Skill, sqlx::Error> {
        let query = format!(
            "INSERT INTO skills (name, info, magic_cost) \
             VALUES ($1, $2, $3) \
             RETURNING {SKILL_COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(&input.name)
            .bind(&input.info)
            .bind(input.magic_cost)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1");
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all skills, ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!("SELECT {SKILL_COLUMNS} FROM skills ORDER BY name");
        sqlx::query_as::<_, Skill>(&query).fetch_all(pool).await
    }

    /// Update a skill's fields. Returns `None` if no skill with the
    /// given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSkill,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!(
            "UPDATE skills SET \
                 name = COALESCE($2, name), \
                 info = COALESCE($3, info), \
                 magic_cost = COALESCE($4, magic_cost), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SKILL_COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.info.as_deref())
            .bind(input.magic_cost)
            .fetch_optional(pool)
            .await
    }

    /// Delete a skill by ID. Returns `true` if a skill was deleted.
    ///
    /// Callers must consult [`crate::integrity::skill_delete_check`]
    /// first; a skill still referenced by monsters or instances makes
    /// this fail on the RESTRICT constraint.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM skills")
            .fetch_one(pool)
            .await
    }
}

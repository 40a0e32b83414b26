//! Repository for the `families` table.

use sqlx::PgPool;

use bestiary_core::types::DbId;

use crate::models::family::{CreateFamily, Family, UpdateFamily};

/// Column list for `families` queries.
const FAMILY_COLUMNS: &str = "id, name, info, created_at, updated_at";

/// Provides CRUD operations for families.
pub struct FamilyRepo;

impl FamilyRepo {
    pub async fn create(pool: &PgPool, input: &CreateFamily) -> Result<Family, sqlx::Error> {
        let query = format!(
            "INSERT INTO families (name, info) VALUES ($1, $2) RETURNING {FAMILY_COLUMNS}"
        );
        sqlx::query_as::<_, Family>(&query)
            .bind(&input.name)
            .bind(&input.info)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Family>, sqlx::Error> {
        let query = format!("SELECT {FAMILY_COLUMNS} FROM families WHERE id = $1");
        sqlx::query_as::<_, Family>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all families, ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Family>, sqlx::Error> {
        let query = format!("SELECT {FAMILY_COLUMNS} FROM families ORDER BY name");
        sqlx::query_as::<_, Family>(&query).fetch_all(pool).await
    }

    /// Update a family's fields. Returns `None` if no family with the
    /// given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFamily,
    ) -> Result<Option<Family>, sqlx::Error> {
        let query = format!(
            "UPDATE families SET \
                 name = COALESCE($2, name), \
                 info = COALESCE($3, info), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {FAMILY_COLUMNS}"
        );
        sqlx::query_as::<_, Family>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.info.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a family by ID. Returns `true` if a family was deleted.
    ///
    /// Callers must consult [`crate::integrity::family_delete_check`]
    /// first; a family still referenced by monsters makes this fail on
    /// the RESTRICT constraint.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM families WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM families")
            .fetch_one(pool)
            .await
    }
}

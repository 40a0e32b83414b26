//! Repository for the `monsters` table and its innate-skill junction.
//!
//! Monster rows are always read together with their aggregated innate
//! skill ids. Writes that touch the skill set run in a transaction so
//! the monster row and its junction rows move as one unit.

use sqlx::{PgPool, Postgres, Transaction};

use bestiary_core::error::CoreError;
use bestiary_core::types::DbId;
use bestiary_core::validation::FieldError;

use crate::models::monster::{CreateMonster, Monster, UpdateMonster};
use crate::repositories::RepoError;

/// Column list for `monsters` queries, aggregating the junction rows
/// into an ordered skill-id array. Requires the table alias `m`.
const MONSTER_COLUMNS: &str = "\
    m.id, m.name, m.family_id, m.info, m.stock, \
    ARRAY(SELECT skill_id FROM monster_innate_skills j \
          WHERE j.monster_id = m.id ORDER BY skill_id) AS innate_skills, \
    m.created_at, m.updated_at";

/// Provides CRUD operations for monsters.
pub struct MonsterRepo;

impl MonsterRepo {
    /// Create a monster with its innate skill set.
    ///
    /// Verifies inside the transaction that the family and every skill
    /// id exist; a missing family is `NotFound`, unknown skill ids are
    /// a field-level validation failure.
    pub async fn create(pool: &PgPool, input: &CreateMonster) -> Result<Monster, RepoError> {
        let mut tx = pool.begin().await?;

        ensure_family_exists(&mut tx, input.family_id).await?;
        ensure_skills_exist(&mut tx, &input.innate_skills, "innate_skills").await?;

        let monster_id: DbId = sqlx::query_scalar(
            "INSERT INTO monsters (name, family_id, info, stock) \
             VALUES ($1, $2, $3, 0) \
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.family_id)
        .bind(&input.info)
        .fetch_one(&mut *tx)
        .await?;

        insert_innate_skills(&mut tx, monster_id, &input.innate_skills).await?;

        let monster = fetch_in_tx(&mut tx, monster_id).await?;
        tx.commit().await?;
        Ok(monster)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Monster>, sqlx::Error> {
        let query = format!("SELECT {MONSTER_COLUMNS} FROM monsters m WHERE m.id = $1");
        sqlx::query_as::<_, Monster>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all monsters, ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Monster>, sqlx::Error> {
        let query = format!("SELECT {MONSTER_COLUMNS} FROM monsters m ORDER BY m.name");
        sqlx::query_as::<_, Monster>(&query).fetch_all(pool).await
    }

    /// List the monsters belonging to a family, ordered by name.
    pub async fn list_by_family(
        pool: &PgPool,
        family_id: DbId,
    ) -> Result<Vec<Monster>, sqlx::Error> {
        let query = format!(
            "SELECT {MONSTER_COLUMNS} FROM monsters m \
             WHERE m.family_id = $1 ORDER BY m.name"
        );
        sqlx::query_as::<_, Monster>(&query)
            .bind(family_id)
            .fetch_all(pool)
            .await
    }

    /// Update a monster's fields. If `innate_skills` is present the
    /// whole set is replaced. Returns `None` if no monster with the
    /// given ID exists. `stock` is never touched here.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMonster,
    ) -> Result<Option<Monster>, RepoError> {
        let mut tx = pool.begin().await?;

        if let Some(family_id) = input.family_id {
            ensure_family_exists(&mut tx, family_id).await?;
        }
        if let Some(skills) = &input.innate_skills {
            ensure_skills_exist(&mut tx, skills, "innate_skills").await?;
        }

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE monsters SET \
                 name = COALESCE($2, name), \
                 family_id = COALESCE($3, family_id), \
                 info = COALESCE($4, info), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.family_id)
        .bind(input.info.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(monster_id) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(skills) = &input.innate_skills {
            sqlx::query("DELETE FROM monster_innate_skills WHERE monster_id = $1")
                .bind(monster_id)
                .execute(&mut *tx)
                .await?;
            insert_innate_skills(&mut tx, monster_id, skills).await?;
        }

        let monster = fetch_in_tx(&mut tx, monster_id).await?;
        tx.commit().await?;
        Ok(Some(monster))
    }

    /// Delete a monster by ID. Returns `true` if a monster was deleted.
    ///
    /// Callers must consult [`crate::integrity::monster_delete_check`]
    /// first; a monster that still has instances makes this fail on the
    /// RESTRICT constraint.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM monsters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM monsters")
            .fetch_one(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers (shared with the instance repository)
// ---------------------------------------------------------------------------

/// Verify a family id exists, mapping absence to `NotFound`.
async fn ensure_family_exists(
    tx: &mut Transaction<'_, Postgres>,
    family_id: DbId,
) -> Result<(), RepoError> {
    let exists: Option<DbId> = sqlx::query_scalar("SELECT id FROM families WHERE id = $1")
        .bind(family_id)
        .fetch_optional(&mut **tx)
        .await?;
    if exists.is_none() {
        return Err(CoreError::NotFound {
            entity: "Family",
            id: family_id,
        }
        .into());
    }
    Ok(())
}

/// Verify every skill id in `skill_ids` exists, reporting unknown ids
/// as a validation failure on `field`.
pub(crate) async fn ensure_skills_exist(
    tx: &mut Transaction<'_, Postgres>,
    skill_ids: &[DbId],
    field: &'static str,
) -> Result<(), RepoError> {
    if skill_ids.is_empty() {
        return Ok(());
    }
    let known: Vec<DbId> = sqlx::query_scalar("SELECT id FROM skills WHERE id = ANY($1)")
        .bind(skill_ids)
        .fetch_all(&mut **tx)
        .await?;
    let unknown: Vec<DbId> = skill_ids
        .iter()
        .copied()
        .filter(|id| !known.contains(id))
        .collect();
    if !unknown.is_empty() {
        let ids = unknown
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CoreError::Validation(vec![FieldError {
            field,
            message: format!("unknown skill ids: {ids}"),
        }])
        .into());
    }
    Ok(())
}

async fn insert_innate_skills(
    tx: &mut Transaction<'_, Postgres>,
    monster_id: DbId,
    skill_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    for &skill_id in skill_ids {
        sqlx::query("INSERT INTO monster_innate_skills (monster_id, skill_id) VALUES ($1, $2)")
            .bind(monster_id)
            .bind(skill_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn fetch_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    monster_id: DbId,
) -> Result<Monster, sqlx::Error> {
    let query = format!("SELECT {MONSTER_COLUMNS} FROM monsters m WHERE m.id = $1");
    sqlx::query_as::<_, Monster>(&query)
        .bind(monster_id)
        .fetch_one(&mut **tx)
        .await
}

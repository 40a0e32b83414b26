//! Repository for the `monster_instances` table: instance CRUD plus the
//! stock ledger on the owning monster.
//!
//! Every write runs in a single transaction that also recomputes the
//! owning monster's `stock` as the live instance count, so the instance
//! write and the stock update are all-or-nothing. Stock is recomputed,
//! never incremented, so a lost update cannot leave it drifted.
//!
//! Lock ordering: the instance row first (update/delete), then monster
//! rows in ascending id. Taking the monster lock before counting means
//! a concurrent writer's count statement starts only after this
//! transaction commits, so two creations for the same monster cannot
//! both read the same pre-update count.

use sqlx::{PgPool, Postgres, Transaction};

use bestiary_core::error::CoreError;
use bestiary_core::types::DbId;

use crate::models::monster_instance::{
    CreateMonsterInstance, MonsterInstance, UpdateMonsterInstance,
};
use crate::repositories::monster_repo::ensure_skills_exist;
use crate::repositories::RepoError;

/// Column list for `monster_instances` queries, aggregating the junction
/// rows into an ordered skill-id array. Requires the table alias `i`.
const INSTANCE_COLUMNS: &str = "\
    i.id, i.monster_id, i.nickname, i.level, \
    i.health, i.magic, i.attack, i.defense, i.agility, i.intelligence, \
    i.gender, \
    ARRAY(SELECT skill_id FROM monster_instance_skills j \
          WHERE j.instance_id = i.id ORDER BY skill_id) AS skills, \
    i.created_at, i.updated_at";

/// Provides CRUD operations for monster instances and maintains the
/// owning monster's stock count.
pub struct MonsterInstanceRepo;

impl MonsterInstanceRepo {
    /// Create an instance and bump the owning monster's stock, as one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMonsterInstance,
    ) -> Result<MonsterInstance, RepoError> {
        let mut tx = pool.begin().await?;

        lock_monster(&mut tx, input.monster_id).await?;
        ensure_skills_exist(&mut tx, &input.skills, "skills").await?;

        let instance_id: DbId = sqlx::query_scalar(
            "INSERT INTO monster_instances \
                 (monster_id, nickname, level, health, magic, attack, \
                  defense, agility, intelligence, gender) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id",
        )
        .bind(input.monster_id)
        .bind(&input.nickname)
        .bind(input.level)
        .bind(input.health)
        .bind(input.magic)
        .bind(input.attack)
        .bind(input.defense)
        .bind(input.agility)
        .bind(input.intelligence)
        .bind(&input.gender)
        .fetch_one(&mut *tx)
        .await?;

        insert_instance_skills(&mut tx, instance_id, &input.skills).await?;
        recompute_stock(&mut tx, input.monster_id).await?;

        let instance = fetch_in_tx(&mut tx, instance_id).await?;
        tx.commit().await?;
        Ok(instance)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MonsterInstance>, sqlx::Error> {
        let query = format!("SELECT {INSTANCE_COLUMNS} FROM monster_instances i WHERE i.id = $1");
        sqlx::query_as::<_, MonsterInstance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all instances, ordered by nickname.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<MonsterInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {INSTANCE_COLUMNS} FROM monster_instances i ORDER BY i.nickname, i.id"
        );
        sqlx::query_as::<_, MonsterInstance>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the instances of a monster, ordered by nickname.
    pub async fn list_by_monster(
        pool: &PgPool,
        monster_id: DbId,
    ) -> Result<Vec<MonsterInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {INSTANCE_COLUMNS} FROM monster_instances i \
             WHERE i.monster_id = $1 ORDER BY i.nickname, i.id"
        );
        sqlx::query_as::<_, MonsterInstance>(&query)
            .bind(monster_id)
            .fetch_all(pool)
            .await
    }

    /// Update an instance. If `monster_id` changes, the instance is
    /// re-homed and the stock of both monsters is recomputed in the
    /// same transaction. Returns `None` if no instance with the given
    /// ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMonsterInstance,
    ) -> Result<Option<MonsterInstance>, RepoError> {
        let mut tx = pool.begin().await?;

        // Lock the instance row first so its monster_id cannot move
        // under us while we take the monster locks.
        let current: Option<DbId> =
            sqlx::query_scalar("SELECT monster_id FROM monster_instances WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(old_monster_id) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        let new_monster_id = input.monster_id.unwrap_or(old_monster_id);
        let mut to_lock = vec![old_monster_id];
        if new_monster_id != old_monster_id {
            to_lock.push(new_monster_id);
            to_lock.sort_unstable();
        }
        for monster_id in to_lock {
            lock_monster(&mut tx, monster_id).await?;
        }

        if let Some(skills) = &input.skills {
            ensure_skills_exist(&mut tx, skills, "skills").await?;
        }

        sqlx::query(
            "UPDATE monster_instances SET \
                 monster_id = COALESCE($2, monster_id), \
                 nickname = COALESCE($3, nickname), \
                 level = COALESCE($4, level), \
                 health = COALESCE($5, health), \
                 magic = COALESCE($6, magic), \
                 attack = COALESCE($7, attack), \
                 defense = COALESCE($8, defense), \
                 agility = COALESCE($9, agility), \
                 intelligence = COALESCE($10, intelligence), \
                 gender = COALESCE($11, gender), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.monster_id)
        .bind(input.nickname.as_deref())
        .bind(input.level)
        .bind(input.health)
        .bind(input.magic)
        .bind(input.attack)
        .bind(input.defense)
        .bind(input.agility)
        .bind(input.intelligence)
        .bind(input.gender.as_deref())
        .execute(&mut *tx)
        .await?;

        if let Some(skills) = &input.skills {
            sqlx::query("DELETE FROM monster_instance_skills WHERE instance_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_instance_skills(&mut tx, id, skills).await?;
        }

        recompute_stock(&mut tx, new_monster_id).await?;
        if new_monster_id != old_monster_id {
            recompute_stock(&mut tx, old_monster_id).await?;
        }

        let instance = fetch_in_tx(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(instance))
    }

    /// Delete an instance and drop the owning monster's stock, as one
    /// transaction. Returns `true` if an instance was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let mut tx = pool.begin().await?;

        let current: Option<DbId> =
            sqlx::query_scalar("SELECT monster_id FROM monster_instances WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(monster_id) = current else {
            tx.rollback().await?;
            return Ok(false);
        };

        lock_monster(&mut tx, monster_id).await?;

        sqlx::query("DELETE FROM monster_instances WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        recompute_stock(&mut tx, monster_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM monster_instances")
            .fetch_one(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

/// Take a row lock on the monster, mapping absence to `NotFound`.
async fn lock_monster(
    tx: &mut Transaction<'_, Postgres>,
    monster_id: DbId,
) -> Result<(), RepoError> {
    let locked: Option<DbId> = sqlx::query_scalar("SELECT id FROM monsters WHERE id = $1 FOR UPDATE")
        .bind(monster_id)
        .fetch_optional(&mut **tx)
        .await?;
    if locked.is_none() {
        return Err(CoreError::NotFound {
            entity: "Monster",
            id: monster_id,
        }
        .into());
    }
    Ok(())
}

/// Set the monster's stock to the live instance count. The caller holds
/// the monster's row lock, so the count cannot be raced by another
/// instance write for the same monster.
async fn recompute_stock(
    tx: &mut Transaction<'_, Postgres>,
    monster_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE monsters SET \
             stock = (SELECT COUNT(*) FROM monster_instances WHERE monster_id = $1), \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(monster_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_instance_skills(
    tx: &mut Transaction<'_, Postgres>,
    instance_id: DbId,
    skill_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    for &skill_id in skill_ids {
        sqlx::query("INSERT INTO monster_instance_skills (instance_id, skill_id) VALUES ($1, $2)")
            .bind(instance_id)
            .bind(skill_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn fetch_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    instance_id: DbId,
) -> Result<MonsterInstance, sqlx::Error> {
    let query = format!("SELECT {INSTANCE_COLUMNS} FROM monster_instances i WHERE i.id = $1");
    sqlx::query_as::<_, MonsterInstance>(&query)
        .bind(instance_id)
        .fetch_one(&mut **tx)
        .await
}

//! Monster instance (owned individual) models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bestiary_core::error::CoreError;
use bestiary_core::types::{DbId, Timestamp};
use bestiary_core::validation::{
    validate_gender, validate_instance_skills, validate_level, validate_nickname, validate_stat,
    Violations, GENDER_NONE,
};

/// A row from the `monster_instances` table with its aggregated skill ids.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonsterInstance {
    pub id: DbId,
    pub monster_id: DbId,
    pub nickname: String,
    pub level: i32,
    pub health: i32,
    pub magic: i32,
    pub attack: i32,
    pub defense: i32,
    pub agility: i32,
    pub intelligence: i32,
    pub gender: String,
    pub skills: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a monster instance.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMonsterInstance {
    pub monster_id: DbId,
    pub nickname: String,
    pub level: i32,
    pub health: i32,
    pub magic: i32,
    pub attack: i32,
    pub defense: i32,
    pub agility: i32,
    pub intelligence: i32,
    /// Defaults to `None` (the gender, not the absence) when omitted.
    #[serde(default = "default_gender")]
    pub gender: String,
    /// Up to eight distinct skill ids.
    #[serde(default)]
    pub skills: Vec<DbId>,
}

fn default_gender() -> String {
    GENDER_NONE.to_string()
}

impl CreateMonsterInstance {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut v = Violations::new();
        v.check(validate_nickname(&self.nickname), "nickname");
        v.check(validate_level(self.level), "level");
        v.check(validate_stat(self.health), "health");
        v.check(validate_stat(self.magic), "magic");
        v.check(validate_stat(self.attack), "attack");
        v.check(validate_stat(self.defense), "defense");
        v.check(validate_stat(self.agility), "agility");
        v.check(validate_stat(self.intelligence), "intelligence");
        v.check(validate_gender(&self.gender), "gender");
        v.check(validate_instance_skills(&self.skills), "skills");
        v.into_result()
    }
}

/// DTO for updating a monster instance. Omitted fields keep their
/// current value; changing `monster_id` re-homes the instance and
/// adjusts the stock of both monsters.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMonsterInstance {
    pub monster_id: Option<DbId>,
    pub nickname: Option<String>,
    pub level: Option<i32>,
    pub health: Option<i32>,
    pub magic: Option<i32>,
    pub attack: Option<i32>,
    pub defense: Option<i32>,
    pub agility: Option<i32>,
    pub intelligence: Option<i32>,
    pub gender: Option<String>,
    pub skills: Option<Vec<DbId>>,
}

impl UpdateMonsterInstance {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut v = Violations::new();
        if let Some(nickname) = &self.nickname {
            v.check(validate_nickname(nickname), "nickname");
        }
        if let Some(level) = self.level {
            v.check(validate_level(level), "level");
        }
        for (value, field) in [
            (self.health, "health"),
            (self.magic, "magic"),
            (self.attack, "attack"),
            (self.defense, "defense"),
            (self.agility, "agility"),
            (self.intelligence, "intelligence"),
        ] {
            if let Some(value) = value {
                v.check(validate_stat(value), field);
            }
        }
        if let Some(gender) = &self.gender {
            v.check(validate_gender(gender), "gender");
        }
        if let Some(skills) = &self.skills {
            v.check(validate_instance_skills(skills), "skills");
        }
        v.into_result()
    }
}

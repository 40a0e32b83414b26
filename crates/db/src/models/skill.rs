//! Skill models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bestiary_core::error::CoreError;
use bestiary_core::types::{DbId, Timestamp};
use bestiary_core::validation::{validate_info, validate_magic_cost, validate_name, Violations};

/// A row from the `skills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub id: DbId,
    pub name: String,
    pub info: String,
    pub magic_cost: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a skill.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkill {
    pub name: String,
    pub info: String,
    pub magic_cost: i32,
}

impl CreateSkill {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut v = Violations::new();
        v.check(validate_name(&self.name), "name");
        v.check(validate_info(&self.info), "info");
        v.check(validate_magic_cost(self.magic_cost), "magic_cost");
        v.into_result()
    }
}

/// DTO for updating a skill. Omitted fields keep their current value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSkill {
    pub name: Option<String>,
    pub info: Option<String>,
    pub magic_cost: Option<i32>,
}

impl UpdateSkill {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut v = Violations::new();
        if let Some(name) = &self.name {
            v.check(validate_name(name), "name");
        }
        if let Some(info) = &self.info {
            v.check(validate_info(info), "info");
        }
        if let Some(cost) = self.magic_cost {
            v.check(validate_magic_cost(cost), "magic_cost");
        }
        v.into_result()
    }
}

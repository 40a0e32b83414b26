//! Monster (species template) models and DTOs.
//!
//! `stock` is derived (the count of instances of the species) and is
//! therefore absent from both DTOs. It is maintained by the instance
//! repository, never written by callers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bestiary_core::error::CoreError;
use bestiary_core::types::{DbId, Timestamp};
use bestiary_core::validation::{
    validate_info, validate_innate_skills, validate_name, Violations,
};

/// A row from the `monsters` table with its aggregated innate skill ids.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Monster {
    pub id: DbId,
    pub name: String,
    pub family_id: DbId,
    pub info: String,
    /// Count of live instances of this species.
    pub stock: i32,
    pub innate_skills: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a monster.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMonster {
    pub name: String,
    pub family_id: DbId,
    pub info: String,
    /// Exactly three distinct skill ids.
    pub innate_skills: Vec<DbId>,
}

impl CreateMonster {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut v = Violations::new();
        v.check(validate_name(&self.name), "name");
        v.check(validate_info(&self.info), "info");
        v.check(validate_innate_skills(&self.innate_skills), "innate_skills");
        v.into_result()
    }
}

/// DTO for updating a monster. Omitted fields keep their current value;
/// if `innate_skills` is present it replaces the whole set.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMonster {
    pub name: Option<String>,
    pub family_id: Option<DbId>,
    pub info: Option<String>,
    pub innate_skills: Option<Vec<DbId>>,
}

impl UpdateMonster {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut v = Violations::new();
        if let Some(name) = &self.name {
            v.check(validate_name(name), "name");
        }
        if let Some(info) = &self.info {
            v.check(validate_info(info), "info");
        }
        if let Some(skills) = &self.innate_skills {
            v.check(validate_innate_skills(skills), "innate_skills");
        }
        v.into_result()
    }
}

//! Family models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bestiary_core::error::CoreError;
use bestiary_core::types::{DbId, Timestamp};
use bestiary_core::validation::{validate_info, validate_name, Violations};

/// A row from the `families` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Family {
    pub id: DbId,
    pub name: String,
    pub info: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a family.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFamily {
    pub name: String,
    pub info: String,
}

impl CreateFamily {
    /// Check field constraints, reporting every violation at once.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut v = Violations::new();
        v.check(validate_name(&self.name), "name");
        v.check(validate_info(&self.info), "info");
        v.into_result()
    }
}

/// DTO for updating a family. Omitted fields keep their current value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFamily {
    pub name: Option<String>,
    pub info: Option<String>,
}

impl UpdateFamily {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut v = Violations::new();
        if let Some(name) = &self.name {
            v.check(validate_name(name), "name");
        }
        if let Some(info) = &self.info {
            v.check(validate_info(info), "info");
        }
        v.into_result()
    }
}

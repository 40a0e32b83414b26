//! Field and set validation rules for catalog entities.
//!
//! Limits mirror the catalog schema: short display names, bounded info
//! text, bounded numeric ranges, and two skill-set rules (a monster has
//! exactly [`INNATE_SKILL_COUNT`] distinct innate skills; an instance
//! knows at most [`MAX_INSTANCE_SKILLS`] distinct skills).

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Name length bounds for families, skills, and monsters.
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 20;

/// Info text length bound (names require at least one character).
pub const INFO_MAX_LEN: usize = 200;

/// Instance nickname length bounds.
pub const NICKNAME_MIN_LEN: usize = 1;
pub const NICKNAME_MAX_LEN: usize = 5;

/// Skill magic cost range.
pub const MAGIC_COST_MIN: i32 = 0;
pub const MAGIC_COST_MAX: i32 = 99;

/// Instance level range.
pub const LEVEL_MIN: i32 = 1;
pub const LEVEL_MAX: i32 = 99;

/// Range shared by all six instance stats.
pub const STAT_MIN: i32 = 1;
pub const STAT_MAX: i32 = 999;

/// A monster has exactly this many innate skills.
pub const INNATE_SKILL_COUNT: usize = 3;

/// An instance knows at most this many skills.
pub const MAX_INSTANCE_SKILLS: usize = 8;

// ---------------------------------------------------------------------------
// Gender constants
// ---------------------------------------------------------------------------

pub const GENDER_MALE: &str = "Male";
pub const GENDER_FEMALE: &str = "Female";
pub const GENDER_NONE: &str = "None";

/// All valid gender values. [`GENDER_NONE`] is the default when omitted.
pub const VALID_GENDERS: &[&str] = &[GENDER_MALE, GENDER_FEMALE, GENDER_NONE];

// ---------------------------------------------------------------------------
// Violation collection
// ---------------------------------------------------------------------------

/// A single field-level constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field as it appears in the request payload.
    pub field: &'static str,
    pub message: String,
}

/// Collects field violations across a payload, then converts the
/// non-empty case into [`CoreError::Validation`] in one shot.
#[derive(Debug, Default)]
pub struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Run a single-field check and record its failure, if any.
    pub fn check(&mut self, result: Result<(), String>, field: &'static str) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` if nothing was recorded, otherwise a
    /// [`CoreError::Validation`] carrying every violation.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Validate a display name (family, skill, or monster).
pub fn validate_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if len < NAME_MIN_LEN || len > NAME_MAX_LEN {
        return Err(format!(
            "must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters, got {len}"
        ));
    }
    Ok(())
}

/// Validate an info text.
pub fn validate_info(info: &str) -> Result<(), String> {
    let len = info.chars().count();
    if len == 0 {
        return Err("must not be empty".to_string());
    }
    if len > INFO_MAX_LEN {
        return Err(format!("must be at most {INFO_MAX_LEN} characters, got {len}"));
    }
    Ok(())
}

/// Validate an instance nickname.
pub fn validate_nickname(nickname: &str) -> Result<(), String> {
    let len = nickname.chars().count();
    if len < NICKNAME_MIN_LEN || len > NICKNAME_MAX_LEN {
        return Err(format!(
            "must be between {NICKNAME_MIN_LEN} and {NICKNAME_MAX_LEN} characters, got {len}"
        ));
    }
    Ok(())
}

/// Validate a skill's magic cost.
pub fn validate_magic_cost(cost: i32) -> Result<(), String> {
    validate_range(cost, MAGIC_COST_MIN, MAGIC_COST_MAX)
}

/// Validate an instance level.
pub fn validate_level(level: i32) -> Result<(), String> {
    validate_range(level, LEVEL_MIN, LEVEL_MAX)
}

/// Validate one of the six instance stats.
pub fn validate_stat(value: i32) -> Result<(), String> {
    validate_range(value, STAT_MIN, STAT_MAX)
}

/// Validate a gender value against [`VALID_GENDERS`].
pub fn validate_gender(gender: &str) -> Result<(), String> {
    if VALID_GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(format!(
            "unknown gender '{gender}', valid values: {}",
            VALID_GENDERS.join(", ")
        ))
    }
}

fn validate_range(value: i32, min: i32, max: i32) -> Result<(), String> {
    if value < min || value > max {
        return Err(format!("must be between {min} and {max}, got {value}"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Skill-set rules
// ---------------------------------------------------------------------------

/// Validate a monster's innate skill set: exactly
/// [`INNATE_SKILL_COUNT`] entries, no duplicates.
pub fn validate_innate_skills(skill_ids: &[DbId]) -> Result<(), String> {
    if skill_ids.len() != INNATE_SKILL_COUNT {
        return Err(format!(
            "must contain exactly {INNATE_SKILL_COUNT} skills, got {}",
            skill_ids.len()
        ));
    }
    ensure_distinct(skill_ids)
}

/// Validate an instance's learned skill set: at most
/// [`MAX_INSTANCE_SKILLS`] entries, no duplicates.
pub fn validate_instance_skills(skill_ids: &[DbId]) -> Result<(), String> {
    if skill_ids.len() > MAX_INSTANCE_SKILLS {
        return Err(format!(
            "must contain at most {MAX_INSTANCE_SKILLS} skills, got {}",
            skill_ids.len()
        ));
    }
    ensure_distinct(skill_ids)
}

fn ensure_distinct(skill_ids: &[DbId]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(skill_ids.len());
    for &id in skill_ids {
        if !seen.insert(id) {
            return Err(format!("skill {id} listed more than once"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Class entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use t20_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::ability::{Ability, CreateAbility};
use crate::models::skill::Skill;

/// A row from the `classes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Class {
    pub id: DbId,
    pub name: String,
    pub hp_per_level: i32,
    pub mp_per_level: i32,
    pub primary_attribute: String,
    /// Maximum number of class skills a player may choose.
    pub skill_choice_cap: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a class with its abilities and skill sets.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClass {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1, max = 50))]
    pub hp_per_level: i32,
    #[validate(range(min = 0, max = 50))]
    pub mp_per_level: i32,
    pub primary_attribute: String,
    /// Defaults to 2.
    #[validate(range(min = 0))]
    pub skill_choice_cap: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub abilities: Vec<CreateAbility>,
    #[serde(default)]
    pub selectable_skill_ids: Vec<DbId>,
    #[serde(default)]
    pub automatic_skill_ids: Vec<DbId>,
}

/// DTO for updating a class. Skill sets are replaced together when either is
/// present; the handler fills a missing one from the stored set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClass {
    pub name: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub hp_per_level: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub mp_per_level: Option<i32>,
    pub primary_attribute: Option<String>,
    #[validate(range(min = 0))]
    pub skill_choice_cap: Option<i32>,
    pub description: Option<String>,
    pub abilities: Option<Vec<CreateAbility>>,
    pub selectable_skill_ids: Option<Vec<DbId>>,
    pub automatic_skill_ids: Option<Vec<DbId>>,
}

impl UpdateClass {
    pub fn replaces_skills(&self) -> bool {
        self.selectable_skill_ids.is_some() || self.automatic_skill_ids.is_some()
    }
}

/// DTO for `PATCH /classes/{id}/stats`.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct UpdateClassStats {
    #[validate(range(min = 1, max = 50))]
    pub hp_per_level: i32,
    #[validate(range(min = 0, max = 50))]
    pub mp_per_level: i32,
}

/// Skill configuration of a class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSkills {
    pub class_id: DbId,
    pub skill_choice_cap: i32,
    pub selectable: Vec<Skill>,
    pub automatic: Vec<Skill>,
}

/// A class with its abilities and skill configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ClassWithDetails {
    #[serde(flatten)]
    pub class: Class,
    pub abilities: Vec<Ability>,
    pub selectable_skills: Vec<Skill>,
    pub automatic_skills: Vec<Skill>,
}

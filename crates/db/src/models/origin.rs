//! Origin entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use t20_core::types::{DbId, Timestamp};

use crate::models::ability::{Ability, CreateAbility};
use crate::models::power::Power;
use crate::models::skill::Skill;

/// A row from the `origins` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Origin {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrigin {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub abilities: Vec<CreateAbility>,
    #[serde(default)]
    pub skill_ids: Vec<DbId>,
    #[serde(default)]
    pub power_ids: Vec<DbId>,
}

/// DTO for updating an origin. Present collections replace the stored ones.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrigin {
    pub name: Option<String>,
    pub description: Option<String>,
    pub abilities: Option<Vec<CreateAbility>>,
    pub skill_ids: Option<Vec<DbId>>,
    pub power_ids: Option<Vec<DbId>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OriginWithDetails {
    #[serde(flatten)]
    pub origin: Origin,
    pub abilities: Vec<Ability>,
    pub skills: Vec<Skill>,
    pub powers: Vec<Power>,
}

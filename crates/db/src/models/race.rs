//! Race entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use t20_core::attributes::AttributeModifier;
use t20_core::types::{DbId, Timestamp};

use crate::models::ability::{Ability, CreateAbility};
use crate::models::skill::Skill;

/// A row from the `races` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Race {
    pub id: DbId,
    pub name: String,
    pub attribute_bonuses: Json<Vec<AttributeModifier>>,
    pub attribute_penalty: Option<Json<AttributeModifier>>,
    pub size: String,
    /// Movement in meters.
    pub speed: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a race together with its abilities and automatic skills.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRace {
    pub name: String,
    #[serde(default)]
    pub attribute_bonuses: Vec<AttributeModifier>,
    pub attribute_penalty: Option<AttributeModifier>,
    /// Defaults to `Médio`.
    pub size: Option<String>,
    /// Defaults to 9.
    pub speed: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub abilities: Vec<CreateAbility>,
    #[serde(default)]
    pub skill_ids: Vec<DbId>,
}

/// DTO for updating a race. `abilities` and `skill_ids` replace the stored
/// sets when present.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRace {
    pub name: Option<String>,
    pub attribute_bonuses: Option<Vec<AttributeModifier>>,
    pub attribute_penalty: Option<AttributeModifier>,
    pub size: Option<String>,
    pub speed: Option<i32>,
    pub description: Option<String>,
    pub abilities: Option<Vec<CreateAbility>>,
    pub skill_ids: Option<Vec<DbId>>,
}

/// A race with its abilities and automatic skills.
#[derive(Debug, Clone, Serialize)]
pub struct RaceWithDetails {
    #[serde(flatten)]
    pub race: Race,
    pub abilities: Vec<Ability>,
    pub skills: Vec<Skill>,
}

//! Deity entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use t20_core::types::{DbId, Timestamp};

use crate::models::ability::{Ability, CreateAbility};

/// A row from the `deities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deity {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub alignment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeity {
    pub name: String,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub alignment: Option<String>,
    /// Devotee abilities; `level` is the devotee level that unlocks each.
    #[serde(default)]
    pub abilities: Vec<CreateAbility>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDeity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub alignment: Option<String>,
    pub abilities: Option<Vec<CreateAbility>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeityWithDetails {
    #[serde(flatten)]
    pub deity: Deity,
    pub abilities: Vec<Ability>,
}

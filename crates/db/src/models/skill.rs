//! Skill catalog and per-character skill grants.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use t20_core::types::{DbId, Timestamp};

/// A row from the `skills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub id: DbId,
    pub name: String,
    /// Governing attribute, e.g. `agility`.
    pub attribute: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkill {
    pub name: String,
    pub attribute: String,
    pub description: Option<String>,
}

/// A stored skill choice joined with its catalog entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterSkill {
    pub skill_id: DbId,
    pub name: String,
    pub attribute: String,
    /// `class` or `race`.
    pub source: String,
    pub created_at: Timestamp,
}

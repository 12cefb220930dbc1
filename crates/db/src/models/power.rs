//! Power catalog and per-character power grants.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use t20_core::types::{DbId, Timestamp};

/// A row from the `powers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Power {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// One of `combat`, `destiny`, `magic`, `origin`.
    pub category: String,
    pub prerequisites: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePower {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub prerequisites: Option<String>,
}

/// A stored class or deity power joined with its catalog entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterPower {
    pub power_id: DbId,
    pub name: String,
    pub category: String,
    /// `class` or `deity`.
    pub source: String,
    /// Character level at assignment time.
    pub level: i32,
    pub created_at: Timestamp,
}

//! Abilities granted by races, classes, origins and deities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use t20_core::error::CoreError;
use t20_core::types::{DbId, Timestamp};

/// Which reference entity an ability belongs to.
///
/// Each owner has its own `<owner>_abilities` table with the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityOwner {
    Race,
    Class,
    Origin,
    Deity,
}

impl AbilityOwner {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Race => "race",
            Self::Class => "class",
            Self::Origin => "origin",
            Self::Deity => "deity",
        }
    }

    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Race => "race_abilities",
            Self::Class => "class_abilities",
            Self::Origin => "origin_abilities",
            Self::Deity => "deity_abilities",
        }
    }

    pub(crate) fn owner_column(self) -> &'static str {
        match self {
            Self::Race => "race_id",
            Self::Class => "class_id",
            Self::Origin => "origin_id",
            Self::Deity => "deity_id",
        }
    }

    /// Entity name used in not-found errors.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Race => "Race",
            Self::Class => "Class",
            Self::Origin => "Origin",
            Self::Deity => "Deity",
        }
    }
}

impl fmt::Display for AbilityOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbilityOwner {
    type Err = CoreError;

    /// Accepts the singular or plural resource name (`race`, `races`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "race" | "races" => Ok(Self::Race),
            "class" | "classes" => Ok(Self::Class),
            "origin" | "origins" => Ok(Self::Origin),
            "deity" | "deities" => Ok(Self::Deity),
            other => Err(CoreError::Validation(format!(
                "Unknown ability owner '{other}', expected race, class, origin or deity"
            ))),
        }
    }
}

/// A row from one of the `<owner>_abilities` tables.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ability {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Level at which the ability unlocks (devotee level for deities).
    pub level: i32,
    pub is_optional: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for an ability submitted alongside its owner.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAbility {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to 1.
    pub level: Option<i32>,
    /// Defaults to `false`.
    pub is_optional: Option<bool>,
}

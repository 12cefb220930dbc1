//! Character entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use t20_core::attributes::Attributes;
use t20_core::ownership::{CreatedByType, OwnerStamp};
use t20_core::skills::SkillGrant;
use t20_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `characters` table.
///
/// Derived stats are not stored; compute them from this row on every read.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub level: i32,
    pub strength: i32,
    pub agility: i32,
    pub fortitude: i32,
    pub intellect: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub race_id: DbId,
    pub class_id: DbId,
    pub origin_id: DbId,
    pub deity_id: Option<DbId>,
    /// NOT NULL in the database; defaults to `{}`.
    pub racial_choices: serde_json::Value,
    #[serde(skip_serializing)]
    pub session_token: Option<String>,
    #[serde(skip_serializing)]
    pub network_address: Option<String>,
    pub created_by_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Character {
    pub fn attributes(&self) -> Attributes {
        Attributes {
            strength: self.strength,
            agility: self.agility,
            fortitude: self.fortitude,
            intellect: self.intellect,
            wisdom: self.wisdom,
            charisma: self.charisma,
        }
    }

    /// The owner stamp recorded at creation.
    ///
    /// An unrecognized `created_by_type` is read as `hybrid`; matching only
    /// looks at the token and address.
    pub fn owner_stamp(&self) -> OwnerStamp {
        OwnerStamp {
            session_token: self.session_token.clone(),
            network_address: self.network_address.clone(),
            created_by: self
                .created_by_type
                .parse()
                .unwrap_or(CreatedByType::Hybrid),
        }
    }
}

fn default_level() -> i32 {
    1
}

/// Body of `POST /characters` and `PUT /characters/{id}`.
///
/// Grant lists are optional: absent leaves stored grants untouched on update
/// and creates none on insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CharacterInput {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    #[serde(default = "default_level")]
    #[validate(range(min = 1, max = 20))]
    pub level: i32,
    #[serde(flatten)]
    #[validate(nested)]
    pub attributes: Attributes,
    pub race_id: DbId,
    pub class_id: DbId,
    pub origin_id: DbId,
    pub deity_id: Option<DbId>,
    pub racial_choices: Option<serde_json::Value>,
    pub skill_ids: Option<Vec<DbId>>,
    pub class_power_ids: Option<Vec<DbId>>,
    pub deity_power_ids: Option<Vec<DbId>>,
}

/// Already-validated grants written together with a character row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterGrants<'a> {
    pub skills: Option<&'a [SkillGrant]>,
    pub class_power_ids: Option<&'a [DbId]>,
    pub deity_power_ids: Option<&'a [DbId]>,
}

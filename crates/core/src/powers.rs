//! Power categories and the rules for replacing a character's power grants.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Catalog category of a power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerCategory {
    Combat,
    Destiny,
    Magic,
    Origin,
}

impl PowerCategory {
    pub const ALL: [PowerCategory; 4] = [
        PowerCategory::Combat,
        PowerCategory::Destiny,
        PowerCategory::Magic,
        PowerCategory::Origin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Combat => "combat",
            Self::Destiny => "destiny",
            Self::Magic => "magic",
            Self::Origin => "origin",
        }
    }
}

impl fmt::Display for PowerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PowerCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown power category '{s}', expected one of combat, destiny, magic, origin"
                ))
            })
    }
}

/// Which of a character's power lists a grant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerSource {
    Class,
    Deity,
}

impl PowerSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Deity => "deity",
        }
    }
}

impl fmt::Display for PowerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapse duplicate power IDs, keeping the first occurrence.
pub fn dedupe_power_ids(submitted: &[DbId]) -> Vec<DbId> {
    let mut seen = HashSet::new();
    submitted.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Reject a replacement list that references powers absent from the catalog.
pub fn ensure_powers_exist(power_ids: &[DbId], known: &HashSet<DbId>) -> Result<(), CoreError> {
    let missing: Vec<String> = power_ids
        .iter()
        .filter(|id| !known.contains(id))
        .map(|id| id.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown power id(s): {}",
            missing.join(", ")
        )))
    }
}

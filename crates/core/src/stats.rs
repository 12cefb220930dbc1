//! Derived statistics: hit points, mana points and defense.
//!
//! The base formula is shared by every character:
//!
//! ```text
//! hit_points  = (hp_per_level + FORT) * level
//! mana_points = (mp_per_level + INT)  * level
//! defense     = 10 + AGI
//! ```
//!
//! Race- and class-specific bonuses are looked up by exact name in a
//! [`StatAdjustmentTable`]. New races and classes add entries to the table;
//! the formula itself never changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attributes::{validate_level, Attribute, Attributes};
use crate::error::CoreError;

/// Defense before any attribute or adjustment is applied.
pub const BASE_DEFENSE: i32 = 10;

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// The per-level growth of a class, as needed by the derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassProgression<'a> {
    pub name: &'a str,
    pub hp_per_level: i32,
    pub mp_per_level: i32,
}

/// Hit points, mana points and defense of a character.
///
/// Always recomputed from current state; never authoritative when stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedStats {
    pub hit_points: i32,
    pub mana_points: i32,
    pub defense: i32,
}

// ---------------------------------------------------------------------------
// Adjustment table
// ---------------------------------------------------------------------------

/// Additive bonus registered for one race or class name.
///
/// `*_per_level` fields are multiplied by the character level; the others
/// are flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatAdjustment {
    pub hit_points: i32,
    pub hit_points_per_level: i32,
    pub mana_points: i32,
    pub mana_points_per_level: i32,
    pub defense: i32,
}

impl StatAdjustment {
    fn apply(&self, stats: &mut DerivedStats, level: i32) {
        stats.hit_points += self.hit_points + self.hit_points_per_level * level;
        stats.mana_points += self.mana_points + self.mana_points_per_level * level;
        stats.defense += self.defense;
    }
}

/// Name-keyed race and class adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatAdjustmentTable {
    pub races: HashMap<String, StatAdjustment>,
    pub classes: HashMap<String, StatAdjustment>,
}

impl StatAdjustmentTable {
    /// An empty table: only the base formula applies.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The adjustments of the core rulebook races and classes.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.register_race(
            "Elfo",
            StatAdjustment {
                defense: 1,
                ..Default::default()
            },
        );
        table.register_race(
            "Anão",
            StatAdjustment {
                hit_points_per_level: 2,
                ..Default::default()
            },
        );
        table.register_class(
            "Guerreiro",
            StatAdjustment {
                hit_points_per_level: 1,
                ..Default::default()
            },
        );
        table.register_class(
            "Mago",
            StatAdjustment {
                mana_points_per_level: 1,
                ..Default::default()
            },
        );
        table
    }

    /// Parse a table from its JSON form:
    ///
    /// ```json
    /// { "races":   { "Elfo": { "defense": 1 } },
    ///   "classes": { "Mago": { "mana_points_per_level": 1 } } }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid stat adjustment table: {e}")))
    }

    pub fn register_race(&mut self, name: impl Into<String>, adjustment: StatAdjustment) {
        self.races.insert(name.into(), adjustment);
    }

    pub fn register_class(&mut self, name: impl Into<String>, adjustment: StatAdjustment) {
        self.classes.insert(name.into(), adjustment);
    }

    pub fn race(&self, name: &str) -> Option<&StatAdjustment> {
        self.races.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&StatAdjustment> {
        self.classes.get(name)
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Base formula with no race or class adjustment.
pub fn base_stats(attributes: &Attributes, class: &ClassProgression<'_>, level: i32) -> DerivedStats {
    DerivedStats {
        hit_points: (class.hp_per_level + attributes.modifier(Attribute::Fortitude)) * level,
        mana_points: (class.mp_per_level + attributes.modifier(Attribute::Intellect)) * level,
        defense: BASE_DEFENSE + attributes.modifier(Attribute::Agility),
    }
}

/// Compute a character's derived stats.
///
/// Attribute ranges are trusted; only the level is checked. Unknown race or
/// class names contribute nothing.
pub fn derive_stats(
    attributes: &Attributes,
    class: &ClassProgression<'_>,
    race_name: &str,
    level: i32,
    table: &StatAdjustmentTable,
) -> Result<DerivedStats, CoreError> {
    validate_level(level)?;

    let mut stats = base_stats(attributes, class, level);
    if let Some(adjustment) = table.race(race_name) {
        adjustment.apply(&mut stats, level);
    }
    if let Some(adjustment) = table.class(class.name) {
        adjustment.apply(&mut stats, level);
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

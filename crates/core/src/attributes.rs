//! Primary attributes, level bounds, and race attribute modifiers.
//!
//! Tormenta20 uses the raw attribute value as its modifier, so there is no
//! score-to-modifier curve: an attribute of 3 contributes +3 wherever it is
//! referenced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Lowest value a primary attribute may hold at character creation.
pub const MIN_ATTRIBUTE: i32 = 0;
/// Highest value a primary attribute may hold at character creation.
pub const MAX_ATTRIBUTE: i32 = 4;

pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL: i32 = 20;

/// A race may grant at most this many attribute bonuses.
pub const MAX_RACE_BONUSES: usize = 3;

// ---------------------------------------------------------------------------
// Attribute enum
// ---------------------------------------------------------------------------

/// One of the six primary attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Agility,
    Fortitude,
    Intellect,
    Wisdom,
    Charisma,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Strength,
        Attribute::Agility,
        Attribute::Fortitude,
        Attribute::Intellect,
        Attribute::Wisdom,
        Attribute::Charisma,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Agility => "agility",
            Self::Fortitude => "fortitude",
            Self::Intellect => "intellect",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        }
    }

    /// Three-letter abbreviation printed on character sheets.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Agility => "AGI",
            Self::Fortitude => "FORT",
            Self::Intellect => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.as_str() == s || a.abbreviation().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::Validation(format!("Unknown attribute '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Attribute block
// ---------------------------------------------------------------------------

/// The six primary attributes of a character. Omitted fields default to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Attributes {
    #[validate(range(min = 0, max = 4))]
    pub strength: i32,
    #[validate(range(min = 0, max = 4))]
    pub agility: i32,
    #[validate(range(min = 0, max = 4))]
    pub fortitude: i32,
    #[validate(range(min = 0, max = 4))]
    pub intellect: i32,
    #[validate(range(min = 0, max = 4))]
    pub wisdom: i32,
    #[validate(range(min = 0, max = 4))]
    pub charisma: i32,
}

impl Attributes {
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Agility => self.agility,
            Attribute::Fortitude => self.fortitude,
            Attribute::Intellect => self.intellect,
            Attribute::Wisdom => self.wisdom,
            Attribute::Charisma => self.charisma,
        }
    }

    /// Modifier for an attribute. Equal to the raw value in this ruleset.
    pub fn modifier(&self, attribute: Attribute) -> i32 {
        self.get(attribute)
    }
}

/// Validate that a character level lies within `[MIN_LEVEL, MAX_LEVEL]`.
pub fn validate_level(level: i32) -> Result<(), CoreError> {
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return Err(CoreError::Validation(format!(
            "level must be between {MIN_LEVEL} and {MAX_LEVEL}, got {level}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Race modifiers
// ---------------------------------------------------------------------------

/// A signed delta applied to one attribute by a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub attribute: Attribute,
    pub value: i32,
}

/// Validate a race's attribute bonuses and optional penalty.
///
/// Bonuses must be positive, at most [`MAX_RACE_BONUSES`] of them, and may
/// not target the same attribute twice. A penalty must be negative.
pub fn validate_race_modifiers(
    bonuses: &[AttributeModifier],
    penalty: Option<&AttributeModifier>,
) -> Result<(), CoreError> {
    if bonuses.len() > MAX_RACE_BONUSES {
        return Err(CoreError::Validation(format!(
            "a race may have at most {MAX_RACE_BONUSES} attribute bonuses, got {}",
            bonuses.len()
        )));
    }

    for (i, bonus) in bonuses.iter().enumerate() {
        if bonus.value <= 0 {
            return Err(CoreError::Validation(format!(
                "attribute bonus for {} must be positive",
                bonus.attribute
            )));
        }
        if bonuses[..i].iter().any(|b| b.attribute == bonus.attribute) {
            return Err(CoreError::Validation(format!(
                "attribute {} has more than one bonus",
                bonus.attribute
            )));
        }
    }

    if let Some(p) = penalty {
        if p.value >= 0 {
            return Err(CoreError::Validation(format!(
                "attribute penalty for {} must be negative",
                p.attribute
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

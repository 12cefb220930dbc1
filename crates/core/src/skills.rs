//! Skill entitlement: partitioning a submitted skill list into automatic,
//! class-chosen and race-chosen grants, and checking it against the class
//! choice cap and the skill catalog.
//!
//! Automatic skills (granted by race, origin or class) are implicit. They are
//! never stored as a player choice and resubmitting one is not an error.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Grant source
// ---------------------------------------------------------------------------

/// Which pool a stored skill choice was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Class,
    Race,
}

impl SkillSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Race => "race",
        }
    }
}

impl fmt::Display for SkillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(Self::Class),
            "race" => Ok(Self::Race),
            other => Err(CoreError::Validation(format!("Unknown skill source '{other}'"))),
        }
    }
}

/// One accepted skill choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SkillGrant {
    pub skill_id: DbId,
    pub source: SkillSource,
}

// ---------------------------------------------------------------------------
// Entitlements
// ---------------------------------------------------------------------------

/// Everything a character's race, origin and class say about skills.
#[derive(Debug, Clone, Default)]
pub struct SkillEntitlements {
    pub class_name: String,
    /// Maximum number of `class` choices.
    pub class_choice_cap: usize,
    pub class_selectable: HashSet<DbId>,
    pub class_automatic: HashSet<DbId>,
    pub race_automatic: HashSet<DbId>,
    pub origin_automatic: HashSet<DbId>,
}

impl SkillEntitlements {
    /// Union of race, origin and class automatic skills.
    pub fn automatic(&self) -> HashSet<DbId> {
        self.race_automatic
            .iter()
            .chain(&self.origin_automatic)
            .chain(&self.class_automatic)
            .copied()
            .collect()
    }
}

/// Result of partitioning a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSelection {
    /// Accepted choices in submission order.
    pub grants: Vec<SkillGrant>,
    /// Automatic skills that were submitted and silently dropped.
    pub dropped_automatic: Vec<DbId>,
}

impl SkillSelection {
    pub fn skill_ids(&self) -> Vec<DbId> {
        self.grants.iter().map(|g| g.skill_id).collect()
    }

    pub fn count(&self, source: SkillSource) -> usize {
        self.grants.iter().filter(|g| g.source == source).count()
    }
}

/// Partition a submission and enforce the class choice cap.
///
/// Duplicate IDs are collapsed to their first occurrence. IDs outside the
/// class's selectable set are classified as `race` choices without checking
/// a race or origin pool, since none is modelled.
pub fn select_skills(
    entitlements: &SkillEntitlements,
    submitted: &[DbId],
) -> Result<SkillSelection, CoreError> {
    let automatic = entitlements.automatic();
    let mut seen = HashSet::new();
    let mut selection = SkillSelection::default();

    for &skill_id in submitted {
        if !seen.insert(skill_id) {
            continue;
        }
        if automatic.contains(&skill_id) {
            selection.dropped_automatic.push(skill_id);
            continue;
        }
        let source = if entitlements.class_selectable.contains(&skill_id) {
            SkillSource::Class
        } else {
            SkillSource::Race
        };
        selection.grants.push(SkillGrant { skill_id, source });
    }

    let class_choices = selection.count(SkillSource::Class);
    if class_choices > entitlements.class_choice_cap {
        return Err(CoreError::Entitlement(format!(
            "At most {} class skills may be chosen for {}, got {}",
            entitlements.class_choice_cap, entitlements.class_name, class_choices
        )));
    }

    Ok(selection)
}

/// Ensure every accepted choice refers to a skill present in the catalog.
///
/// `known` holds the IDs the catalog returned for [`SkillSelection::skill_ids`].
pub fn ensure_skills_exist(
    selection: &SkillSelection,
    known: &HashSet<DbId>,
) -> Result<(), CoreError> {
    let missing: Vec<String> = selection
        .grants
        .iter()
        .filter(|g| !known.contains(&g.skill_id))
        .map(|g| g.skill_id.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown skill id(s): {}",
            missing.join(", ")
        )))
    }
}

/// A class's selectable and automatic skill sets must not overlap.
pub fn validate_class_skill_sets(
    selectable: &[DbId],
    automatic: &[DbId],
) -> Result<(), CoreError> {
    let automatic: HashSet<_> = automatic.iter().collect();
    let overlap: Vec<String> = selectable
        .iter()
        .filter(|id| automatic.contains(id))
        .map(|id| id.to_string())
        .collect();

    if overlap.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Skill id(s) {} cannot be both selectable and automatic",
            overlap.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const A: DbId = 1;
    const B: DbId = 2;
    const C: DbId = 3;
    const D: DbId = 4;
    const E: DbId = 5;
    const F: DbId = 6;

    /// cap = 2, selectable = {A, B, C}, class automatic = {D}, race automatic = {E}.
    fn fighter() -> SkillEntitlements {
        SkillEntitlements {
            class_name: "Guerreiro".into(),
            class_choice_cap: 2,
            class_selectable: [A, B, C].into(),
            class_automatic: [D].into(),
            race_automatic: [E].into(),
            origin_automatic: HashSet::new(),
        }
    }

    #[test]
    fn automatic_skills_are_dropped_and_choices_classified() {
        let selection = select_skills(&fighter(), &[A, B, D, E]).unwrap();
        assert_eq!(
            selection.grants,
            vec![
                SkillGrant { skill_id: A, source: SkillSource::Class },
                SkillGrant { skill_id: B, source: SkillSource::Class },
            ]
        );
        assert_eq!(selection.count(SkillSource::Race), 0);
        assert_eq!(selection.dropped_automatic, vec![D, E]);
    }

    #[test]
    fn over_cap_is_rejected_naming_cap_and_class() {
        let err = select_skills(&fighter(), &[A, B, C]).unwrap_err();
        assert_matches!(&err, CoreError::Entitlement(msg) if msg.contains('2') && msg.contains("Guerreiro"));
    }

    #[test]
    fn including_automatic_skills_equals_omitting_them() {
        let with = select_skills(&fighter(), &[E, A, D, F]).unwrap();
        let without = select_skills(&fighter(), &[A, F]).unwrap();
        assert_eq!(with.grants, without.grants);
    }

    #[test]
    fn unlisted_skill_is_classified_as_race_choice() {
        let selection = select_skills(&fighter(), &[F]).unwrap();
        assert_eq!(
            selection.grants,
            vec![SkillGrant { skill_id: F, source: SkillSource::Race }]
        );
    }

    #[test]
    fn race_choices_do_not_count_against_class_cap() {
        let selection = select_skills(&fighter(), &[A, B, F, 7, 8]).unwrap();
        assert_eq!(selection.count(SkillSource::Class), 2);
        assert_eq!(selection.count(SkillSource::Race), 3);
    }

    #[test]
    fn origin_automatic_skills_are_dropped() {
        let mut ent = fighter();
        ent.origin_automatic.insert(C);
        let selection = select_skills(&ent, &[A, B, C]).unwrap();
        assert_eq!(selection.skill_ids(), vec![A, B]);
    }

    #[test]
    fn duplicate_submissions_collapse() {
        let selection = select_skills(&fighter(), &[A, A, A, B]).unwrap();
        assert_eq!(selection.skill_ids(), vec![A, B]);
    }

    #[test]
    fn empty_submission_is_accepted() {
        let selection = select_skills(&fighter(), &[]).unwrap();
        assert!(selection.grants.is_empty());
    }

    #[test]
    fn unknown_skill_ids_are_reported() {
        let selection = select_skills(&fighter(), &[A, 99]).unwrap();
        let known: HashSet<DbId> = [A].into();
        let err = ensure_skills_exist(&selection, &known).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("99"));
    }

    #[test]
    fn known_skills_pass_catalog_check() {
        let selection = select_skills(&fighter(), &[A, F]).unwrap();
        assert!(ensure_skills_exist(&selection, &[A, F].into()).is_ok());
    }

    #[test]
    fn class_skill_sets_must_be_disjoint() {
        assert!(validate_class_skill_sets(&[A, B], &[C]).is_ok());
        assert_matches!(
            validate_class_skill_sets(&[A, B], &[B]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn skill_source_round_trips_through_str() {
        for source in [SkillSource::Class, SkillSource::Race] {
            assert_eq!(source.as_str().parse::<SkillSource>().unwrap(), source);
        }
        assert!("origin".parse::<SkillSource>().is_err());
    }
}

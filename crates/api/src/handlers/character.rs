//! Handlers for the `/characters` resource.
//!
//! Characters are scoped to the caller resolved by the owner middleware: a
//! character stamped with another session and address is reported as 404.
//! Derived stats are never stored; every response recomputes them from the
//! current class progression and the stat adjustment table.
//!
//! Sub-resources (skills, powers, racial choices) live in
//! [`super::character_grants`]; the printable sheet in [`super::sheet`].

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use t20_core::attributes::Attributes;
use t20_core::error::CoreError;
use t20_core::ownership::CallerIdentity;
use t20_core::powers::{dedupe_power_ids, ensure_powers_exist, PowerSource};
use t20_core::racial_choices::normalize_racial_choices;
use t20_core::skills::{ensure_skills_exist, select_skills, SkillSelection};
use t20_core::stats::{derive_stats, ClassProgression, DerivedStats, StatAdjustmentTable};
use t20_core::types::DbId;
use t20_db::models::character::{Character, CharacterGrants, CharacterInput};
use t20_db::models::class::Class;
use t20_db::models::power::CharacterPower;
use t20_db::models::skill::CharacterSkill;
use t20_db::repositories::{
    CharacterPowerRepo, CharacterRepo, CharacterSkillRepo, ClassRepo, PowerRepo, RaceRepo,
    SkillRepo,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::owner::Owner;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// A character row with its freshly derived stats.
#[derive(Debug, Serialize)]
pub struct CharacterWithStats {
    #[serde(flatten)]
    pub character: Character,
    pub stats: DerivedStats,
}

/// A character with stats and every stored grant.
#[derive(Debug, Serialize)]
pub struct CharacterDetails {
    #[serde(flatten)]
    pub character: Character,
    pub stats: DerivedStats,
    pub skills: Vec<CharacterSkill>,
    pub class_powers: Vec<CharacterPower>,
    pub deity_powers: Vec<CharacterPower>,
}

/// Body of `POST /characters/calculate`.
#[derive(Debug, Deserialize, Validate)]
pub struct CalculateStatsInput {
    #[validate(range(min = 1, max = 20))]
    pub level: i32,
    #[serde(flatten)]
    #[validate(nested)]
    pub attributes: Attributes,
    pub race_id: DbId,
    pub class_id: DbId,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Character",
        id,
    })
}

/// Load a character visible to `caller`, or 404.
pub(crate) async fn find_owned(
    state: &AppState,
    id: DbId,
    caller: &CallerIdentity,
) -> AppResult<Character> {
    CharacterRepo::find_owned(&state.pool, id, caller)
        .await?
        .ok_or_else(|| not_found(id))
}

pub(crate) fn progression(class: &Class) -> ClassProgression<'_> {
    ClassProgression {
        name: &class.name,
        hp_per_level: class.hp_per_level,
        mp_per_level: class.mp_per_level,
    }
}

fn stats_for(
    character: &Character,
    class: &Class,
    race_name: &str,
    rules: &StatAdjustmentTable,
) -> AppResult<DerivedStats> {
    Ok(derive_stats(
        &character.attributes(),
        &progression(class),
        race_name,
        character.level,
        rules,
    )?)
}

/// Derive the stats of one stored character.
pub(crate) async fn derive_for(state: &AppState, character: &Character) -> AppResult<DerivedStats> {
    let class = ClassRepo::find_by_id(&state.pool, character.class_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "Character {} references missing class {}",
                character.id, character.class_id
            ))
        })?;
    let race = RaceRepo::find_by_id(&state.pool, character.race_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "Character {} references missing race {}",
                character.id, character.race_id
            ))
        })?;
    stats_for(character, &class, &race.name, &state.stat_rules)
}

async fn details(state: &AppState, character: Character) -> AppResult<CharacterDetails> {
    let stats = derive_for(state, &character).await?;
    let skills = CharacterSkillRepo::list(&state.pool, character.id).await?;
    let class_powers = CharacterPowerRepo::list(&state.pool, character.id, PowerSource::Class).await?;
    let deity_powers = CharacterPowerRepo::list(&state.pool, character.id, PowerSource::Deity).await?;
    Ok(CharacterDetails {
        character,
        stats,
        skills,
        class_powers,
        deity_powers,
    })
}

/// Validate a skill submission against the entitlements of a race, class and
/// origin combination.
///
/// Automatic skills are dropped, class choices are capped, and every kept
/// ID must exist in the catalog. Nothing is written.
pub(crate) async fn validate_skill_choices(
    state: &AppState,
    race_id: DbId,
    class_id: DbId,
    origin_id: DbId,
    submitted: &[DbId],
) -> AppResult<SkillSelection> {
    let entitlements = SkillRepo::load_entitlements(&state.pool, race_id, class_id, origin_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Class with id {class_id} not found")))?;

    let selection = select_skills(&entitlements, submitted)?;
    let known = SkillRepo::find_existing_ids(&state.pool, &selection.skill_ids()).await?;
    ensure_skills_exist(&selection, &known)?;

    if !selection.dropped_automatic.is_empty() {
        tracing::debug!(
            class = %entitlements.class_name,
            dropped = ?selection.dropped_automatic,
            "Automatic skills dropped from submission"
        );
    }
    Ok(selection)
}

/// Deduplicate a power list and reject IDs missing from the catalog.
pub(crate) async fn validate_power_choices(
    state: &AppState,
    submitted: &[DbId],
) -> AppResult<Vec<DbId>> {
    let power_ids = dedupe_power_ids(submitted);
    let known = PowerRepo::find_existing_ids(&state.pool, &power_ids).await?;
    ensure_powers_exist(&power_ids, &known)?;
    Ok(power_ids)
}

/// Grants of a create or full-update body after validation.
#[derive(Default)]
struct ValidatedGrants {
    skills: Option<SkillSelection>,
    class_power_ids: Option<Vec<DbId>>,
    deity_power_ids: Option<Vec<DbId>>,
}

impl ValidatedGrants {
    async fn from_input(state: &AppState, input: &CharacterInput) -> AppResult<Self> {
        let mut grants = Self::default();
        if let Some(skill_ids) = &input.skill_ids {
            grants.skills = Some(
                validate_skill_choices(
                    state,
                    input.race_id,
                    input.class_id,
                    input.origin_id,
                    skill_ids,
                )
                .await?,
            );
        }
        if let Some(ids) = &input.class_power_ids {
            grants.class_power_ids = Some(validate_power_choices(state, ids).await?);
        }
        if let Some(ids) = &input.deity_power_ids {
            grants.deity_power_ids = Some(validate_power_choices(state, ids).await?);
        }
        Ok(grants)
    }

    fn as_grants(&self) -> CharacterGrants<'_> {
        CharacterGrants {
            skills: self.skills.as_ref().map(|s| s.grants.as_slice()),
            class_power_ids: self.class_power_ids.as_deref(),
            deity_power_ids: self.deity_power_ids.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/characters
///
/// Characters owned by the caller, newest first.
pub async fn list(
    State(state): State<AppState>,
    Owner(caller): Owner,
) -> AppResult<Json<DataResponse<Vec<CharacterWithStats>>>> {
    let characters = CharacterRepo::list_owned(&state.pool, &caller).await?;

    let classes: HashMap<DbId, Class> = ClassRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let race_names: HashMap<DbId, String> = RaceRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    let mut data = Vec::with_capacity(characters.len());
    for character in characters {
        let class = classes.get(&character.class_id).ok_or_else(|| {
            AppError::InternalError(format!("Missing class {}", character.class_id))
        })?;
        let race_name = race_names
            .get(&character.race_id)
            .map(String::as_str)
            .unwrap_or_default();
        let stats = stats_for(&character, class, race_name, &state.stat_rules)?;
        data.push(CharacterWithStats { character, stats });
    }

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/characters
///
/// Creates the character, stamped with the caller's session and address,
/// together with any submitted grants in one transaction.
pub async fn create(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppJson(input): AppJson<CharacterInput>,
) -> AppResult<(StatusCode, Json<DataResponse<CharacterDetails>>)> {
    input.validate()?;
    let racial_choices = normalize_racial_choices(input.racial_choices.clone())?;
    let stamp = caller
        .stamp()
        .ok_or_else(|| AppError::BadRequest("Caller identity could not be resolved".into()))?;
    let grants = ValidatedGrants::from_input(&state, &input).await?;

    let character =
        CharacterRepo::create(&state.pool, &input, &racial_choices, &stamp, grants.as_grants())
            .await?;

    tracing::info!(
        character_id = character.id,
        created_by = %stamp.created_by,
        "Character created"
    );

    let data = details(&state, character).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<CharacterDetails>>> {
    let character = find_owned(&state, id, &caller).await?;
    let data = details(&state, character).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/characters/{id}
///
/// Full replace of the character's fields. Grant lists are replaced only
/// when present in the body.
///
/// Changing race, class or origin without `skill_ids` re-validates the stored
/// skill choices against the new combination: choices that became automatic
/// are dropped, sources are re-tagged, and a choice count above the new
/// class cap is rejected.
pub async fn update(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CharacterInput>,
) -> AppResult<Json<DataResponse<CharacterDetails>>> {
    input.validate()?;
    let existing = find_owned(&state, id, &caller).await?;
    let racial_choices = normalize_racial_choices(input.racial_choices.clone())?;
    let mut grants = ValidatedGrants::from_input(&state, &input).await?;

    let lineage_changed = existing.race_id != input.race_id
        || existing.class_id != input.class_id
        || existing.origin_id != input.origin_id;
    if grants.skills.is_none() && lineage_changed {
        let stored: Vec<DbId> = CharacterSkillRepo::list(&state.pool, id)
            .await?
            .into_iter()
            .map(|skill| skill.skill_id)
            .collect();
        let selection = validate_skill_choices(
            &state,
            input.race_id,
            input.class_id,
            input.origin_id,
            &stored,
        )
        .await?;
        if !selection.dropped_automatic.is_empty() {
            tracing::info!(
                character_id = id,
                dropped = ?selection.dropped_automatic,
                "Stored skill choices now granted automatically"
            );
        }
        grants.skills = Some(selection);
    }

    let character = CharacterRepo::update(&state.pool, id, &input, &racial_choices, grants.as_grants())
        .await?
        .ok_or_else(|| not_found(id))?;

    let data = details(&state, character).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, id, &caller).await?;
    if CharacterRepo::delete(&state.pool, id).await? {
        tracing::info!(character_id = id, "Character deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Stateless calculation
// ---------------------------------------------------------------------------

/// POST /api/v1/characters/calculate
///
/// Derives stats for an unsaved character with the same rules applied to
/// stored ones. Nothing is written.
pub async fn calculate(
    State(state): State<AppState>,
    AppJson(input): AppJson<CalculateStatsInput>,
) -> AppResult<Json<DataResponse<DerivedStats>>> {
    input.validate()?;

    let class = ClassRepo::find_by_id(&state.pool, input.class_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Class",
            id: input.class_id,
        }))?;
    let race = RaceRepo::find_by_id(&state.pool, input.race_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Race",
            id: input.race_id,
        }))?;

    let stats = derive_stats(
        &input.attributes,
        &progression(&class),
        &race.name,
        input.level,
        &state.stat_rules,
    )?;
    Ok(Json(DataResponse { data: stats }))
}

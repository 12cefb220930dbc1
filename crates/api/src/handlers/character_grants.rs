//! Handlers for the per-character sub-resources:
//!
//! - `/characters/{id}/skills` -- trained skill choices;
//! - `/characters/{id}/class-powers` and `/deity-powers` -- chosen powers;
//! - `/characters/{id}/racial-choices` -- free-form racial choice document.
//!
//! Every write is a full replace. `POST` is routed to the same handlers as
//! `PUT`.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use t20_core::ownership::CallerIdentity;
use t20_core::powers::PowerSource;
use t20_core::racial_choices::normalize_racial_choices;
use t20_core::types::DbId;
use t20_db::models::power::CharacterPower;
use t20_db::models::skill::CharacterSkill;
use t20_db::repositories::{CharacterPowerRepo, CharacterRepo, CharacterSkillRepo};

use super::character::{find_owned, not_found, validate_power_choices, validate_skill_choices};
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::owner::Owner;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReplaceSkills {
    pub skill_ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct CharacterSkills {
    pub character_id: DbId,
    pub skills: Vec<CharacterSkill>,
    /// Submitted IDs ignored because the character already has them
    /// automatically. Empty on reads.
    pub dropped_automatic: Vec<DbId>,
}

/// GET /api/v1/characters/{id}/skills
pub async fn list_skills(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<CharacterSkills>>> {
    find_owned(&state, id, &caller).await?;
    let skills = CharacterSkillRepo::list(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CharacterSkills {
            character_id: id,
            skills,
            dropped_automatic: Vec::new(),
        },
    }))
}

/// PUT /api/v1/characters/{id}/skills
///
/// Validated against the character's current race, class and origin, then
/// swapped in one transaction.
pub async fn replace_skills(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ReplaceSkills>,
) -> AppResult<Json<DataResponse<CharacterSkills>>> {
    let character = find_owned(&state, id, &caller).await?;
    let selection = validate_skill_choices(
        &state,
        character.race_id,
        character.class_id,
        character.origin_id,
        &input.skill_ids,
    )
    .await?;

    CharacterSkillRepo::replace(&state.pool, id, &selection.grants).await?;
    tracing::info!(character_id = id, count = selection.grants.len(), "Character skills replaced");

    let skills = CharacterSkillRepo::list(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CharacterSkills {
            character_id: id,
            skills,
            dropped_automatic: selection.dropped_automatic,
        },
    }))
}

// ---------------------------------------------------------------------------
// Powers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReplacePowers {
    pub power_ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct CharacterPowers {
    pub character_id: DbId,
    pub source: PowerSource,
    pub powers: Vec<CharacterPower>,
}

async fn list_powers(
    state: &AppState,
    caller: &CallerIdentity,
    id: DbId,
    source: PowerSource,
) -> AppResult<CharacterPowers> {
    find_owned(state, id, caller).await?;
    let powers = CharacterPowerRepo::list(&state.pool, id, source).await?;
    Ok(CharacterPowers {
        character_id: id,
        source,
        powers,
    })
}

async fn replace_powers(
    state: &AppState,
    caller: &CallerIdentity,
    id: DbId,
    source: PowerSource,
    submitted: &[DbId],
) -> AppResult<CharacterPowers> {
    let character = find_owned(state, id, caller).await?;
    let power_ids = validate_power_choices(state, submitted).await?;

    CharacterPowerRepo::replace(&state.pool, id, source, &power_ids, character.level).await?;
    tracing::info!(
        character_id = id,
        source = source.as_str(),
        count = power_ids.len(),
        "Character powers replaced"
    );

    let powers = CharacterPowerRepo::list(&state.pool, id, source).await?;
    Ok(CharacterPowers {
        character_id: id,
        source,
        powers,
    })
}

/// GET /api/v1/characters/{id}/class-powers
pub async fn list_class_powers(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<CharacterPowers>>> {
    let data = list_powers(&state, &caller, id, PowerSource::Class).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/characters/{id}/class-powers
///
/// Rows are stamped with the character's current level. An empty list
/// clears the class powers and leaves deity powers alone.
pub async fn replace_class_powers(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ReplacePowers>,
) -> AppResult<Json<DataResponse<CharacterPowers>>> {
    let data = replace_powers(&state, &caller, id, PowerSource::Class, &input.power_ids).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/characters/{id}/deity-powers
pub async fn list_deity_powers(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<CharacterPowers>>> {
    let data = list_powers(&state, &caller, id, PowerSource::Deity).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/characters/{id}/deity-powers
pub async fn replace_deity_powers(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ReplacePowers>,
) -> AppResult<Json<DataResponse<CharacterPowers>>> {
    let data = replace_powers(&state, &caller, id, PowerSource::Deity, &input.power_ids).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Racial choices
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReplaceRacialChoices {
    #[serde(default)]
    pub racial_choices: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct RacialChoices {
    pub character_id: DbId,
    pub racial_choices: serde_json::Value,
}

/// GET /api/v1/characters/{id}/racial-choices
pub async fn get_racial_choices(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<RacialChoices>>> {
    let character = find_owned(&state, id, &caller).await?;
    Ok(Json(DataResponse {
        data: RacialChoices {
            character_id: id,
            racial_choices: character.racial_choices,
        },
    }))
}

/// PUT /api/v1/characters/{id}/racial-choices
///
/// Replaces the whole document. `null` or an absent field stores `{}`.
pub async fn replace_racial_choices(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ReplaceRacialChoices>,
) -> AppResult<Json<DataResponse<RacialChoices>>> {
    find_owned(&state, id, &caller).await?;
    let racial_choices = normalize_racial_choices(input.racial_choices)?;

    let character = CharacterRepo::update_racial_choices(&state.pool, id, &racial_choices)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: RacialChoices {
            character_id: id,
            racial_choices: character.racial_choices,
        },
    }))
}

//! Handlers for the `/races` resource.
//!
//! A race carries attribute modifiers, abilities and the skills it grants
//! automatically.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use t20_core::attributes::validate_race_modifiers;
use t20_core::error::CoreError;
use t20_core::types::DbId;
use t20_db::models::race::{CreateRace, Race, RaceWithDetails, UpdateRace};
use t20_db::models::skill::Skill;
use t20_db::repositories::{RaceRepo, SkillRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Race", id })
}

/// GET /api/v1/races
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<RaceWithDetails>>>> {
    let races = RaceRepo::list_with_details(&state.pool).await?;
    Ok(Json(DataResponse { data: races }))
}

/// POST /api/v1/races
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateRace>,
) -> AppResult<(StatusCode, Json<DataResponse<Race>>)> {
    validate_race_modifiers(&input.attribute_bonuses, input.attribute_penalty.as_ref())?;
    let race = RaceRepo::create(&state.pool, &input).await?;
    tracing::info!(race_id = race.id, name = %race.name, "Race created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: race })))
}

/// GET /api/v1/races/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<RaceWithDetails>>> {
    let race = RaceRepo::find_by_id_with_details(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: race }))
}

/// PUT /api/v1/races/{id}
///
/// Absent fields are kept. Submitted `abilities` or `skill_ids` replace the
/// stored lists.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateRace>,
) -> AppResult<Json<DataResponse<Race>>> {
    validate_race_modifiers(
        input.attribute_bonuses.as_deref().unwrap_or_default(),
        input.attribute_penalty.as_ref(),
    )?;
    let race = RaceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: race }))
}

/// DELETE /api/v1/races/{id}
///
/// Races still referenced by a character cannot be deleted (400).
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if RaceRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/races/{id}/skills
pub async fn skills(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<Skill>>>> {
    RaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let skills = SkillRepo::list_for_race(&state.pool, id).await?;
    Ok(Json(DataResponse { data: skills }))
}

//! Handlers for the `/origins` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use t20_core::error::CoreError;
use t20_core::types::DbId;
use t20_db::models::origin::{CreateOrigin, Origin, OriginWithDetails, UpdateOrigin};
use t20_db::models::power::Power;
use t20_db::models::skill::Skill;
use t20_db::repositories::{OriginRepo, PowerRepo, SkillRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Origin", id })
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    OriginRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/origins
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Origin>>>> {
    let origins = OriginRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: origins }))
}

/// POST /api/v1/origins
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateOrigin>,
) -> AppResult<(StatusCode, Json<DataResponse<Origin>>)> {
    let origin = OriginRepo::create(&state.pool, &input).await?;
    tracing::info!(origin_id = origin.id, name = %origin.name, "Origin created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: origin })))
}

/// GET /api/v1/origins/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<OriginWithDetails>>> {
    let origin = OriginRepo::find_by_id_with_details(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: origin }))
}

/// PUT /api/v1/origins/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateOrigin>,
) -> AppResult<Json<DataResponse<Origin>>> {
    let origin = OriginRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: origin }))
}

/// DELETE /api/v1/origins/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if OriginRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/origins/{id}/skills
pub async fn skills(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<Skill>>>> {
    ensure_exists(&state, id).await?;
    let skills = SkillRepo::list_for_origin(&state.pool, id).await?;
    Ok(Json(DataResponse { data: skills }))
}

/// GET /api/v1/origins/{id}/powers
pub async fn powers(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<Power>>>> {
    ensure_exists(&state, id).await?;
    let powers = PowerRepo::list_for_origin(&state.pool, id).await?;
    Ok(Json(DataResponse { data: powers }))
}

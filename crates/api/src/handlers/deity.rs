//! Handlers for the `/deities` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use t20_core::error::CoreError;
use t20_core::types::DbId;
use t20_db::models::deity::{CreateDeity, Deity, DeityWithDetails, UpdateDeity};
use t20_db::repositories::DeityRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Deity", id })
}

/// GET /api/v1/deities
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Deity>>>> {
    let deities = DeityRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: deities }))
}

/// POST /api/v1/deities
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateDeity>,
) -> AppResult<(StatusCode, Json<DataResponse<Deity>>)> {
    let deity = DeityRepo::create(&state.pool, &input).await?;
    tracing::info!(deity_id = deity.id, name = %deity.name, "Deity created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: deity })))
}

/// GET /api/v1/deities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<DeityWithDetails>>> {
    let deity = DeityRepo::find_by_id_with_details(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: deity }))
}

/// PUT /api/v1/deities/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateDeity>,
) -> AppResult<Json<DataResponse<Deity>>> {
    let deity = DeityRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: deity }))
}

/// DELETE /api/v1/deities/{id}
///
/// Characters devoted to the deity keep existing with no deity.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if DeityRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

//! Handlers for the power catalog at `/powers`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use t20_core::error::CoreError;
use t20_core::powers::PowerCategory;
use t20_core::types::DbId;
use t20_db::models::power::{CreatePower, Power};
use t20_db::repositories::PowerRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Power", id })
}

/// GET /api/v1/powers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Power>>>> {
    let powers = PowerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: powers }))
}

/// GET /api/v1/powers/category/{category}
///
/// The category match is case-insensitive; an unknown category is a 400.
pub async fn list_by_category(
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> AppResult<Json<DataResponse<Vec<Power>>>> {
    let category: PowerCategory = category.parse()?;
    let powers = PowerRepo::list_by_category(&state.pool, category).await?;
    Ok(Json(DataResponse { data: powers }))
}

/// POST /api/v1/powers
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreatePower>,
) -> AppResult<(StatusCode, Json<DataResponse<Power>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    input.category = input.category.trim().parse::<PowerCategory>()?.as_str().to_string();

    let power = PowerRepo::create(&state.pool, &input).await?;
    tracing::info!(power_id = power.id, category = %power.category, "Power created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: power })))
}

/// GET /api/v1/powers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Power>>> {
    let power = PowerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: power }))
}

/// DELETE /api/v1/powers/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if PowerRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

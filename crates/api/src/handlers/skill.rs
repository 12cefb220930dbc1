//! Handlers for the skill catalog at `/skills`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use t20_core::attributes::Attribute;
use t20_core::error::CoreError;
use t20_core::types::DbId;
use t20_db::models::skill::{CreateSkill, Skill};
use t20_db::repositories::SkillRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Skill", id })
}

/// GET /api/v1/skills
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Skill>>>> {
    let skills = SkillRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: skills }))
}

/// POST /api/v1/skills
///
/// `attribute` accepts the full name or the abbreviation (`"agility"` or
/// `"AGI"`).
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateSkill>,
) -> AppResult<(StatusCode, Json<DataResponse<Skill>>)> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    input.name = name.to_string();
    input.attribute = input.attribute.trim().parse::<Attribute>()?.as_str().to_string();

    let skill = SkillRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: skill })))
}

/// GET /api/v1/skills/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Skill>>> {
    let skill = SkillRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: skill }))
}

/// DELETE /api/v1/skills/{id}
///
/// Grants referencing the skill are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if SkillRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

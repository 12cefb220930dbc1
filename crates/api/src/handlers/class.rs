//! Handlers for the `/classes` resource.
//!
//! Besides CRUD, classes expose their hit/mana progression for partial
//! update and their skill sets (choice cap, selectable, automatic).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use t20_core::attributes::Attribute;
use t20_core::error::CoreError;
use t20_core::skills::validate_class_skill_sets;
use t20_core::types::DbId;
use t20_db::models::class::{
    Class, ClassSkills, ClassWithDetails, CreateClass, UpdateClass, UpdateClassStats,
};
use t20_db::repositories::{CharacterSkillRepo, ClassRepo, SkillRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Class", id })
}

/// Canonical stored spelling of a primary attribute (`"INT"` -> `"intellect"`).
fn canonical_attribute(raw: &str) -> Result<String, CoreError> {
    Ok(raw.trim().parse::<Attribute>()?.as_str().to_string())
}

/// GET /api/v1/classes
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Class>>>> {
    let classes = ClassRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: classes }))
}

/// POST /api/v1/classes
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateClass>,
) -> AppResult<(StatusCode, Json<DataResponse<Class>>)> {
    input.validate()?;
    input.primary_attribute = canonical_attribute(&input.primary_attribute)?;
    validate_class_skill_sets(&input.selectable_skill_ids, &input.automatic_skill_ids)?;

    let class = ClassRepo::create(&state.pool, &input).await?;
    tracing::info!(class_id = class.id, name = %class.name, "Class created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: class })))
}

/// GET /api/v1/classes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<ClassWithDetails>>> {
    let class = ClassRepo::find_by_id_with_details(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: class }))
}

/// PUT /api/v1/classes/{id}
///
/// A skill list left out of the body keeps its stored value, so sending only
/// `selectable_skill_ids` never touches the automatic set. Skill-set or cap
/// changes that would leave a character with more class choices than the
/// new cap are rejected with 409.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(mut input): AppJson<UpdateClass>,
) -> AppResult<Json<DataResponse<Class>>> {
    input.validate()?;
    if let Some(attribute) = input.primary_attribute.as_deref() {
        input.primary_attribute = Some(canonical_attribute(attribute)?);
    }

    let stored = ClassRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if input.replaces_skills() {
        if input.selectable_skill_ids.is_none() {
            input.selectable_skill_ids = Some(stored_skill_ids(&state, id, false).await?);
        }
        if input.automatic_skill_ids.is_none() {
            input.automatic_skill_ids = Some(stored_skill_ids(&state, id, true).await?);
        }
        validate_class_skill_sets(
            input.selectable_skill_ids.as_deref().unwrap_or_default(),
            input.automatic_skill_ids.as_deref().unwrap_or_default(),
        )?;
    }

    if input.replaces_skills() || input.skill_choice_cap.is_some() {
        let cap = input.skill_choice_cap.unwrap_or(stored.skill_choice_cap);
        let selectable = match input.selectable_skill_ids.clone() {
            Some(ids) => ids,
            None => stored_skill_ids(&state, id, false).await?,
        };
        let held = CharacterSkillRepo::max_choices_within(&state.pool, id, &selectable).await?;
        if held > i64::from(cap) {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "A character of class '{}' holds {held} class skill choices, above the new cap of {cap}",
                stored.name
            ))));
        }
    }

    let class = ClassRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: class }))
}

async fn stored_skill_ids(state: &AppState, id: DbId, automatic: bool) -> AppResult<Vec<DbId>> {
    let skills = SkillRepo::list_for_class(&state.pool, id, automatic).await?;
    Ok(skills.into_iter().map(|skill| skill.id).collect())
}

/// PATCH /api/v1/classes/{id}/stats
pub async fn update_stats(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateClassStats>,
) -> AppResult<Json<DataResponse<Class>>> {
    input.validate()?;
    let class = ClassRepo::update_stats(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        class_id = id,
        hp_per_level = class.hp_per_level,
        mp_per_level = class.mp_per_level,
        "Class progression updated"
    );
    Ok(Json(DataResponse { data: class }))
}

/// DELETE /api/v1/classes/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if ClassRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/classes/{id}/skills
pub async fn skills(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<ClassSkills>>> {
    let skills = ClassRepo::skills(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: skills }))
}

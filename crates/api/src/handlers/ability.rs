//! Handlers for `/abilities/{owner}/{id}`.
//!
//! `owner` is one of `race`, `class`, `origin` or `deity` (plural forms are
//! accepted too). An unknown owner kind is a 400; an unknown owner id yields
//! an empty list.

use axum::extract::State;
use axum::Json;
use t20_core::attributes::validate_level;
use t20_core::types::DbId;
use t20_db::models::ability::{Ability, AbilityOwner};
use t20_db::repositories::AbilityRepo;

use crate::error::AppResult;
use crate::extract::AppPath;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/abilities/{owner}/{id}
pub async fn list_for_owner(
    State(state): State<AppState>,
    AppPath((owner, owner_id)): AppPath<(String, DbId)>,
) -> AppResult<Json<DataResponse<Vec<Ability>>>> {
    let owner: AbilityOwner = owner.parse()?;
    let abilities = AbilityRepo::list_for_owner(&state.pool, owner, owner_id).await?;
    Ok(Json(DataResponse { data: abilities }))
}

/// GET /api/v1/abilities/{owner}/{id}/level/{level}
///
/// Abilities unlocked at or below `level`.
pub async fn list_unlocked(
    State(state): State<AppState>,
    AppPath((owner, owner_id, level)): AppPath<(String, DbId, i32)>,
) -> AppResult<Json<DataResponse<Vec<Ability>>>> {
    let owner: AbilityOwner = owner.parse()?;
    validate_level(level)?;
    let abilities = AbilityRepo::list_unlocked(&state.pool, owner, owner_id, level).await?;
    Ok(Json(DataResponse { data: abilities }))
}

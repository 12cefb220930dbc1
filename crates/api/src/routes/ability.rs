//! Route definitions for race, class, origin and deity abilities.

use axum::routing::get;
use axum::Router;

use crate::handlers::ability;
use crate::state::AppState;

/// Routes mounted at `/abilities`.
///
/// ```text
/// GET    /{owner}/{id}                  -> list_for_owner
/// GET    /{owner}/{id}/level/{level}    -> list_unlocked
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{owner}/{id}", get(ability::list_for_owner))
        .route("/{owner}/{id}/level/{level}", get(ability::list_unlocked))
}

//! Route definitions for the power catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::power;
use crate::state::AppState;

/// Routes mounted at `/powers`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /category/{category}    -> list_by_category
/// GET    /{id}                   -> get_by_id
/// DELETE /{id}                   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(power::list).post(power::create))
        .route("/category/{category}", get(power::list_by_category))
        .route("/{id}", get(power::get_by_id).delete(power::delete))
}

//! Route definitions for the `/races` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::race;
use crate::state::AppState;

/// Routes mounted at `/races`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/skills      -> skills
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(race::list).post(race::create))
        .route(
            "/{id}",
            get(race::get_by_id).put(race::update).delete(race::delete),
        )
        .route("/{id}/skills", get(race::skills))
}

//! Route definitions for the `/origins` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::origin;
use crate::state::AppState;

/// Routes mounted at `/origins`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/skills      -> skills
/// GET    /{id}/powers      -> powers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(origin::list).post(origin::create))
        .route(
            "/{id}",
            get(origin::get_by_id)
                .put(origin::update)
                .delete(origin::delete),
        )
        .route("/{id}/skills", get(origin::skills))
        .route("/{id}/powers", get(origin::powers))
}

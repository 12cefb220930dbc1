//! Route definitions for the `/deities` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::deity;
use crate::state::AppState;

/// Routes mounted at `/deities`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(deity::list).post(deity::create))
        .route(
            "/{id}",
            get(deity::get_by_id).put(deity::update).delete(deity::delete),
        )
}

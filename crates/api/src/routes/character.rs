//! Route definitions for the `/characters` resource and its sub-resources.
//!
//! Every route here is scoped to the caller resolved by the owner
//! middleware, except the stateless `calculate`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{character, character_grants, sheet};
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// POST   /calculate                -> calculate
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
///
/// GET    /{id}/skills              -> list_skills
/// PUT    /{id}/skills              -> replace_skills       (POST alias)
/// GET    /{id}/class-powers        -> list_class_powers
/// PUT    /{id}/class-powers        -> replace_class_powers (POST alias)
/// GET    /{id}/deity-powers        -> list_deity_powers
/// PUT    /{id}/deity-powers        -> replace_deity_powers (POST alias)
/// GET    /{id}/racial-choices      -> get_racial_choices
/// PUT    /{id}/racial-choices      -> replace_racial_choices (POST alias)
///
/// GET    /{id}/sheet               -> render
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list).post(character::create))
        .route("/calculate", post(character::calculate))
        .route(
            "/{id}",
            get(character::get_by_id)
                .put(character::update)
                .delete(character::delete),
        )
        .route(
            "/{id}/skills",
            get(character_grants::list_skills)
                .put(character_grants::replace_skills)
                .post(character_grants::replace_skills),
        )
        .route(
            "/{id}/class-powers",
            get(character_grants::list_class_powers)
                .put(character_grants::replace_class_powers)
                .post(character_grants::replace_class_powers),
        )
        .route(
            "/{id}/deity-powers",
            get(character_grants::list_deity_powers)
                .put(character_grants::replace_deity_powers)
                .post(character_grants::replace_deity_powers),
        )
        .route(
            "/{id}/racial-choices",
            get(character_grants::get_racial_choices)
                .put(character_grants::replace_racial_choices)
                .post(character_grants::replace_racial_choices),
        )
        .route("/{id}/sheet", get(sheet::render))
}

pub mod ability;
pub mod character;
pub mod class;
pub mod deity;
pub mod health;
pub mod origin;
pub mod power;
pub mod race;
pub mod skill;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /races                                   list, create
/// /races/{id}                              get, update, delete
/// /races/{id}/skills                       automatic skills
///
/// /classes                                 list, create
/// /classes/{id}                            get, update, delete
/// /classes/{id}/stats                      hp/mp per level (PATCH)
/// /classes/{id}/skills                     cap, selectable, automatic
///
/// /origins                                 list, create
/// /origins/{id}                            get, update, delete
/// /origins/{id}/skills                     granted skills
/// /origins/{id}/powers                     granted powers
///
/// /deities                                 list, create
/// /deities/{id}                            get, update, delete
///
/// /skills                                  list, create
/// /skills/{id}                             get, delete
///
/// /powers                                  list, create
/// /powers/category/{category}              filter by category
/// /powers/{id}                             get, delete
///
/// /abilities/{owner}/{id}                  abilities of an owner
/// /abilities/{owner}/{id}/level/{level}    abilities unlocked at level
///
/// /characters                              list (caller's), create
/// /characters/calculate                    stateless stat derivation (POST)
/// /characters/{id}                         get, update, delete
/// /characters/{id}/skills                  list, replace
/// /characters/{id}/class-powers            list, replace
/// /characters/{id}/deity-powers            list, replace
/// /characters/{id}/racial-choices          get, replace
/// /characters/{id}/sheet                   rendered sheet
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/races", race::router())
        .nest("/classes", class::router())
        .nest("/origins", origin::router())
        .nest("/deities", deity::router())
        .nest("/skills", skill::router())
        .nest("/powers", power::router())
        .nest("/abilities", ability::router())
        .nest("/characters", character::router())
}

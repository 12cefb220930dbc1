#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use t20_api::config::ServerConfig;
use t20_api::router::build_app_router;
use t20_api::state::AppState;
use t20_core::sheet::TextSheetRenderer;
use t20_core::stats::StatAdjustmentTable;

/// Session token sent by the plain request helpers.
pub const TEST_SESSION: &str = "test-session";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        db_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        stat_adjustments_path: None,
        json_logs: false,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and the built-in stat adjustment table.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        stat_rules: Arc::new(StatAdjustmentTable::builtin()),
        sheet_renderer: Arc::new(TextSheetRenderer),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Identity headers attached to a request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Caller<'a> {
    pub session: Option<&'a str>,
    pub address: Option<&'a str>,
}

impl Caller<'static> {
    pub fn test() -> Self {
        Caller {
            session: Some(TEST_SESSION),
            address: None,
        }
    }
}

pub fn request(method: Method, uri: &str, body: Option<Value>, caller: Caller<'_>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = caller.session {
        builder = builder.header("x-user-session-id", session);
    }
    if let Some(address) = caller.address {
        builder = builder.header("x-forwarded-for", address);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None, Caller::test())).await
}

pub async fn get_as(app: Router, uri: &str, caller: Caller<'_>) -> Response {
    send(app, request(Method::GET, uri, None, caller)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, request(Method::POST, uri, Some(body), Caller::test())).await
}

pub async fn post_json_as(app: Router, uri: &str, body: Value, caller: Caller<'_>) -> Response {
    send(app, request(Method::POST, uri, Some(body), caller)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, request(Method::PUT, uri, Some(body), Caller::test())).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, request(Method::PATCH, uri, Some(body), Caller::test())).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, request(Method::DELETE, uri, None, Caller::test())).await
}

pub async fn delete_as(app: Router, uri: &str, caller: Caller<'_>) -> Response {
    send(app, request(Method::DELETE, uri, None, caller)).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Reference data fixtures
// ---------------------------------------------------------------------------

/// IDs of a small, consistent rule set created through the API.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    /// `Anão`: +2 hit points per level; grants Fortitude automatically.
    pub race_id: i64,
    /// `Guerreiro`: 20 hp / 3 mp per level, cap 2, Luta automatic.
    pub class_id: i64,
    pub origin_id: i64,
    pub deity_id: i64,
    /// Class-selectable skills.
    pub atletismo: i64,
    pub intimidacao: i64,
    pub pontaria: i64,
    /// Not offered by the class.
    pub furtividade: i64,
    /// Automatic from race, class and origin respectively.
    pub fortitude: i64,
    pub luta: i64,
    pub oficio: i64,
    pub combat_power: i64,
    pub destiny_power: i64,
}

/// ID of a seeded skill by name.
pub async fn skill_id(app: &Router, name: &str) -> i64 {
    let json = body_json(get(app.clone(), "/api/v1/skills").await).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == name)
        .unwrap_or_else(|| panic!("seeded skill {name} missing"))["id"]
        .as_i64()
        .unwrap()
}

pub async fn create(app: &Router, uri: &str, body: Value) -> i64 {
    let response = post_json(app.clone(), uri, body).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, 201, "POST {uri} failed: {json}");
    json["data"]["id"].as_i64().unwrap()
}

pub async fn seed_fixture(app: &Router) -> Fixture {
    let atletismo = skill_id(app, "Atletismo").await;
    let intimidacao = skill_id(app, "Intimidação").await;
    let pontaria = skill_id(app, "Pontaria").await;
    let furtividade = skill_id(app, "Furtividade").await;
    let fortitude = skill_id(app, "Fortitude").await;
    let luta = skill_id(app, "Luta").await;
    let oficio = skill_id(app, "Ofício").await;

    let race_id = create(
        app,
        "/api/v1/races",
        json!({
            "name": "Anão",
            "attribute_bonuses": [
                {"attribute": "fortitude", "value": 2},
                {"attribute": "wisdom", "value": 1}
            ],
            "attribute_penalty": {"attribute": "agility", "value": -1},
            "speed": 6,
            "abilities": [
                {"name": "Conhecimento das Rochas", "level": 1},
                {"name": "Duro como Pedra", "level": 5}
            ],
            "skill_ids": [fortitude]
        }),
    )
    .await;

    let class_id = create(
        app,
        "/api/v1/classes",
        json!({
            "name": "Guerreiro",
            "hp_per_level": 20,
            "mp_per_level": 3,
            "primary_attribute": "strength",
            "skill_choice_cap": 2,
            "abilities": [{"name": "Ataque Especial", "level": 1}],
            "selectable_skill_ids": [atletismo, intimidacao, pontaria],
            "automatic_skill_ids": [luta]
        }),
    )
    .await;

    let combat_power = create(
        app,
        "/api/v1/powers",
        json!({"name": "Ataque Poderoso", "category": "combat"}),
    )
    .await;
    let destiny_power = create(
        app,
        "/api/v1/powers",
        json!({"name": "Vontade de Ferro", "category": "destiny"}),
    )
    .await;

    let origin_id = create(
        app,
        "/api/v1/origins",
        json!({
            "name": "Ferreiro",
            "abilities": [{"name": "Forja", "level": 1}],
            "skill_ids": [oficio],
            "power_ids": [combat_power]
        }),
    )
    .await;

    let deity_id = create(
        app,
        "/api/v1/deities",
        json!({
            "name": "Khalmyr",
            "domain": "Justiça",
            "abilities": [{"name": "Devoto Fiel", "level": 1}]
        }),
    )
    .await;

    Fixture {
        race_id,
        class_id,
        origin_id,
        deity_id,
        atletismo,
        intimidacao,
        pontaria,
        furtividade,
        fortitude,
        luta,
        oficio,
        combat_power,
        destiny_power,
    }
}

/// Body for a level-5 dwarf warrior with FORT 2.
pub fn character_body(f: &Fixture) -> Value {
    json!({
        "name": "Thorin",
        "level": 5,
        "strength": 3,
        "agility": 1,
        "fortitude": 2,
        "intellect": 0,
        "wisdom": 1,
        "charisma": 0,
        "race_id": f.race_id,
        "class_id": f.class_id,
        "origin_id": f.origin_id,
        "deity_id": f.deity_id
    })
}

//! Integration tests for the per-character skill and power sub-resources.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, get, post_json, put_json, Fixture};
use serde_json::json;
use sqlx::PgPool;

async fn setup(pool: PgPool) -> (Router, Fixture, i64) {
    let app = common::build_test_app(pool);
    let fixture = common::seed_fixture(&app).await;
    let response =
        post_json(app.clone(), "/api/v1/characters", common::character_body(&fixture)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    (app, fixture, id)
}

fn ids(list: &serde_json::Value, key: &str) -> Vec<i64> {
    let mut ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row[key].as_i64().unwrap())
        .collect();
    ids.sort();
    ids
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn replace_skills_drops_automatic_and_reports_them(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");

    let response = put_json(
        app.clone(),
        &uri,
        json!({"skill_ids": [f.atletismo, f.fortitude, f.luta, f.oficio]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["character_id"], id);
    assert_eq!(ids(&data["skills"], "skill_id"), vec![f.atletismo]);
    let mut dropped: Vec<i64> = serde_json::from_value(data["dropped_automatic"].clone()).unwrap();
    dropped.sort();
    let mut expected = vec![f.fortitude, f.luta, f.oficio];
    expected.sort();
    assert_eq!(dropped, expected);

    // Submitting the automatic skills is the same as omitting them.
    let response = put_json(app.clone(), &uri, json!({"skill_ids": [f.atletismo]})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(ids(&data["skills"], "skill_id"), vec![f.atletismo]);
    assert_eq!(data["dropped_automatic"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn two_class_choices_plus_automatic_are_accepted(pool: PgPool) {
    let (app, f, id) = setup(pool).await;

    let response = put_json(
        app,
        &format!("/api/v1/characters/{id}/skills"),
        json!({"skill_ids": [f.atletismo, f.intimidacao, f.luta, f.fortitude]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let skills = body_json(response).await["data"]["skills"].clone();
    let rows = skills.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|s| s["source"] == "class"));
    let mut expected = vec![f.atletismo, f.intimidacao];
    expected.sort();
    assert_eq!(ids(&skills, "skill_id"), expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn class_skill_cap_is_enforced(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");

    let response = put_json(
        app,
        &uri,
        json!({"skill_ids": [f.atletismo, f.intimidacao, f.pontaria]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ENTITLEMENT_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains('2'));
    assert!(message.contains("Guerreiro"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn race_choices_do_not_count_against_cap(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");

    let response = post_json(
        app,
        &uri,
        json!({"skill_ids": [f.atletismo, f.intimidacao, f.furtividade]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let skills = body_json(response).await["data"]["skills"].clone();
    let race_choice = skills
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["skill_id"] == f.furtividade)
        .unwrap()
        .clone();
    assert_eq!(race_choice["source"], "race");
    assert_eq!(race_choice["name"], "Furtividade");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_replace_keeps_previous_skills(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");

    let response = put_json(app.clone(), &uri, json!({"skill_ids": [f.pontaria]})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(app.clone(), &uri, json!({"skill_ids": [f.atletismo, 999_999]})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = put_json(
        app.clone(),
        &uri,
        json!({"skill_ids": [f.atletismo, f.intimidacao, f.pontaria]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let data = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(ids(&data["skills"], "skill_id"), vec![f.pontaria]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_skill_list_clears_choices(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");

    put_json(app.clone(), &uri, json!({"skill_ids": [f.atletismo]})).await;
    let response = put_json(app.clone(), &uri, json!({"skill_ids": []})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(data["skills"], json!([]));
}

// ---------------------------------------------------------------------------
// Reference-data changes
// ---------------------------------------------------------------------------

fn sources(skills: &serde_json::Value) -> Vec<(i64, String)> {
    let mut rows: Vec<(i64, String)> = skills
        .as_array()
        .unwrap()
        .iter()
        .map(|s| (s["skill_id"].as_i64().unwrap(), s["source"].as_str().unwrap().to_string()))
        .collect();
    rows.sort();
    rows
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn narrowing_class_selectable_set_retags_choices(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");
    put_json(app.clone(), &uri, json!({"skill_ids": [f.atletismo, f.intimidacao]})).await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/classes/{}", f.class_id),
        json!({"selectable_skill_ids": [f.atletismo, f.pontaria]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(get(app, &uri).await).await["data"].clone();
    let mut expected = vec![
        (f.atletismo, "class".to_string()),
        (f.intimidacao, "race".to_string()),
    ];
    expected.sort();
    assert_eq!(sources(&data["skills"]), expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn class_automatic_skill_replaces_stored_choice(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");
    put_json(app.clone(), &uri, json!({"skill_ids": [f.atletismo, f.furtividade]})).await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/classes/{}", f.class_id),
        json!({"automatic_skill_ids": [f.luta, f.furtividade]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(sources(&data["skills"]), vec![(f.atletismo, "class".to_string())]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lowering_class_cap_below_held_choices_conflicts(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");
    put_json(app.clone(), &uri, json!({"skill_ids": [f.atletismo, f.intimidacao]})).await;
    let class_uri = format!("/api/v1/classes/{}", f.class_id);

    let response = put_json(app.clone(), &class_uri, json!({"skill_choice_cap": 1})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].as_str().unwrap().contains("Guerreiro"));

    let data = body_json(get(app.clone(), &class_uri).await).await["data"].clone();
    assert_eq!(data["skill_choice_cap"], 2);

    // Dropping one of the held skills from the selectable set brings the
    // count back under the lower cap.
    let response = put_json(
        app.clone(),
        &class_uri,
        json!({"skill_choice_cap": 1, "selectable_skill_ids": [f.atletismo, f.pontaria]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(get(app, &uri).await).await["data"].clone();
    let mut expected = vec![
        (f.atletismo, "class".to_string()),
        (f.intimidacao, "race".to_string()),
    ];
    expected.sort();
    assert_eq!(sources(&data["skills"]), expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn race_and_origin_skill_changes_drop_stored_choices(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/skills");
    put_json(
        app.clone(),
        &uri,
        json!({"skill_ids": [f.atletismo, f.furtividade, f.pontaria]}),
    )
    .await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/races/{}", f.race_id),
        json!({"skill_ids": [f.fortitude, f.furtividade]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app.clone(),
        &format!("/api/v1/origins/{}", f.origin_id),
        json!({"skill_ids": [f.oficio, f.pontaria]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(sources(&data["skills"]), vec![(f.atletismo, "class".to_string())]);
}

// ---------------------------------------------------------------------------
// Powers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn class_and_deity_powers_are_replaced_independently(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let class_uri = format!("/api/v1/characters/{id}/class-powers");
    let deity_uri = format!("/api/v1/characters/{id}/deity-powers");

    let response = put_json(app.clone(), &deity_uri, json!({"power_ids": [f.destiny_power]})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app.clone(),
        &class_uri,
        json!({"power_ids": [f.combat_power, f.combat_power]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["source"], "class");
    assert_eq!(ids(&data["powers"], "power_id"), vec![f.combat_power]);
    assert_eq!(data["powers"][0]["level"], 5);

    // Clearing class powers leaves deity powers alone.
    let response = post_json(app.clone(), &class_uri, json!({"power_ids": []})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["powers"], json!([]));

    let data = body_json(get(app, &deity_uri).await).await["data"].clone();
    assert_eq!(data["source"], "deity");
    assert_eq!(ids(&data["powers"], "power_id"), vec![f.destiny_power]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_power_is_rejected_without_changes(pool: PgPool) {
    let (app, f, id) = setup(pool).await;
    let uri = format!("/api/v1/characters/{id}/class-powers");

    put_json(app.clone(), &uri, json!({"power_ids": [f.combat_power]})).await;
    let response = put_json(app.clone(), &uri, json!({"power_ids": [f.destiny_power, 424_242]})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("424242"));

    let data = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(ids(&data["powers"], "power_id"), vec![f.combat_power]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn power_rows_are_stamped_with_current_level(pool: PgPool) {
    let (app, f, id) = setup(pool).await;

    let mut body = common::character_body(&f);
    body["level"] = json!(8);
    let response = put_json(app.clone(), &format!("/api/v1/characters/{id}"), body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app,
        &format!("/api/v1/characters/{id}/deity-powers"),
        json!({"power_ids": [f.destiny_power]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["powers"][0]["level"], 8);
}

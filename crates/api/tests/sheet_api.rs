//! Integration tests for `GET /characters/{id}/sheet`.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, get, post_json, Caller};
use serde_json::json;
use sqlx::PgPool;

async fn create_with_grants(app: &axum::Router, f: &common::Fixture) -> i64 {
    let mut body = common::character_body(f);
    body["skill_ids"] = json!([f.atletismo, f.furtividade]);
    body["class_power_ids"] = json!([f.combat_power]);
    body["deity_power_ids"] = json!([f.destiny_power]);
    let response = post_json(app.clone(), "/api/v1/characters", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sheet_renders_as_text_document(pool: PgPool) {
    let app = common::build_test_app(pool);
    let f = common::seed_fixture(&app).await;
    let id = create_with_grants(&app, &f).await;

    let response = get(app, &format!("/api/v1/characters/{id}/sheet?sections=skills,notes")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["content-type"], "text/plain; charset=utf-8");
    assert_eq!(
        headers["content-disposition"],
        "inline; filename=\"thorin-sheet.txt\""
    );

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("Thorin"));
    assert!(text.contains("Hit points:  125"));
    assert!(text.contains("[class] Ataque Poderoso"));
    assert!(text.contains("[deity] Vontade de Ferro"));
    assert!(text.contains("SKILLS"));
    assert!(text.contains("NOTES"));
    assert!(!text.contains("INVENTORY"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sheet_json_view_marks_trained_skills_and_unlocked_abilities(pool: PgPool) {
    let app = common::build_test_app(pool);
    let f = common::seed_fixture(&app).await;
    let id = create_with_grants(&app, &f).await;

    let response = get(app, &format!("/api/v1/characters/{id}/sheet?format=json")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let sheet = body_json(response).await["data"].clone();
    assert_eq!(sheet["race"], "Anão");
    assert_eq!(sheet["class"], "Guerreiro");
    assert_eq!(sheet["deity"], "Khalmyr");
    assert_eq!(sheet["stats"]["hit_points"], 125);
    assert_eq!(sheet["attributes"].as_array().unwrap().len(), 6);

    let skills = sheet["skills"].as_array().unwrap();
    assert_eq!(skills.len(), 29);
    let row = |name: &str| skills.iter().find(|s| s["name"] == name).unwrap().clone();
    assert_eq!(row("Atletismo")["source"], "class");
    assert_eq!(row("Furtividade")["source"], "race");
    assert_eq!(row("Luta")["source"], "automatic");
    assert_eq!(row("Fortitude")["source"], "automatic");
    assert_eq!(row("Ofício")["source"], "automatic");
    assert_eq!(row("Pontaria")["trained"], false);

    // Level 5 unlocks both dwarf abilities plus one each from class, origin
    // and deity.
    let abilities = sheet["abilities"].as_array().unwrap();
    assert_eq!(abilities.len(), 5);
    assert!(abilities
        .iter()
        .any(|a| a["name"] == "Duro como Pedra" && a["granted_by"] == "Anão"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sheet_rejects_unknown_layout_and_section(pool: PgPool) {
    let app = common::build_test_app(pool);
    let f = common::seed_fixture(&app).await;
    let id = create_with_grants(&app, &f).await;

    let response = get(app.clone(), &format!("/api/v1/characters/{id}/sheet?layout=triple")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, &format!("/api/v1/characters/{id}/sheet?sections=spells")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sheet_of_someone_elses_character_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let f = common::seed_fixture(&app).await;
    let id = create_with_grants(&app, &f).await;

    let stranger = Caller {
        session: Some("stranger"),
        address: None,
    };
    let response = common::get_as(app, &format!("/api/v1/characters/{id}/sheet"), stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

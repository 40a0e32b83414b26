//! HTTP-level integration tests for the catalog API: entity CRUD,
//! per-field validation errors, delete guards, and the stock ledger as
//! observed through the public surface.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_family(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/families",
        json!({ "name": name, "info": "A family." }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_skill(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/skills",
        json!({ "name": name, "info": "A skill.", "magic_cost": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a family, three skills, and a monster; returns (monster_id, skill_ids).
async fn create_monster(pool: &PgPool, name: &str) -> (i64, Vec<i64>) {
    let family_id = create_family(pool, "Slime").await;
    let mut skill_ids = Vec::new();
    for skill_name in ["Fireball", "Heal", "Sizz"] {
        skill_ids.push(create_skill(pool, skill_name).await);
    }

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/monsters",
        json!({
            "name": name,
            "family_id": family_id,
            "info": "A monster.",
            "innate_skills": skill_ids,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let monster_id = body_json(response).await["id"].as_i64().unwrap();
    (monster_id, skill_ids)
}

fn instance_payload(monster_id: i64) -> serde_json::Value {
    json!({
        "monster_id": monster_id,
        "nickname": "Goo",
        "level": 5,
        "health": 40,
        "magic": 20,
        "attack": 12,
        "defense": 10,
        "agility": 8,
        "intelligence": 6,
        "gender": "Female",
        "skills": [],
    })
}

async fn monster_stock(pool: &PgPool, monster_id: i64) -> i64 {
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/monsters/{monster_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["stock"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// CRUD basics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_get_family(pool: PgPool) {
    let id = create_family(&pool, "Dragon").await;

    let response = get(common::build_test_app(pool), &format!("/api/v1/families/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Dragon");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_family(pool: PgPool) {
    let id = create_family(&pool, "Dragon").await;

    let response = put_json(
        common::build_test_app(pool),
        &format!("/api/v1/families/{id}"),
        json!({ "name": "Wyrm" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Wyrm");
    assert_eq!(json["info"], "A family.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_nonexistent_monster_returns_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/monsters/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn counts_reflect_inventory(pool: PgPool) {
    let (monster_id, _) = create_monster(&pool, "Slime").await;
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/monster-instances",
        instance_payload(monster_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(common::build_test_app(pool), "/api/v1/counts").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["families"], 1);
    assert_eq!(json["skills"], 3);
    assert_eq!(json["monsters"], 1);
    assert_eq!(json["monster_instances"], 1);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn family_name_too_short_is_rejected_with_field_errors(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/families",
        json!({ "name": "X", "info": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields = json["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["field"], "name");
    assert_eq!(fields[1]["field"], "info");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn monster_with_wrong_innate_skill_count_is_rejected(pool: PgPool) {
    let family_id = create_family(&pool, "Slime").await;
    let s1 = create_skill(&pool, "Fireball").await;
    let s2 = create_skill(&pool, "Heal").await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/monsters",
        json!({
            "name": "Slime",
            "family_id": family_id,
            "info": "A monster.",
            "innate_skills": [s1, s2],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "innate_skills");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn monster_with_duplicate_innate_skills_is_rejected(pool: PgPool) {
    let family_id = create_family(&pool, "Slime").await;
    let s1 = create_skill(&pool, "Fireball").await;
    let s2 = create_skill(&pool, "Heal").await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/monsters",
        json!({
            "name": "Slime",
            "family_id": family_id,
            "info": "A monster.",
            "innate_skills": [s1, s2, s2],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn instance_with_too_many_skills_is_rejected(pool: PgPool) {
    let (monster_id, _) = create_monster(&pool, "Slime").await;

    let mut payload = instance_payload(monster_id);
    // Nine distinct ids; set-size validation fires before any lookup.
    payload["skills"] = json!([1, 2, 3, 4, 5, 6, 7, 8, 9]);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/monster-instances",
        payload,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "skills");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn instance_gender_defaults_to_none(pool: PgPool) {
    let (monster_id, _) = create_monster(&pool, "Slime").await;

    let mut payload = instance_payload(monster_id);
    payload.as_object_mut().unwrap().remove("gender");

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/monster-instances",
        payload,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["gender"], "None");
}

// ---------------------------------------------------------------------------
// Stock ledger through the API
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn stock_follows_instance_lifecycle(pool: PgPool) {
    let (monster_id, _) = create_monster(&pool, "Slime").await;
    assert_eq!(monster_stock(&pool, monster_id).await, 0);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/monster-instances",
        instance_payload(monster_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let instance_id = body_json(response).await["id"].as_i64().unwrap();
    assert_eq!(monster_stock(&pool, monster_id).await, 1);

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/monster-instances/{instance_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(monster_stock(&pool, monster_id).await, 0);
}

// ---------------------------------------------------------------------------
// Delete guards through the API
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_family_with_monster_is_blocked(pool: PgPool) {
    let (monster_id, _) = create_monster(&pool, "Slime").await;
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/monsters/{monster_id}"),
    )
    .await;
    let family_id = body_json(response).await["family_id"].as_i64().unwrap();

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/families/{family_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTEGRITY_BLOCKED");
    assert_eq!(json["blockers"][0], "Slime");

    // The family is still present.
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/families/{family_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deletion_blockers_endpoint_reports_dependents(pool: PgPool) {
    let (monster_id, skill_ids) = create_monster(&pool, "Slime").await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/skills/{}/deletion-blockers", skill_ids[0]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["allowed"], false);
    assert_eq!(json["blockers"][0], "Slime");

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/monsters/{monster_id}/deletion-blockers"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["allowed"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_monster_after_instances_are_gone(pool: PgPool) {
    let (monster_id, _) = create_monster(&pool, "Slime").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/monster-instances",
        instance_payload(monster_id),
    )
    .await;
    let instance_id = body_json(response).await["id"].as_i64().unwrap();

    // Blocked while the instance lives.
    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/monsters/{monster_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/monster-instances/{instance_id}"),
    )
    .await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/monsters/{monster_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/monsters/{monster_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Dependent listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn family_monsters_and_monster_instances_listings(pool: PgPool) {
    let (monster_id, _) = create_monster(&pool, "Slime").await;
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/monsters/{monster_id}"),
    )
    .await;
    let family_id = body_json(response).await["family_id"].as_i64().unwrap();

    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/monster-instances",
        instance_payload(monster_id),
    )
    .await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/families/{family_id}/monsters"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Slime");

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/monsters/{monster_id}/instances"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["nickname"], "Goo");
}

mod common;

use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_user_email_must_be_unique() {
    let app = TestApp::new().await;

    let created = app.post("/admin/users", json!({ "name": "Anna", "email": "anna@example.com" })).await;
    assert_eq!(created.status(), 201);

    let duplicate = app.post("/admin/users", json!({ "name": "Other Anna", "email": "anna@example.com" })).await;
    assert_eq!(duplicate.status(), 409);
}

#[tokio::test]
async fn test_user_payload_validation() {
    let app = TestApp::new().await;

    let blank_name = app.post("/admin/users", json!({ "name": "  ", "email": "x@example.com" })).await;
    assert_eq!(blank_name.status(), 400);

    let bad_email = app.post("/admin/users", json!({ "name": "Anna", "email": "not-an-email" })).await;
    assert_eq!(bad_email.status(), 400);
}

#[tokio::test]
async fn test_user_listing_with_id_filter_and_paging() {
    let app = TestApp::new().await;

    let first = app.seed_user("First", "first@example.com").await;
    let _second = app.seed_user("Second", "second@example.com").await;
    let third = app.seed_user("Third", "third@example.com").await;

    let all = app.get("/admin/users").await;
    assert_eq!(parse_body(all).await.as_array().unwrap().len(), 3);

    let filtered = app.get(&format!("/admin/users?ids={},{}", first, third)).await;
    let users = parse_body(filtered).await;
    let ids: Vec<i64> = users.as_array().unwrap().iter().map(|u| u["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![first, third]);

    let paged = app.get("/admin/users?from=1&size=1").await;
    assert_eq!(parse_body(paged).await.as_array().unwrap().len(), 1);

    let bad_ids = app.get("/admin/users?ids=1,abc").await;
    assert_eq!(bad_ids.status(), 400);
}

#[tokio::test]
async fn test_user_deletion() {
    let app = TestApp::new().await;

    let user = app.seed_user("Gone", "gone@example.com").await;
    let deleted = app.delete(&format!("/admin/users/{}", user)).await;
    assert_eq!(deleted.status(), 204);

    let missing = app.delete(&format!("/admin/users/{}", user)).await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_category_name_must_be_unique() {
    let app = TestApp::new().await;

    let created = app.post("/admin/categories", json!({ "name": "Music" })).await;
    assert_eq!(created.status(), 201);

    let duplicate = app.post("/admin/categories", json!({ "name": "Music" })).await;
    assert_eq!(duplicate.status(), 409);

    let blank = app.post("/admin/categories", json!({ "name": " " })).await;
    assert_eq!(blank.status(), 400);
}

#[tokio::test]
async fn test_category_update_checks_name_collisions() {
    let app = TestApp::new().await;

    let music = app.seed_category("Music").await;
    let _sport = app.seed_category("Sport").await;

    // Renaming onto an existing name conflicts, renaming to itself is a no-op.
    let collision = app.patch(&format!("/admin/categories/{}", music), Some(json!({ "name": "Sport" }))).await;
    assert_eq!(collision.status(), 409);

    let same = app.patch(&format!("/admin/categories/{}", music), Some(json!({ "name": "Music" }))).await;
    assert_eq!(same.status(), 200);

    let renamed = app.patch(&format!("/admin/categories/{}", music), Some(json!({ "name": "Classical" }))).await;
    assert_eq!(renamed.status(), 200);
    assert_eq!(parse_body(renamed).await["name"], "Classical");
}

#[tokio::test]
async fn test_category_with_events_cannot_be_deleted() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Busy").await;
    app.seed_event(owner, category, 5, true).await;

    let blocked = app.delete(&format!("/admin/categories/{}", category)).await;
    assert_eq!(blocked.status(), 409);

    let empty = app.seed_category("Empty").await;
    let deleted = app.delete(&format!("/admin/categories/{}", empty)).await;
    assert_eq!(deleted.status(), 204);
}

#[tokio::test]
async fn test_public_category_reads() {
    let app = TestApp::new().await;

    let music = app.seed_category("Music").await;
    app.seed_category("Sport").await;

    let listed = app.get("/categories?from=0&size=10").await;
    assert_eq!(parse_body(listed).await.as_array().unwrap().len(), 2);

    let fetched = app.get(&format!("/categories/{}", music)).await;
    assert_eq!(fetched.status(), 200);
    assert_eq!(parse_body(fetched).await["name"], "Music");

    let missing = app.get("/categories/9999").await;
    assert_eq!(missing.status(), 404);
}

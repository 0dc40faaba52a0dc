mod common;

use chrono::{Duration, Utc};
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_event_is_created_pending_with_zero_confirmed() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Concerts").await;

    let response = app
        .post(
            &format!("/users/{}/events", owner),
            json!({
                "title": "Opening night",
                "annotation": "Short annotation",
                "description": "Long description",
                "category": category,
                "event_date": (Utc::now() + Duration::hours(5)).to_rfc3339()
            }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let event = parse_body(response).await;

    assert_eq!(event["state"], "PENDING");
    assert_eq!(event["confirmed_requests"].as_i64().unwrap(), 0);
    assert!(event["published_on"].is_null());
    // Omitted fields fall back to their defaults.
    assert_eq!(event["paid"], false);
    assert_eq!(event["participant_limit"].as_i64().unwrap(), 0);
    assert_eq!(event["request_moderation"], true);
}

#[tokio::test]
async fn test_event_creation_requires_two_hour_lead() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Concerts").await;

    let response = app
        .post(
            &format!("/users/{}/events", owner),
            json!({
                "title": "Too soon",
                "annotation": "Short annotation",
                "description": "Long description",
                "category": category,
                "event_date": (Utc::now() + Duration::minutes(90)).to_rfc3339()
            }),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_event_creation_with_missing_references() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Concerts").await;
    let payload = json!({
        "title": "Orphan",
        "annotation": "Short annotation",
        "description": "Long description",
        "category": category,
        "event_date": (Utc::now() + Duration::hours(5)).to_rfc3339()
    });

    let missing_user = app.post("/users/9999/events", payload.clone()).await;
    assert_eq!(missing_user.status(), 404);

    let mut bad_category = payload;
    bad_category["category"] = json!(9999);
    let missing_category = app.post(&format!("/users/{}/events", owner), bad_category).await;
    assert_eq!(missing_category.status(), 404);
}

#[tokio::test]
async fn test_owner_cannot_edit_published_event() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Theatre").await;
    let event = app.seed_event(owner, category, 5, true).await;
    app.publish_event(event).await;

    let response = app
        .patch(
            &format!("/users/{}/events/{}", owner, event),
            Some(json!({ "title": "New title" })),
        )
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_owner_review_cycle() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Cinema").await;
    let event = app.seed_event(owner, category, 5, true).await;

    let canceled = app
        .patch(
            &format!("/users/{}/events/{}", owner, event),
            Some(json!({ "state_action": "CANCEL_REVIEW" })),
        )
        .await;
    assert_eq!(canceled.status(), 200);
    assert_eq!(parse_body(canceled).await["state"], "CANCELED");

    let resubmitted = app
        .patch(
            &format!("/users/{}/events/{}", owner, event),
            Some(json!({ "state_action": "SEND_TO_REVIEW" })),
        )
        .await;
    assert_eq!(resubmitted.status(), 200);
    assert_eq!(parse_body(resubmitted).await["state"], "PENDING");
}

#[tokio::test]
async fn test_empty_patch_returns_event_unchanged() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Cinema").await;
    let event = app.seed_event(owner, category, 5, true).await;

    let before = app.owner_event(owner, event).await;
    let response = app.patch(&format!("/users/{}/events/{}", owner, event), Some(json!({}))).await;
    assert_eq!(response.status(), 200);
    assert_eq!(parse_body(response).await, before);

    // Patching a field to its current value is also a no-op.
    let same_title = app
        .patch(
            &format!("/users/{}/events/{}", owner, event),
            Some(json!({ "title": before["title"] })),
        )
        .await;
    assert_eq!(same_title.status(), 200);
    assert_eq!(parse_body(same_title).await, before);
}

#[tokio::test]
async fn test_owner_patch_validates_event_date() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Cinema").await;
    let event = app.seed_event(owner, category, 5, true).await;

    let response = app
        .patch(
            &format!("/users/{}/events/{}", owner, event),
            Some(json!({ "event_date": (Utc::now() + Duration::minutes(30)).to_rfc3339() })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_owner_patch_is_scoped_to_own_events() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let stranger = app.seed_user("Stranger", "stranger@example.com").await;
    let category = app.seed_category("Cinema").await;
    let event = app.seed_event(owner, category, 5, true).await;

    let response = app
        .patch(
            &format!("/users/{}/events/{}", stranger, event),
            Some(json!({ "title": "Hijacked" })),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_admin_publication_stamps_published_on() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Expo").await;
    let event = app.seed_event(owner, category, 5, true).await;

    let published = app.publish_event(event).await;
    assert_eq!(published["state"], "PUBLISHED");
    assert!(!published["published_on"].is_null());

    // Publication is one-way: a second publish attempt conflicts.
    let again = app
        .patch(&format!("/admin/events/{}", event), Some(json!({ "state_action": "PUBLISH_EVENT" })))
        .await;
    assert_eq!(again.status(), 409);
}

#[tokio::test]
async fn test_admin_publication_requires_one_hour_lead() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Expo").await;
    let event = app.seed_event(owner, category, 5, true).await;

    // Admin patches are not lead-time checked, so the date can be moved close.
    let moved = app
        .patch(
            &format!("/admin/events/{}", event),
            Some(json!({ "event_date": (Utc::now() + Duration::minutes(30)).to_rfc3339() })),
        )
        .await;
    assert_eq!(moved.status(), 200);

    let response = app
        .patch(&format!("/admin/events/{}", event), Some(json!({ "state_action": "PUBLISH_EVENT" })))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_admin_rejection_rules() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Expo").await;

    let pending = app.seed_event(owner, category, 5, true).await;
    let rejected = app
        .patch(&format!("/admin/events/{}", pending), Some(json!({ "state_action": "REJECT_EVENT" })))
        .await;
    assert_eq!(rejected.status(), 200);
    assert_eq!(parse_body(rejected).await["state"], "CANCELED");

    let published = app.seed_event(owner, category, 5, true).await;
    app.publish_event(published).await;
    let response = app
        .patch(&format!("/admin/events/{}", published), Some(json!({ "state_action": "REJECT_EVENT" })))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_unknown_state_actions_are_invalid() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Expo").await;
    let event = app.seed_event(owner, category, 5, true).await;

    let owner_action = app
        .patch(
            &format!("/users/{}/events/{}", owner, event),
            Some(json!({ "state_action": "PUBLISH_EVENT" })),
        )
        .await;
    assert_eq!(owner_action.status(), 400);

    let admin_action = app
        .patch(&format!("/admin/events/{}", event), Some(json!({ "state_action": "DO_THE_THING" })))
        .await;
    assert_eq!(admin_action.status(), 400);
}

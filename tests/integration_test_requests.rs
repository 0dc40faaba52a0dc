mod common;

use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_request_is_confirmed_without_moderation() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let category = app.seed_category("Concerts").await;
    let event = app.seed_event(owner, category, 5, false).await;
    app.publish_event(event).await;

    let response = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    assert_eq!(response.status(), 201);
    let request = parse_body(response).await;
    assert_eq!(request["status"], "CONFIRMED");
    assert_eq!(request["event_id"].as_i64().unwrap(), event);
    assert_eq!(request["requester_id"].as_i64().unwrap(), guest);

    // The immediate-confirm path bumps the event counter in the same call.
    let stored = app.owner_event(owner, event).await;
    assert_eq!(stored["confirmed_requests"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_request_is_confirmed_when_limit_is_zero() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let category = app.seed_category("Lectures").await;
    // Moderation on, but unlimited capacity: confirms on the spot.
    let event = app.seed_event(owner, category, 0, true).await;
    app.publish_event(event).await;

    let response = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    assert_eq!(response.status(), 201);
    assert_eq!(parse_body(response).await["status"], "CONFIRMED");

    let stored = app.owner_event(owner, event).await;
    assert_eq!(stored["confirmed_requests"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_moderated_request_starts_pending() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let category = app.seed_category("Workshops").await;
    let event = app.seed_event(owner, category, 5, true).await;
    app.publish_event(event).await;

    let response = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    assert_eq!(response.status(), 201);
    assert_eq!(parse_body(response).await["status"], "PENDING");

    let stored = app.owner_event(owner, event).await;
    assert_eq!(stored["confirmed_requests"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_request_is_rejected() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let category = app.seed_category("Meetups").await;
    let event = app.seed_event(owner, category, 5, true).await;
    app.publish_event(event).await;

    let first = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    assert_eq!(first.status(), 201);

    let second = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    assert_eq!(second.status(), 409);
}

#[tokio::test]
async fn test_new_request_allowed_after_cancellation() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let category = app.seed_category("Runs").await;
    let event = app.seed_event(owner, category, 5, true).await;
    app.publish_event(event).await;

    let first = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    let request_id = parse_body(first).await["id"].as_i64().unwrap();

    let cancel = app.patch(&format!("/users/{}/requests/{}/cancel", guest, request_id), None).await;
    assert_eq!(cancel.status(), 200);
    assert_eq!(parse_body(cancel).await["status"], "CANCELED");

    // A canceled request no longer blocks a fresh application.
    let again = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    assert_eq!(again.status(), 201);
}

#[tokio::test]
async fn test_initiator_cannot_join_own_event() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Parties").await;
    let event = app.seed_event(owner, category, 5, false).await;
    app.publish_event(event).await;

    let response = app.post(&format!("/users/{}/requests?event_id={}", owner, event), json!({})).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_cannot_join_unpublished_event() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let category = app.seed_category("Theatre").await;
    let event = app.seed_event(owner, category, 5, false).await;

    let response = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_invalid_and_missing_ids() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let category = app.seed_category("Cinema").await;
    let event = app.seed_event(owner, category, 5, false).await;
    app.publish_event(event).await;

    let non_positive_user = app.post(&format!("/users/0/requests?event_id={}", event), json!({})).await;
    assert_eq!(non_positive_user.status(), 400);

    let non_positive_event = app.post(&format!("/users/{}/requests?event_id=-5", owner), json!({})).await;
    assert_eq!(non_positive_event.status(), 400);

    let missing_user = app.post(&format!("/users/9999/requests?event_id={}", event), json!({})).await;
    assert_eq!(missing_user.status(), 404);

    let missing_event = app.post(&format!("/users/{}/requests?event_id=9999", owner), json!({})).await;
    assert_eq!(missing_event.status(), 404);
}

#[tokio::test]
async fn test_capacity_limit_blocks_further_requests() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let first = app.seed_user("First", "first@example.com").await;
    let second = app.seed_user("Second", "second@example.com").await;
    let category = app.seed_category("Sailing").await;
    let event = app.seed_event(owner, category, 1, false).await;
    app.publish_event(event).await;

    let accepted = app.post(&format!("/users/{}/requests?event_id={}", first, event), json!({})).await;
    assert_eq!(accepted.status(), 201);

    let refused = app.post(&format!("/users/{}/requests?event_id={}", second, event), json!({})).await;
    assert_eq!(refused.status(), 409);

    let stored = app.owner_event(owner, event).await;
    assert_eq!(stored["confirmed_requests"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_cancellation_corrects_counter_exactly_once() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let category = app.seed_category("Climbing").await;
    let event = app.seed_event(owner, category, 2, false).await;
    app.publish_event(event).await;

    let created = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    let request_id = parse_body(created).await["id"].as_i64().unwrap();
    assert_eq!(app.owner_event(owner, event).await["confirmed_requests"].as_i64().unwrap(), 1);

    let cancel = app.patch(&format!("/users/{}/requests/{}/cancel", guest, request_id), None).await;
    assert_eq!(cancel.status(), 200);
    assert_eq!(app.owner_event(owner, event).await["confirmed_requests"].as_i64().unwrap(), 0);

    // Canceling again overwrites the status but must not touch the counter.
    let cancel_again = app.patch(&format!("/users/{}/requests/{}/cancel", guest, request_id), None).await;
    assert_eq!(cancel_again.status(), 200);
    assert_eq!(app.owner_event(owner, event).await["confirmed_requests"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_cancel_requires_ownership() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let other = app.seed_user("Other", "other@example.com").await;
    let category = app.seed_category("Chess").await;
    let event = app.seed_event(owner, category, 5, true).await;
    app.publish_event(event).await;

    let created = app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;
    let request_id = parse_body(created).await["id"].as_i64().unwrap();

    let response = app.patch(&format!("/users/{}/requests/{}/cancel", other, request_id), None).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_list_requests_for_requester_and_owner() {
    let app = TestApp::new().await;

    let owner = app.seed_user("Owner", "owner@example.com").await;
    let guest = app.seed_user("Guest", "guest@example.com").await;
    let stranger = app.seed_user("Stranger", "stranger@example.com").await;
    let category = app.seed_category("Dance").await;
    let event = app.seed_event(owner, category, 5, true).await;
    app.publish_event(event).await;

    app.post(&format!("/users/{}/requests?event_id={}", guest, event), json!({})).await;

    let own = app.get(&format!("/users/{}/requests", guest)).await;
    assert_eq!(own.status(), 200);
    assert_eq!(parse_body(own).await.as_array().unwrap().len(), 1);

    let for_owner = app.get(&format!("/users/{}/events/{}/requests", owner, event)).await;
    assert_eq!(for_owner.status(), 200);
    assert_eq!(parse_body(for_owner).await.as_array().unwrap().len(), 1);

    // The owner-scoped listing is invisible to everyone else.
    let for_stranger = app.get(&format!("/users/{}/events/{}/requests", stranger, event)).await;
    assert_eq!(for_stranger.status(), 404);
}

use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{category, comment, compilation, event, health, request, user};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Admin: users
        .route("/admin/users", get(user::list_users).post(user::create_user))
        .route("/admin/users/{user_id}", delete(user::delete_user))

        // Admin: categories
        .route("/admin/categories", post(category::create_category))
        .route("/admin/categories/{cat_id}", patch(category::update_category).delete(category::delete_category))

        // Public: categories
        .route("/categories", get(category::list_categories))
        .route("/categories/{cat_id}", get(category::get_category))

        // Admin: events
        .route("/admin/events", get(event::search_admin_events))
        .route("/admin/events/{event_id}", patch(event::update_admin_event))

        // Private: events
        .route("/users/{user_id}/events", get(event::get_user_events).post(event::create_event))
        .route("/users/{user_id}/events/{event_id}", get(event::get_user_event).patch(event::update_user_event))

        // Private: participation requests
        .route("/users/{user_id}/events/{event_id}/requests",
            get(request::get_event_participants).patch(request::update_request_statuses))
        .route("/users/{user_id}/requests", get(request::get_user_requests).post(request::create_request))
        .route("/users/{user_id}/requests/{request_id}/cancel", patch(request::cancel_request))

        // Public: events
        .route("/events", get(event::search_public_events))
        .route("/events/{event_id}", get(event::get_public_event))

        // Admin: compilations
        .route("/admin/compilations", post(compilation::create_compilation))
        .route("/admin/compilations/{comp_id}",
            patch(compilation::update_compilation).delete(compilation::delete_compilation))

        // Public: compilations
        .route("/compilations", get(compilation::list_compilations))
        .route("/compilations/{comp_id}", get(compilation::get_compilation))

        // Comments
        .route("/events/{event_id}/comments", get(comment::get_event_comments))
        .route("/users/{user_id}/comments", get(comment::get_user_comments))
        .route("/users/{user_id}/events/{event_id}/comments", post(comment::create_comment))
        .route("/users/{user_id}/comments/{comment_id}",
            get(comment::get_user_comment).patch(comment::update_user_comment).delete(comment::delete_user_comment))
        .route("/admin/comments", get(comment::search_admin_comments))
        .route("/admin/comments/{comment_id}",
            patch(comment::moderate_comment).delete(comment::delete_admin_comment))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}

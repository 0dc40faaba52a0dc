use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateRequestParams, RequestStatusUpdateRequest};
use crate::domain::models::event::EventState;
use crate::domain::models::request::RequestStatus;
use crate::domain::services::admission;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn get_user_requests(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.user_repo.find_by_id(user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let requests = state.request_repo.list_by_requester(user_id).await?;
    Ok(Json(requests))
}

pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<CreateRequestParams>,
) -> Result<impl IntoResponse, AppError> {
    if user_id < 1 {
        return Err(AppError::Validation("User id must be positive".into()));
    }
    if params.event_id < 1 {
        return Err(AppError::Validation("Event id must be positive".into()));
    }

    state.user_repo.find_by_id(user_id).await?
        .ok_or(AppError::NotFound(format!("User with id={} not found", user_id)))?;

    let event = state.event_repo.find_by_id(params.event_id).await?
        .ok_or(AppError::NotFound(format!("Event with id={} not found", params.event_id)))?;

    if state.request_repo.find_active_by_requester_and_event(user_id, event.id).await?.is_some() {
        return Err(AppError::Conflict("Request already exists".into()));
    }

    if event.initiator_id == user_id {
        return Err(AppError::Conflict("An initiator cannot request participation in their own event".into()));
    }

    if event.state != EventState::Published {
        return Err(AppError::Conflict("Cannot participate in an unpublished event".into()));
    }

    if event.participant_limit > 0 {
        let confirmed = state.request_repo
            .count_by_event_and_status(event.id, RequestStatus::Confirmed)
            .await?;
        if confirmed >= event.participant_limit as i64 {
            return Err(AppError::Conflict("The participant limit has been reached".into()));
        }
    }

    let status = admission::initial_status(event.request_moderation, event.participant_limit);
    let created = state.request_repo.create(event.id, user_id, status).await?;

    info!("Created participation request {} for event {} (status {:?})", created.id, event.id, created.status);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn cancel_request(
    State(state): State<Arc<AppState>>,
    Path((user_id, request_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.request_repo.find_by_id(request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    if request.requester_id != user_id {
        return Err(AppError::NotFound("Request not found for this user".into()));
    }

    let canceled = state.request_repo.cancel(request_id).await?;
    info!("Canceled participation request {}", canceled.id);
    Ok(Json(canceled))
}

pub async fn get_event_participants(
    State(state): State<Arc<AppState>>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.initiator_id != user_id {
        return Err(AppError::NotFound("User is not the initiator of this event".into()));
    }

    let requests = state.request_repo.list_by_event(event_id).await?;
    Ok(Json(requests))
}

pub async fn update_request_statuses(
    State(state): State<Arc<AppState>>,
    Path((user_id, event_id)): Path<(i64, i64)>,
    Json(payload): Json<RequestStatusUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.initiator_id != user_id {
        return Err(AppError::NotFound("User is not the initiator of this event".into()));
    }

    let target = match payload.status.as_str() {
        "CONFIRMED" => RequestStatus::Confirmed,
        "REJECTED" => RequestStatus::Rejected,
        other => {
            return Err(AppError::Validation(format!(
                "Unknown target status: {}. Allowed values: CONFIRMED, REJECTED", other
            )));
        }
    };

    let result = state.request_repo.update_statuses(event_id, &payload.request_ids, target).await?;

    info!(
        "Moderated {} request(s) for event {}: {} confirmed, {} rejected",
        payload.request_ids.len(), event_id,
        result.confirmed_requests.len(), result.rejected_requests.len()
    );
    Ok(Json(result))
}

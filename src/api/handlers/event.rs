use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::{
    parse_csv_ids, AdminEventsQuery, NewEventRequest, Pagination, PublicEventsQuery, UpdateEventRequest,
};
use crate::api::dtos::responses::EventWithViews;
use crate::domain::models::event::{AdminEventFilter, Event, EventState, NewEvent, PublicEventFilter};
use crate::error::AppError;
use crate::state::AppState;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn has_changes(event: &Event, patch: &UpdateEventRequest) -> bool {
    patch.title.as_ref().is_some_and(|v| *v != event.title)
        || patch.annotation.as_ref().is_some_and(|v| *v != event.annotation)
        || patch.description.as_ref().is_some_and(|v| *v != event.description)
        || patch.category.is_some_and(|v| v != event.category_id)
        || patch.event_date.is_some_and(|v| v != event.event_date)
        || patch.paid.is_some_and(|v| v != event.paid)
        || patch.participant_limit.is_some_and(|v| v != event.participant_limit)
        || patch.request_moderation.is_some_and(|v| v != event.request_moderation)
        || patch.state_action.is_some()
}

async fn apply_patch(
    state: &AppState,
    event: &mut Event,
    patch: &UpdateEventRequest,
) -> Result<(), AppError> {
    if let Some(category) = patch.category {
        state.category_repo.find_by_id(category).await?
            .ok_or(AppError::NotFound("Category not found".into()))?;
        event.category_id = category;
    }
    if let Some(title) = &patch.title {
        event.title = title.clone();
    }
    if let Some(annotation) = &patch.annotation {
        event.annotation = annotation.clone();
    }
    if let Some(description) = &patch.description {
        event.description = description.clone();
    }
    if let Some(event_date) = patch.event_date {
        event.event_date = event_date;
    }
    if let Some(paid) = patch.paid {
        event.paid = paid;
    }
    if let Some(participant_limit) = patch.participant_limit {
        if participant_limit < 0 {
            return Err(AppError::Validation("Participant limit cannot be negative".into()));
        }
        event.participant_limit = participant_limit;
    }
    if let Some(request_moderation) = patch.request_moderation {
        event.request_moderation = request_moderation;
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(payload): Json<NewEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.user_repo.find_by_id(user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    state.category_repo.find_by_id(payload.category).await?
        .ok_or(AppError::NotFound("Category not found".into()))?;

    if payload.event_date < Utc::now() + Duration::hours(2) {
        return Err(AppError::Validation("Event date must be at least two hours from now".into()));
    }

    let participant_limit = payload.participant_limit.unwrap_or(0);
    if participant_limit < 0 {
        return Err(AppError::Validation("Participant limit cannot be negative".into()));
    }

    let event = NewEvent {
        title: payload.title,
        annotation: payload.annotation,
        description: payload.description,
        category_id: payload.category,
        initiator_id: user_id,
        event_date: payload.event_date,
        paid: payload.paid.unwrap_or(false),
        participant_limit,
        request_moderation: payload.request_moderation.unwrap_or(true),
    };

    let created = state.event_repo.create(&event).await?;
    info!("Created event {} by user {}", created.id, user_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_user_events(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    state.user_repo.find_by_id(user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let events = state.event_repo.list_by_initiator(user_id, page.from, page.size).await?;
    Ok(Json(events))
}

pub async fn get_user_event(
    State(state): State<Arc<AppState>>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id_and_initiator(event_id, user_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    Ok(Json(event))
}

pub async fn update_user_event(
    State(state): State<Arc<AppState>>,
    Path((user_id, event_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id_and_initiator(event_id, user_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.state == EventState::Published {
        return Err(AppError::Conflict("Only pending or canceled events can be changed".into()));
    }

    // An empty patch is answered from the loaded row without a write.
    if !has_changes(&event, &payload) {
        return Ok(Json(event));
    }

    if let Some(event_date) = payload.event_date {
        if event_date < Utc::now() + Duration::hours(2) {
            return Err(AppError::Validation("Event date must be at least two hours from now".into()));
        }
    }

    apply_patch(&state, &mut event, &payload).await?;

    if let Some(action) = payload.state_action.as_deref() {
        match action {
            "SEND_TO_REVIEW" => event.state = EventState::Pending,
            "CANCEL_REVIEW" => event.state = EventState::Canceled,
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown state action: {}. Allowed values: SEND_TO_REVIEW, CANCEL_REVIEW", other
                )));
            }
        }
    }

    let updated = state.event_repo.update(&event).await?;
    info!("Updated event {} by its initiator", updated.id);
    Ok(Json(updated))
}

pub async fn search_admin_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let states = match query.states.as_deref() {
        Some(raw) => Some(
            raw.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| part.parse::<EventState>().map_err(AppError::Validation))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };

    let filter = AdminEventFilter {
        users: query.users.as_deref().map(parse_csv_ids).transpose()?,
        states,
        categories: query.categories.as_deref().map(parse_csv_ids).transpose()?,
        range_start: query.range_start,
        range_end: query.range_end,
        from: query.from,
        size: query.size,
    };

    let events = state.event_repo.search_admin(&filter).await?;
    Ok(Json(events))
}

pub async fn update_admin_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if let Some(action) = payload.state_action.as_deref() {
        match action {
            "PUBLISH_EVENT" => {
                if event.state != EventState::Pending {
                    return Err(AppError::Conflict("Only pending events can be published".into()));
                }
                if event.event_date < Utc::now() + Duration::hours(1) {
                    return Err(AppError::Conflict("Event date must be at least one hour after publication".into()));
                }
                event.state = EventState::Published;
                event.published_on = Some(Utc::now());
            }
            "REJECT_EVENT" => {
                if event.state == EventState::Published {
                    return Err(AppError::Conflict("Published events cannot be rejected".into()));
                }
                event.state = EventState::Canceled;
            }
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown state action: {}. Allowed values: PUBLISH_EVENT, REJECT_EVENT", other
                )));
            }
        }
    }

    apply_patch(&state, &mut event, &payload).await?;

    let updated = state.event_repo.update(&event).await?;
    info!("Updated event {} by admin", updated.id);
    Ok(Json(updated))
}

pub async fn search_public_events(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(query): Query<PublicEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    if let (Some(start), Some(end)) = (query.range_start, query.range_end) {
        if start >= end {
            return Err(AppError::Validation("range_start must be before range_end".into()));
        }
    }

    state.stats.record_hit(uri.path(), &client_ip(&headers)).await;

    let mut filter = PublicEventFilter {
        text: query.text,
        categories: query.categories.as_deref().map(parse_csv_ids).transpose()?,
        paid: query.paid,
        range_start: query.range_start,
        range_end: query.range_end,
        only_available: query.only_available,
        sort: query.sort,
        from: query.from,
        size: query.size,
    };

    // Without an explicit window, show upcoming events only.
    if filter.range_start.is_none() && filter.range_end.is_none() {
        filter.range_start = Some(Utc::now());
    }

    let events = state.event_repo.search_public(&filter).await?;

    let mut result = Vec::with_capacity(events.len());
    for event in events {
        let views = state.stats.views_for_event(event.id).await;
        result.push(EventWithViews { event, views });
    }

    Ok(Json(result))
}

pub async fn get_public_event(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.stats.record_hit(uri.path(), &client_ip(&headers)).await;

    let event = state.event_repo.find_published(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let views = state.stats.views_for_event(event.id).await;
    Ok(Json(EventWithViews { event, views }))
}

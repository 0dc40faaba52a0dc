use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{
    parse_csv_ids, AdminCommentsQuery, ModerateCommentParams, NewCommentRequest, Pagination, UpdateCommentRequest,
};
use crate::domain::models::comment::CommentStatus;
use crate::domain::models::event::EventState;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn get_event_comments(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.state != EventState::Published {
        return Err(AppError::NotFound("Event is not published".into()));
    }

    let comments = state.comment_repo
        .list_by_event_and_status(event_id, CommentStatus::Approved, page.from, page.size)
        .await?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path((user_id, event_id)): Path<(i64, i64)>,
    Json(payload): Json<NewCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.text.trim().is_empty() {
        return Err(AppError::Validation("Comment text must not be blank".into()));
    }

    state.user_repo.find_by_id(user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let event = state.event_repo.find_by_id(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.state != EventState::Published {
        return Err(AppError::Conflict("Cannot comment on an unpublished event".into()));
    }

    if state.comment_repo.exists_by_author_and_event(user_id, event_id).await? {
        return Err(AppError::Conflict("The user has already commented on this event".into()));
    }

    let created = state.comment_repo.create(&payload.text, user_id, event_id).await?;
    info!("Created comment {} on event {}", created.id, event_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_user_comments(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    state.user_repo.find_by_id(user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let comments = state.comment_repo.list_by_author(user_id, page.from, page.size).await?;
    Ok(Json(comments))
}

pub async fn get_user_comment(
    State(state): State<Arc<AppState>>,
    Path((user_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state.comment_repo.find_by_id_and_author(comment_id, user_id).await?
        .ok_or(AppError::NotFound("Comment not found".into()))?;
    Ok(Json(comment))
}

pub async fn update_user_comment(
    State(state): State<Arc<AppState>>,
    Path((user_id, comment_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.text.trim().is_empty() {
        return Err(AppError::Validation("Comment text must not be blank".into()));
    }

    let comment = state.comment_repo.find_by_id_and_author(comment_id, user_id).await?
        .ok_or(AppError::NotFound("Comment not found".into()))?;

    if comment.status != CommentStatus::Pending {
        return Err(AppError::Conflict("Only comments with status PENDING can be edited".into()));
    }

    let updated = state.comment_repo.update_text(comment_id, &payload.text).await?;
    Ok(Json(updated))
}

pub async fn delete_user_comment(
    State(state): State<Arc<AppState>>,
    Path((user_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    state.comment_repo.find_by_id_and_author(comment_id, user_id).await?
        .ok_or(AppError::NotFound("Comment not found".into()))?;

    state.comment_repo.delete(comment_id).await?;
    info!("Deleted comment {} by its author", comment_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_admin_comments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminCommentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let event_ids = query.event_ids.as_deref().map(parse_csv_ids).transpose()?;

    let statuses = match query.statuses.as_deref() {
        Some(raw) => Some(
            raw.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| part.parse::<CommentStatus>().map_err(AppError::Validation))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };

    let comments = state.comment_repo
        .search_admin(event_ids.as_deref(), statuses.as_deref(), query.from, query.size)
        .await?;
    Ok(Json(comments))
}

pub async fn moderate_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i64>,
    Query(params): Query<ModerateCommentParams>,
) -> Result<impl IntoResponse, AppError> {
    let status = params.status.parse::<CommentStatus>().map_err(AppError::Validation)?;

    let comment = state.comment_repo.find_by_id(comment_id).await?
        .ok_or(AppError::NotFound("Comment not found".into()))?;

    if comment.status != CommentStatus::Pending {
        return Err(AppError::Conflict("Only comments with status PENDING can be moderated".into()));
    }

    let updated = state.comment_repo.update_status(comment_id, status).await?;
    info!("Moderated comment {} to {:?}", comment_id, updated.status);
    Ok(Json(updated))
}

pub async fn delete_admin_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.comment_repo.delete(comment_id).await?;
    info!("Deleted comment {} by admin", comment_id);
    Ok(StatusCode::NO_CONTENT)
}

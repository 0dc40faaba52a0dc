use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{parse_csv_ids, AdminUsersQuery, NewUserRequest};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be blank".into()));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::Validation("Email must be a valid address".into()));
    }

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("A user with this email already exists".into()));
    }

    let created = state.user_repo.create(&payload.name, &payload.email).await?;
    info!("Created user {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ids = query.ids.as_deref().map(parse_csv_ids).transpose()?;
    let users = state.user_repo.list(ids.as_deref(), query.from, query.size).await?;
    Ok(Json(users))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.user_repo.delete(user_id).await?;
    info!("Deleted user {}", user_id);
    Ok(StatusCode::NO_CONTENT)
}

use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{NewCategoryRequest, Pagination, UpdateCategoryRequest};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Category name must not be blank".into()));
    }

    if state.category_repo.find_by_name(&payload.name).await?.is_some() {
        return Err(AppError::Conflict("A category with this name already exists".into()));
    }

    let created = state.category_repo.create(&payload.name).await?;
    info!("Created category {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(cat_id): Path<i64>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut category = state.category_repo.find_by_id(cat_id).await?
        .ok_or(AppError::NotFound(format!("Category with id={} not found", cat_id)))?;

    let Some(name) = payload.name else {
        return Ok(Json(category));
    };

    if name == category.name {
        return Ok(Json(category));
    }

    if let Some(existing) = state.category_repo.find_by_name(&name).await? {
        if existing.id != cat_id {
            return Err(AppError::Conflict("A category with this name already exists".into()));
        }
    }

    category.name = name;
    let updated = state.category_repo.update(&category).await?;
    Ok(Json(updated))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(cat_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.category_repo.find_by_id(cat_id).await?
        .ok_or(AppError::NotFound(format!("Category with id={} not found", cat_id)))?;

    if state.event_repo.exists_with_category(cat_id).await? {
        return Err(AppError::Conflict("The category is not empty".into()));
    }

    state.category_repo.delete(cat_id).await?;
    info!("Deleted category {}", cat_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.category_repo.list(page.from, page.size).await?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(cat_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.category_repo.find_by_id(cat_id).await?
        .ok_or(AppError::NotFound(format!("Category with id={} not found", cat_id)))?;
    Ok(Json(category))
}

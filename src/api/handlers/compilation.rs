use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{CompilationsQuery, NewCompilationRequest, UpdateCompilationRequest};
use crate::domain::models::compilation::{Compilation, CompilationWithEvents};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

async fn with_events(state: &AppState, compilation: Compilation) -> Result<CompilationWithEvents, AppError> {
    let event_ids = state.compilation_repo.event_ids(compilation.id).await?;
    let events = state.event_repo.find_by_ids(&event_ids).await?;
    Ok(CompilationWithEvents {
        id: compilation.id,
        title: compilation.title,
        pinned: compilation.pinned,
        events,
    })
}

pub async fn create_compilation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCompilationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Compilation title must not be blank".into()));
    }

    // Unknown event ids are dropped rather than rejected; the compilation
    // keeps whatever actually resolves.
    let events = match payload.events.as_deref() {
        Some(ids) => state.event_repo.find_by_ids(ids).await?,
        None => Vec::new(),
    };
    let event_ids: Vec<i64> = events.iter().map(|e| e.id).collect();

    let created = state.compilation_repo
        .create(&payload.title, payload.pinned.unwrap_or(false), &event_ids)
        .await?;
    info!("Created compilation {}", created.id);

    let body = with_events(&state, created).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_compilation(
    State(state): State<Arc<AppState>>,
    Path(comp_id): Path<i64>,
    Json(payload): Json<UpdateCompilationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut compilation = state.compilation_repo.find_by_id(comp_id).await?
        .ok_or(AppError::NotFound(format!("Compilation with id={} not found", comp_id)))?;

    if let Some(title) = payload.title {
        compilation.title = title;
    }
    if let Some(pinned) = payload.pinned {
        compilation.pinned = pinned;
    }

    let event_ids = match payload.events.as_deref() {
        Some(ids) => {
            let events = state.event_repo.find_by_ids(ids).await?;
            Some(events.iter().map(|e| e.id).collect::<Vec<i64>>())
        }
        None => None,
    };

    let updated = state.compilation_repo.update(&compilation, event_ids.as_deref()).await?;
    let body = with_events(&state, updated).await?;
    Ok(Json(body))
}

pub async fn delete_compilation(
    State(state): State<Arc<AppState>>,
    Path(comp_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.compilation_repo.delete(comp_id).await?;
    info!("Deleted compilation {}", comp_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_compilations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompilationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let compilations = state.compilation_repo.list(query.pinned, query.from, query.size).await?;

    let mut result = Vec::with_capacity(compilations.len());
    for compilation in compilations {
        result.push(with_events(&state, compilation).await?);
    }
    Ok(Json(result))
}

pub async fn get_compilation(
    State(state): State<Arc<AppState>>,
    Path(comp_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let compilation = state.compilation_repo.find_by_id(comp_id).await?
        .ok_or(AppError::NotFound(format!("Compilation with id={} not found", comp_id)))?;
    let body = with_events(&state, compilation).await?;
    Ok(Json(body))
}

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

fn default_page_size() -> i64 {
    10
}

#[derive(Deserialize)]
pub struct NewUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct NewEventRequest {
    pub title: String,
    pub annotation: String,
    pub description: String,
    pub category: i64,
    pub event_date: DateTime<Utc>,
    pub paid: Option<bool>,
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
}

/// Patch payload shared by the owner and admin update endpoints; absent
/// fields are left untouched. The two handlers interpret `state_action`
/// against their own action vocabulary.
#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub annotation: Option<String>,
    pub description: Option<String>,
    pub category: Option<i64>,
    pub event_date: Option<DateTime<Utc>>,
    pub paid: Option<bool>,
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
    pub state_action: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRequestParams {
    pub event_id: i64,
}

#[derive(Deserialize)]
pub struct RequestStatusUpdateRequest {
    pub request_ids: Vec<i64>,
    pub status: String,
}

#[derive(Deserialize)]
pub struct NewCompilationRequest {
    pub title: String,
    pub pinned: Option<bool>,
    pub events: Option<Vec<i64>>,
}

#[derive(Deserialize)]
pub struct UpdateCompilationRequest {
    pub title: Option<String>,
    pub pinned: Option<bool>,
    pub events: Option<Vec<i64>>,
}

#[derive(Deserialize)]
pub struct NewCommentRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

#[derive(Deserialize)]
pub struct AdminUsersQuery {
    pub ids: Option<String>,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

#[derive(Deserialize)]
pub struct AdminEventsQuery {
    pub users: Option<String>,
    pub states: Option<String>,
    pub categories: Option<String>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

#[derive(Deserialize)]
pub struct PublicEventsQuery {
    pub text: Option<String>,
    pub categories: Option<String>,
    pub paid: Option<bool>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub only_available: bool,
    pub sort: Option<String>,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

#[derive(Deserialize)]
pub struct CompilationsQuery {
    pub pinned: Option<bool>,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

#[derive(Deserialize)]
pub struct AdminCommentsQuery {
    pub event_ids: Option<String>,
    pub statuses: Option<String>,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

#[derive(Deserialize)]
pub struct ModerateCommentParams {
    pub status: String,
}

/// Parses a comma-separated id list, as passed by the admin and public
/// filter endpoints (`?ids=1,2,3`).
pub fn parse_csv_ids(raw: &str) -> Result<Vec<i64>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| AppError::Validation(format!("Invalid id in list: {}", part)))
        })
        .collect()
}

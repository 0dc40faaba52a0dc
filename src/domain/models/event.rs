use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    Pending,
    Published,
    Canceled,
}

impl FromStr for EventState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(EventState::Pending),
            "PUBLISHED" => Ok(EventState::Published),
            "CANCELED" => Ok(EventState::Canceled),
            _ => Err(format!("Unknown event state: {}. Allowed values: PENDING, PUBLISHED, CANCELED", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub annotation: String,
    pub description: String,
    pub category_id: i64,
    pub initiator_id: i64,
    pub event_date: DateTime<Utc>,
    pub paid: bool,
    pub participant_limit: i32,
    pub request_moderation: bool,
    pub state: EventState,
    pub confirmed_requests: i64,
    pub published_on: Option<DateTime<Utc>>,
    pub created_on: DateTime<Utc>,
}

pub struct NewEvent {
    pub title: String,
    pub annotation: String,
    pub description: String,
    pub category_id: i64,
    pub initiator_id: i64,
    pub event_date: DateTime<Utc>,
    pub paid: bool,
    pub participant_limit: i32,
    pub request_moderation: bool,
}

/// Filter set for the admin event listing. Empty option = no constraint.
#[derive(Debug, Default)]
pub struct AdminEventFilter {
    pub users: Option<Vec<i64>>,
    pub states: Option<Vec<EventState>>,
    pub categories: Option<Vec<i64>>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    pub from: i64,
    pub size: i64,
}

/// Filter set for the public event listing. Only PUBLISHED events are visible
/// regardless of the filters.
#[derive(Debug, Default)]
pub struct PublicEventFilter {
    pub text: Option<String>,
    pub categories: Option<Vec<i64>>,
    pub paid: Option<bool>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    pub only_available: bool,
    pub sort: Option<String>,
    pub from: i64,
    pub size: i64,
}

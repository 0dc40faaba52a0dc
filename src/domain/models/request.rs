use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Rejected,
    Canceled,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ParticipationRequest {
    pub id: i64,
    pub event_id: i64,
    pub requester_id: i64,
    pub status: RequestStatus,
    pub created: DateTime<Utc>,
}

/// Outcome of a bulk moderation call, partitioned by what happened to each
/// request. Serialized as-is in the moderation response.
#[derive(Debug, Serialize, Default)]
pub struct RequestStatusUpdateResult {
    pub confirmed_requests: Vec<ParticipationRequest>,
    pub rejected_requests: Vec<ParticipationRequest>,
}

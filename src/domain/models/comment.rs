use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
}

impl FromStr for CommentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(CommentStatus::Pending),
            "APPROVED" => Ok(CommentStatus::Approved),
            "REJECTED" => Ok(CommentStatus::Rejected),
            _ => Err(format!("Unknown comment status: {}. Allowed values: PENDING, APPROVED, REJECTED", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub event_id: i64,
    pub status: CommentStatus,
    pub created_on: DateTime<Utc>,
}

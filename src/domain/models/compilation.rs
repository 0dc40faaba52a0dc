use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::models::event::Event;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Compilation {
    pub id: i64,
    pub title: String,
    pub pinned: bool,
}

/// A compilation together with its resolved member events, as returned by
/// every compilation endpoint.
#[derive(Debug, Serialize)]
pub struct CompilationWithEvents {
    pub id: i64,
    pub title: String,
    pub pinned: bool,
    pub events: Vec<Event>,
}

use serde::Serialize;

use crate::domain::models::event::Event;

/// Public event representation: the stored row plus the view count fetched
/// from the stats collector.
#[derive(Serialize)]
pub struct EventWithViews {
    #[serde(flatten)]
    pub event: Event,
    pub views: i64,
}

use crate::domain::ports::{EndpointHit, StatsClient};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::warn;

/// Best-effort facade over the stats collector. The collector is a separate
/// service; its failures are logged and swallowed so event reads never
/// depend on it.
pub struct StatsService {
    client: Arc<dyn StatsClient>,
    app_name: String,
}

impl StatsService {
    pub fn new(client: Arc<dyn StatsClient>, app_name: String) -> Self {
        Self { client, app_name }
    }

    pub async fn record_hit(&self, uri: &str, ip: &str) {
        let hit = EndpointHit {
            app: self.app_name.clone(),
            uri: uri.to_string(),
            ip: ip.to_string(),
            timestamp: Utc::now(),
        };

        if let Err(e) = self.client.save_hit(&hit).await {
            warn!("Failed to record hit for {}: {:?}", uri, e);
        }
    }

    /// Unique views of `/events/{id}` over the trailing year; 0 when the
    /// collector is unreachable or has no data.
    pub async fn views_for_event(&self, event_id: i64) -> i64 {
        let end = Utc::now();
        let start = end - Duration::days(365);
        let uris = vec![format!("/events/{}", event_id)];

        match self.client.get_stats(start, end, &uris, true).await {
            Ok(stats) => stats.first().map(|s| s.hits).unwrap_or(0),
            Err(e) => {
                warn!("Failed to fetch views for event {}: {:?}", event_id, e);
                0
            }
        }
    }
}

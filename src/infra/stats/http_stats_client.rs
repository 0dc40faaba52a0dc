use crate::domain::ports::{EndpointHit, StatsClient, ViewStats};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::error;

pub struct HttpStatsClient {
    client: Client,
    base_url: String,
}

impl HttpStatsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl StatsClient for HttpStatsClient {
    async fn save_hit(&self, hit: &EndpointHit) -> Result<(), AppError> {
        let url = format!("{}/hit", self.base_url);

        let res = self.client.post(&url)
            .json(hit)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Stats service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Stats service rejected hit. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }

    async fn get_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        uris: &[String],
        unique: bool,
    ) -> Result<Vec<ViewStats>, AppError> {
        let url = format!("{}/stats", self.base_url);

        let mut query = vec![
            ("start".to_string(), start.to_rfc3339()),
            ("end".to_string(), end.to_rfc3339()),
            ("unique".to_string(), unique.to_string()),
        ];
        if !uris.is_empty() {
            query.push(("uris".to_string(), uris.join(",")));
        }

        let res = self.client.get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Stats service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Stats service query failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        res.json::<Vec<ViewStats>>()
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid stats response: {}", e)))
    }
}

use events_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{EndpointHit, StatsClient, ViewStats},
    domain::services::stats::StatsService,
    error::AppError,
    infra::repositories::{
        sqlite_category_repo::SqliteCategoryRepo,
        sqlite_comment_repo::SqliteCommentRepo,
        sqlite_compilation_repo::SqliteCompilationRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_request_repo::SqliteRequestRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct MockStatsClient;

#[async_trait]
impl StatsClient for MockStatsClient {
    async fn save_hit(&self, _hit: &EndpointHit) -> Result<(), AppError> {
        Ok(())
    }

    async fn get_stats(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _uris: &[String],
        _unique: bool,
    ) -> Result<Vec<ViewStats>, AppError> {
        Ok(Vec::new())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            stats_service_url: "http://localhost".to_string(),
            app_name: "events-backend-test".to_string(),
        };

        let stats = Arc::new(StatsService::new(Arc::new(MockStatsClient), config.app_name.clone()));

        let state = Arc::new(AppState {
            config,
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            category_repo: Arc::new(SqliteCategoryRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            request_repo: Arc::new(SqliteRequestRepo::new(pool.clone())),
            compilation_repo: Arc::new(SqliteCompilationRepo::new(pool.clone())),
            comment_repo: Arc::new(SqliteCommentRepo::new(pool.clone())),
            stats,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response<Body> {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Option<Value>) -> Response<Body> {
        self.request("PATCH", uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.request("DELETE", uri, None).await
    }

    /// Seeds a user and returns its id.
    pub async fn seed_user(&self, name: &str, email: &str) -> i64 {
        let response = self.post("/admin/users", json!({ "name": name, "email": email })).await;
        assert_eq!(response.status(), 201, "seed_user failed");
        parse_body(response).await["id"].as_i64().unwrap()
    }

    /// Seeds a category and returns its id.
    pub async fn seed_category(&self, name: &str) -> i64 {
        let response = self.post("/admin/categories", json!({ "name": name })).await;
        assert_eq!(response.status(), 201, "seed_category failed");
        parse_body(response).await["id"].as_i64().unwrap()
    }

    /// Seeds a pending event three hours out and returns its id.
    pub async fn seed_event(&self, user_id: i64, category_id: i64, limit: i32, moderation: bool) -> i64 {
        let payload = json!({
            "title": "Test event",
            "annotation": "A short annotation",
            "description": "A longer description of the event",
            "category": category_id,
            "event_date": (Utc::now() + chrono::Duration::hours(3)).to_rfc3339(),
            "paid": false,
            "participant_limit": limit,
            "request_moderation": moderation
        });
        let response = self.post(&format!("/users/{}/events", user_id), payload).await;
        assert_eq!(response.status(), 201, "seed_event failed");
        parse_body(response).await["id"].as_i64().unwrap()
    }

    pub async fn publish_event(&self, event_id: i64) -> Value {
        let response = self
            .patch(&format!("/admin/events/{}", event_id), Some(json!({ "state_action": "PUBLISH_EVENT" })))
            .await;
        assert_eq!(response.status(), 200, "publish_event failed");
        parse_body(response).await
    }

    /// Reads an event through its owner's endpoint, confirmed count included.
    pub async fn owner_event(&self, user_id: i64, event_id: i64) -> Value {
        let response = self.get(&format!("/users/{}/events/{}", user_id, event_id)).await;
        assert_eq!(response.status(), 200, "owner_event failed");
        parse_body(response).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

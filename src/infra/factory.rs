use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::stats::StatsService;
use crate::infra::stats::http_stats_client::HttpStatsClient;
use crate::infra::repositories::{
    postgres_user_repo::PostgresUserRepo, postgres_category_repo::PostgresCategoryRepo,
    postgres_event_repo::PostgresEventRepo, postgres_request_repo::PostgresRequestRepo,
    postgres_compilation_repo::PostgresCompilationRepo, postgres_comment_repo::PostgresCommentRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_category_repo::SqliteCategoryRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_request_repo::SqliteRequestRepo,
    sqlite_compilation_repo::SqliteCompilationRepo, sqlite_comment_repo::SqliteCommentRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let stats_client = Arc::new(HttpStatsClient::new(config.stats_service_url.clone()));
    let stats = Arc::new(StatsService::new(stats_client, config.app_name.clone()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            category_repo: Arc::new(PostgresCategoryRepo::new(pool.clone())),
            event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
            request_repo: Arc::new(PostgresRequestRepo::new(pool.clone())),
            compilation_repo: Arc::new(PostgresCompilationRepo::new(pool.clone())),
            comment_repo: Arc::new(PostgresCommentRepo::new(pool.clone())),
            stats,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            category_repo: Arc::new(SqliteCategoryRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            request_repo: Arc::new(SqliteRequestRepo::new(pool.clone())),
            compilation_repo: Arc::new(SqliteCompilationRepo::new(pool.clone())),
            comment_repo: Arc::new(SqliteCommentRepo::new(pool.clone())),
            stats,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub stats_service_url: String,
    pub app_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "8080".to_string()).parse().expect("PORT must be a number"),
            stats_service_url: env::var("STATS_SERVICE_URL").unwrap_or_else(|_| "http://localhost:9090".to_string()),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "events-backend".to_string()),
        }
    }
}

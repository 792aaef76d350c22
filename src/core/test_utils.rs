use std::sync::Arc;

use sqlx::PgPool;

use crate::{settings::Config, AppState};

pub fn test_config() -> Config {
    Config {
        env: "server".to_string(),
        host: "127.0.0.1".to_string(),
        port: 8080,
        prefix: Some("/api".to_string()),
        database_url: String::new(),
        log_level: None,
        log_dir: None,
    }
}

pub fn test_app_state(pool: PgPool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, &test_config()))
}

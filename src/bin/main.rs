use std::sync::Arc;

use poem::listener::TcpListener;
use promotion_service::{
    core::{db::init_pool, logging::init_logging},
    init_openapi_route,
    settings::get_config,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config()?;
    let _guard = init_logging(&config);
    tracing::info!("run with config: {:?}", config);

    // Init Database Connection
    tracing::info!("Init Postgres connection on {}", config.database_url);
    let pool = init_pool(&config).await?;
    // Init App State
    let app_state = Arc::new(AppState::new(pool, &config));

    let app = init_openapi_route(app_state.clone(), &config);
    tracing::info!("run server on {}:{}", config.host, config.port);
    poem::Server::new(TcpListener::bind(format!(
        "{}:{}",
        config.host, config.port
    )))
    .run(app)
    .await?;
    Ok(())
}

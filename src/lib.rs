use std::sync::Arc;

use poem::{
    middleware::{AddData, AddDataEndpoint, Cors, CorsEndpoint},
    EndpointExt, Route,
};
use poem_openapi::OpenApiService;
use route::promotion::ApiPromotion;
use settings::Config;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub mod cli;
pub mod core;
pub mod factory;
pub mod model;
pub mod repository;
pub mod route;
pub mod schema;
pub mod settings;

pub struct AppState {
    pub db: Pool<Postgres>,
    /// Mount point of the API, used to build `Location` headers.
    pub prefix: String,
}

impl AppState {
    pub fn new(db: Pool<Postgres>, config: &Config) -> Self {
        Self {
            db,
            prefix: api_prefix(config),
        }
    }

    /// Absolute path of a single promotion.
    pub fn promotion_url(&self, id: &Uuid) -> String {
        format!("{}/promotions/{}", self.prefix.trim_end_matches('/'), id)
    }
}

fn api_prefix(config: &Config) -> String {
    config.prefix.clone().unwrap_or("/".to_string())
}

pub fn init_openapi_route(
    app_state: Arc<AppState>,
    config: &Config,
) -> CorsEndpoint<AddDataEndpoint<Route, Arc<AppState>>> {
    let prefix = api_prefix(config);
    let openapi_route =
        OpenApiService::new(ApiPromotion, "Promotion Service", "1.0").server(prefix.clone());
    let openapi_json_endpoint = openapi_route.spec_endpoint();
    let ui = openapi_route.swagger_ui();
    Route::new()
        .nest(prefix, openapi_route)
        .nest("/docs", ui)
        .at("openapi.json", openapi_json_endpoint)
        .with(AddData::new(app_state))
        .with(Cors::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::test_config;

    #[tokio::test]
    async fn test_promotion_url() {
        let id = Uuid::new_v4();
        let mut config = test_config();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/promotion")
            .unwrap();

        let state = AppState::new(pool.clone(), &config);
        assert_eq!(state.promotion_url(&id), format!("/api/promotions/{}", id));

        config.prefix = None;
        let state = AppState::new(pool.clone(), &config);
        assert_eq!(state.promotion_url(&id), format!("/promotions/{}", id));

        config.prefix = Some("/api/v1/".to_string());
        let state = AppState::new(pool, &config);
        assert_eq!(state.promotion_url(&id), format!("/api/v1/promotions/{}", id));
    }
}

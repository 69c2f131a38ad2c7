use std::sync::Arc;

use axum::{
    http::header::{HeaderValue, CONTENT_TYPE},
    http::Method,
    routing::{get, post},
    Router,
};
use sa_common::matching::MatchConfig;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod handlers;

pub const SERVICE_NAME: &str = "sa-match attribution service";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

pub struct AppState {
    pub config: AppConfig,
    pub match_config: MatchConfig,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/match-orders", post(handlers::matches::match_orders))
        .route("/config", get(handlers::config::get_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// State with defaults, for router tests.
pub fn test_state() -> SharedState {
    Arc::new(AppState {
        config: AppConfig {
            port: 8000,
            cors_origins: vec!["http://localhost:3000".into()],
        },
        match_config: MatchConfig::default(),
    })
}

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use sa_api::error::ApiError;
use sa_api::{create_router, AppConfig, AppState};
use sa_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use sa_common::matching::MatchConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "sa-api", about = "HTTP API for deal-to-order attribution")]
struct Cli {
    /// Server port
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "SA_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,
}

fn app_config_from_cli(cli: Cli) -> Result<AppConfig, ApiError> {
    let cors_origins = cli
        .cors_origins
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect::<Vec<_>>();

    if cors_origins.is_empty() {
        return Err(ApiError::BadRequest(
            "SA_CORS_ORIGINS must list at least one origin".into(),
        ));
    }

    Ok(AppConfig {
        port: cli.port,
        cors_origins,
    })
}

async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber("sa-api");
    install_tracing_panic_hook("sa-api");

    let cli = Cli::parse();
    let config = app_config_from_cli(cli)?;
    let match_config = MatchConfig::from_env();

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let state = Arc::new(AppState {
        config,
        match_config,
    });
    let app = create_router(state);

    info!(%addr, "sa-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "sa-api failed");
        std::process::exit(1);
    }
}

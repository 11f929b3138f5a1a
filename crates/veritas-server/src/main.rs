use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use veritas_config::ServerConfig;
use veritas_server::{build_router, ServerState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let state = Arc::new(init_server_state(&config)?);
    let app = build_router(state, &config)?;

    let addr = config.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_server_state(config: &ServerConfig) -> Result<ServerState> {
    info!(
        model = %config.model.extracted_path().display(),
        archive = %config.model.archive_path().display(),
        "Loading model"
    );

    ServerState::load(&config.model)
        .inspect_err(|e| error!("Refusing to start: {}", e))
        .context("failed to load model")
}

use std::sync::Arc;

use anyhow::Context;
use cinefav_metadata::{OmdbClient, SharedProvider};
use cinefav_server::config::ServerConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env().context("failed to read configuration")?;

    let provider: Option<SharedProvider> = match &config.omdb_api_key {
        Some(key) => {
            let client = OmdbClient::new(
                config.omdb_base_url.clone(),
                key.clone(),
                config.omdb_timeout,
            )
            .context("failed to build OMDb client")?;
            info!(base_url = %config.omdb_base_url, "OMDb provider configured");
            let provider: SharedProvider = Arc::new(client);
            Some(provider)
        }
        None => {
            warn!("OMDB_API_KEY not configured; search and favorites will fail");
            None
        }
    };

    let app_state =
        cinefav_server::state::AppState::new(provider, config.allowed_origins.clone());
    let app = cinefav_server::routes::build_router(app_state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %bind_addr, origins = ?config.allowed_origins, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

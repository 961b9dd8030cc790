//! Gemini Relay daemon.
//!
//! Forwards text, image, document and audio requests to the Gemini API and
//! relays the text reply. Configuration comes from flags, environment
//! variables and an optional `.env` file.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod server_utils;

use cli::Cli;
use relay_core::{build_router, AppState, GeminiClient, StagingArea};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal in production.
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Ok(path) = dotenv_result {
        info!("Loaded environment from {}", path.display());
    }

    let Some(api_key) = cli.resolve_api_key() else {
        bail!("No API key configured: set GEMINI_API_KEY (or GOOGLE_API_KEY) or pass --api-key");
    };
    let provider_config = cli.provider_config(api_key)?;
    let gateway_config = cli.gateway_config();

    let http_client = GeminiClient::build_http_client(&provider_config)
        .context("Failed to build HTTP client")?;
    let provider = Arc::new(GeminiClient::new(http_client, &provider_config));

    let staging = StagingArea::new(gateway_config.staging_dir.clone());
    staging.ensure().await.with_context(|| {
        format!("Failed to create staging directory {}", gateway_config.staging_dir.display())
    })?;

    info!("Provider: {}", provider_config.base_url);
    info!(
        "Models: text={}, image={}, document={}, audio={}",
        gateway_config.models.text,
        gateway_config.models.image,
        gateway_config.models.document,
        gateway_config.models.audio
    );
    info!("Staging uploads in {}", gateway_config.staging_dir.display());
    if let Some(static_dir) = &gateway_config.static_dir {
        if !static_dir.is_dir() {
            warn!("Static directory {} does not exist", static_dir.display());
        }
        info!("Serving static client from {}", static_dir.display());
    }

    let state = AppState::new(provider, &gateway_config);
    let app = build_router(state, &gateway_config);

    let ip: std::net::IpAddr = cli
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cli.host, e))?;
    let addr = SocketAddr::new(ip, cli.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Gemini Relay listening on http://{}", addr);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

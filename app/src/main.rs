//! Glittr DEX API server
//!
//! Serves pool discovery, swap quoting, and the indexer CORS proxy for the
//! web frontend. All transaction construction and signing happen wallet-side.

use dex_api::AppState;
use dex_core::{AppConfig, Network};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("glittr_dex=debug".parse()?)
                .add_directive("dex_api=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    let config = config_from_env();
    tracing::info!(
        "Starting Glittr DEX API server ({} via {})",
        config.network,
        config.indexer.url
    );

    let port = config.api_port;
    let state = AppState::with_config(config);
    dex_api::start_server(state, port).await?;

    Ok(())
}

/// Defaults with environment overrides; the config is handed to the state
/// explicitly, no process-wide singletons.
fn config_from_env() -> AppConfig {
    let mut config = AppConfig::default();

    if let Ok(url) = std::env::var("GLITTR_API_URL") {
        config.indexer.url = url;
    }
    if let Ok(api_key) = std::env::var("GLITTR_API_KEY") {
        config.indexer.api_key = api_key;
    }
    if let Ok(network) = std::env::var("GLITTR_NETWORK") {
        match network.parse::<Network>() {
            Ok(network) => config.network = network,
            Err(_) => tracing::warn!("Ignoring unknown GLITTR_NETWORK {:?}", network),
        }
    }
    if let Ok(port) = std::env::var("DEX_API_PORT") {
        match port.parse() {
            Ok(port) => config.api_port = port,
            Err(_) => tracing::warn!("Ignoring non-numeric DEX_API_PORT {:?}", port),
        }
    }

    config
}

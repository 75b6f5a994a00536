//! Application state shared across API handlers

use std::sync::Arc;

use dex_core::{AppConfig, IndexerConfig, Network};
use glittr_client::GlittrClient;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
    client: RwLock<Option<GlittrClient>>,
    /// Untyped HTTP client for the CORS proxy routes
    proxy_http: reqwest::Client,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                client: RwLock::new(None),
                proxy_http: reqwest::Client::new(),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Update indexer configuration, dropping any cached client
    pub async fn set_indexer_config(&self, indexer: IndexerConfig) {
        let mut config = self.inner.config.write().await;
        config.indexer = indexer;

        let mut client = self.inner.client.write().await;
        *client = None;
    }

    /// Get or create the indexer client
    pub async fn client(&self) -> Option<GlittrClient> {
        {
            let client = self.inner.client.read().await;
            if client.is_some() {
                return client.clone();
            }
        }

        let config = self.inner.config.read().await;
        tracing::info!("Creating indexer client for {}", config.indexer.url);
        match GlittrClient::new(config.indexer.clone()) {
            Ok(client) => {
                let mut cached = self.inner.client.write().await;
                *cached = Some(client.clone());
                Some(client)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to create indexer client for {}: {}",
                    config.indexer.url,
                    e
                );
                None
            }
        }
    }

    /// Get current network
    pub async fn network(&self) -> Network {
        self.inner.config.read().await.network
    }

    /// HTTP client for proxy forwarding
    pub fn proxy_http(&self) -> &reqwest::Client {
        &self.inner.proxy_http
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

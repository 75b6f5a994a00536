//! Configuration types for the Glittr DEX

use serde::{Deserialize, Serialize};

use crate::Network;

/// Indexer connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Core API URL (e.g., "https://devnet-core-api.glittr.fi")
    pub url: String,

    /// API key for authenticated endpoints (optional)
    #[serde(default)]
    pub api_key: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: "https://devnet-core-api.glittr.fi".to_string(),
            api_key: String::new(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Indexer connection settings
    pub indexer: IndexerConfig,

    /// Network (mainnet, testnet, or regtest)
    pub network: Network,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_api_port() -> u16 {
    18425
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            indexer: IndexerConfig::default(),
            network: Network::Regtest,
            api_port: default_api_port(),
        }
    }
}

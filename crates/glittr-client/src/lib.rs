//! glittr-client: HTTP client for the Glittr core API
//!
//! Thin typed wrapper over the indexer's JSON endpoints. All token amounts
//! stay decimal strings at this layer; parsing into integers happens in the
//! consuming protocol crates.

pub mod retry;

use std::collections::BTreeMap;
use std::time::Duration;

use dex_core::{ClientError, ContractId, IndexerConfig, TxId};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use retry::RetryPolicy;

/// Default timeout for indexer API calls (30 seconds).
/// Long enough for a slow devnet indexer, short enough to avoid perpetual
/// spinners in the consuming UI.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Asset contract metadata from `/helper/assets`
#[derive(Debug, Clone, Deserialize)]
pub struct AssetInfo {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub total_supply: Option<String>,
    #[serde(default)]
    pub supply_cap: Option<String>,
    #[serde(rename = "type", default)]
    pub contract_type: Option<ContractTypeInfo>,
}

/// Mint-mechanism discriminator attached to an asset listing
#[derive(Debug, Clone, Deserialize)]
pub struct ContractTypeInfo {
    #[serde(default)]
    pub free_mint: Option<bool>,
    #[serde(default)]
    pub collateralized: Option<CollateralizedInfo>,
}

/// Collateralized (pool) contract declaration
#[derive(Debug, Clone, Deserialize)]
pub struct CollateralizedInfo {
    #[serde(default)]
    pub assets: Vec<LinkedAsset>,
}

/// One leg of a collateralized pair
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedAsset {
    pub contract_id: String,
    #[serde(default)]
    pub divisibility: Option<u8>,
    #[serde(default)]
    pub ticker: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssetListResponse {
    result: BTreeMap<String, AssetInfo>,
}

/// Live contract state from `/blocktx/{block}/{tx}/state`
#[derive(Debug, Clone, Deserialize)]
pub struct ContractState {
    #[serde(default)]
    pub collateralized: Option<CollateralizedState>,
}

/// Reserve balances held by a collateralized contract.
/// Keys are `"block:tx"` asset ids, values are decimal-string amounts.
#[derive(Debug, Clone, Deserialize)]
pub struct CollateralizedState {
    #[serde(default)]
    pub amounts: BTreeMap<String, String>,
}

/// Client for the Glittr core API
#[derive(Debug, Clone)]
pub struct GlittrClient {
    http: reqwest::Client,
    config: IndexerConfig,
}

impl GlittrClient {
    /// Create a new client for the given indexer
    pub fn new(config: IndexerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("glittr-dex")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Unreachable {
                url: format!("{}: {}", config.url, e),
            })?;

        Ok(Self { http, config })
    }

    /// Get the current indexer configuration
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let mut request = self.http.get(&url);
        if !self.config.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Unreachable {
                url: format!("{}: {}", url, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// List all deployed asset contracts, keyed by `"block:tx"` id
    pub async fn list_assets(&self) -> Result<BTreeMap<String, AssetInfo>> {
        let response: AssetListResponse = self.get_json("helper/assets").await?;
        Ok(response.result)
    }

    /// Get the live state of a contract (reserve balances for pools)
    pub async fn get_contract_state(&self, id: &ContractId) -> Result<ContractState> {
        self.get_json(&format!("blocktx/{}/{}/state", id.block, id.tx))
            .await
    }

    /// Get the indexed message for a transaction.
    /// Returns a 404 `Api` error while the transaction is unconfirmed.
    pub async fn get_message_by_txid(&self, txid: &TxId) -> Result<serde_json::Value> {
        self.get_json(&format!("tx/{}", txid)).await
    }

    /// Wait until a transaction's message is indexed, polling under a bounded
    /// retry policy. Fails with `ConfirmationTimeout` once attempts are
    /// exhausted; dropping the future cancels the wait.
    pub async fn wait_for_message(
        &self,
        txid: &TxId,
        policy: &RetryPolicy,
    ) -> Result<serde_json::Value> {
        for attempt in 0..policy.max_attempts {
            match self.get_message_by_txid(txid).await {
                Ok(message) => {
                    tracing::info!("Transaction {} indexed after {} attempt(s)", txid, attempt + 1);
                    return Ok(message);
                }
                Err(ClientError::Api { status: 404, .. }) => {
                    tracing::debug!("Transaction {} not yet indexed (attempt {})", txid, attempt + 1);
                }
                Err(ClientError::Unreachable { url }) => {
                    tracing::warn!("Indexer unreachable while polling {}: {}", txid, url);
                }
                Err(e) => return Err(e),
            }
            tokio::time::sleep(policy.delay_for(attempt)).await;
        }

        Err(ClientError::ConfirmationTimeout {
            tx_id: txid.to_string(),
            attempts: policy.max_attempts,
        })
    }

    /// Check if the indexer is reachable
    pub async fn is_online(&self) -> bool {
        self.list_assets().await.is_ok()
    }
}

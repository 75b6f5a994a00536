//! Data Transfer Objects for API requests and responses
//!
//! Token amounts cross the wire as decimal strings, mirroring the indexer.

use amm::PoolInfo;
use dex_core::ContractId;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Indexer status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub connected: bool,
    pub indexer_url: String,
    pub network: String,
}

/// Indexer configuration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfigRequest {
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

/// Pool listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsResponse {
    pub pools: Vec<PoolInfo>,
    pub count: usize,
}

/// One side of a reserve snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveEntryDto {
    pub asset: ContractId,
    pub amount: String,
}

/// Reserve snapshot response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservesResponse {
    pub pool_id: ContractId,
    pub reserves: Vec<ReserveEntryDto>,
}

/// Swap quote request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteApiRequest {
    pub pool_id: ContractId,
    pub input_asset: ContractId,
    /// Decimal-string token amount
    pub input_amount: String,
    /// Slippage tolerance as a fraction in [0, 1]; defaults to 0.10
    #[serde(default)]
    pub slippage_fraction: Option<f64>,
}

/// Swap quote response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteApiResponse {
    pub pool_id: ContractId,
    pub input_asset: ContractId,
    pub input_amount: String,
    pub output_asset: ContractId,
    /// Expected output under the constant-product invariant
    pub output_amount: String,
    /// Minimum acceptable output for the requested slippage tolerance;
    /// intended for the transaction's on-chain min-output assertion
    pub min_output: String,
    pub price_impact: f64,
    pub slippage_fraction: f64,
}

/// Liquidity deposit preview request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositPreviewApiRequest {
    pub pool_id: ContractId,
    pub input_asset: ContractId,
    /// Decimal-string token amount
    pub input_amount: String,
}

/// Liquidity deposit preview response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositPreviewApiResponse {
    pub pool_id: ContractId,
    pub input_asset: ContractId,
    pub input_amount: String,
    pub matching_asset: ContractId,
    /// Second-leg amount keeping the deposit proportional
    pub matching_amount: String,
    /// Estimated LP tokens minted, when the LP supply is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lp_reward_estimate: Option<String>,
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new("upstream_error", message)
    }
}

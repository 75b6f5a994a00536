//! Pool Discovery and Fetching
//!
//! Functions for discovering AMM pool contracts and snapshotting their
//! reserves from the indexer.

use dex_core::{parse_amount, ClientError, ContractId};
use glittr_client::{AssetInfo, GlittrClient};

use crate::calculator;
use crate::state::{AmmError, PoolAsset, PoolInfo, PoolReserves, SwapQuote};

/// AMM pool contracts are tagged by ticker convention
pub fn is_amm_ticker(ticker: &str) -> bool {
    ticker.starts_with("AMM-") || ticker.ends_with("-AMM")
}

/// Parse one asset listing into a `PoolInfo`.
///
/// Requires a collateralized pair of exactly two assets, both with tickers
/// and parseable contract ids.
pub fn parse_pool_listing(id: &str, info: &AssetInfo) -> Result<PoolInfo, AmmError> {
    let pool_id: ContractId = id.parse().map_err(|_| AmmError::InvalidPoolState {
        reason: format!("bad pool contract id {:?}", id),
    })?;

    let ticker = info
        .ticker
        .clone()
        .ok_or_else(|| AmmError::InvalidPoolState {
            reason: "pool listing has no ticker".to_string(),
        })?;

    let pair = info
        .contract_type
        .as_ref()
        .and_then(|t| t.collateralized.as_ref())
        .ok_or_else(|| AmmError::InvalidPoolState {
            reason: "pool contract is not collateralized".to_string(),
        })?;

    if pair.assets.len() != 2 {
        return Err(AmmError::InvalidPoolState {
            reason: format!("expected 2 pooled assets, found {}", pair.assets.len()),
        });
    }

    let assets = [parse_pool_leg(&pair.assets[0])?, parse_pool_leg(&pair.assets[1])?];

    let lp_supply = info
        .total_supply
        .as_deref()
        .and_then(|s| parse_amount(s).ok());

    Ok(PoolInfo {
        pool_id,
        ticker,
        assets,
        lp_supply,
    })
}

fn parse_pool_leg(linked: &glittr_client::LinkedAsset) -> Result<PoolAsset, AmmError> {
    let contract_id: ContractId =
        linked
            .contract_id
            .parse()
            .map_err(|_| AmmError::InvalidPoolState {
                reason: format!("bad asset contract id {:?}", linked.contract_id),
            })?;
    let ticker = linked
        .ticker
        .clone()
        .ok_or_else(|| AmmError::InvalidPoolState {
            reason: format!("pooled asset {} has no ticker", contract_id),
        })?;
    Ok(PoolAsset {
        contract_id,
        ticker,
        divisibility: linked.divisibility,
    })
}

/// Discover all AMM pools from the indexer, newest first.
///
/// Listings that carry the AMM ticker convention but fail to parse are
/// skipped with a warning rather than failing the whole discovery.
pub async fn discover_pools(client: &GlittrClient) -> Result<Vec<PoolInfo>, AmmError> {
    let assets = client
        .list_assets()
        .await
        .map_err(|e| AmmError::Indexer(e.to_string()))?;

    let mut pools = Vec::new();
    for (id, info) in &assets {
        let ticker = match info.ticker.as_deref() {
            Some(t) if is_amm_ticker(t) => t,
            _ => continue,
        };
        match parse_pool_listing(id, info) {
            Ok(pool) => pools.push(pool),
            Err(e) => {
                tracing::warn!("Skipping AMM listing {} ({}): {}", id, ticker, e);
            }
        }
    }

    // "block:tx" keys sort lexically, so order numerically here
    pools.sort_by(|a, b| b.pool_id.cmp(&a.pool_id));

    tracing::info!("Discovered {} AMM pools", pools.len());
    Ok(pools)
}

/// Fetch a fresh reserve snapshot for a pool contract.
///
/// Snapshots are taken per quote; nothing is cached. Callers wanting a fresh
/// price fetch again.
pub async fn fetch_pool_reserves(
    client: &GlittrClient,
    pool_id: &ContractId,
) -> Result<PoolReserves, AmmError> {
    let state = client
        .get_contract_state(pool_id)
        .await
        .map_err(|e| match e {
            ClientError::Api { status: 404, .. } => AmmError::PoolNotFound(pool_id.to_string()),
            other => AmmError::Indexer(other.to_string()),
        })?;

    let collateral = state
        .collateralized
        .ok_or_else(|| AmmError::InvalidPoolState {
            reason: format!("contract {} holds no collateralized reserves", pool_id),
        })?;

    PoolReserves::from_amounts(&collateral.amounts)
}

/// Quote a swap against a freshly fetched reserve snapshot
pub async fn quote_pool_swap(
    client: &GlittrClient,
    pool_id: &ContractId,
    input_asset: &ContractId,
    input_amount: u64,
) -> Result<SwapQuote, AmmError> {
    let reserves = fetch_pool_reserves(client, pool_id).await?;
    calculator::quote_swap(&reserves, input_asset, input_amount)
}

//! AMM State Types
//!
//! Data structures for pool reserves, quotes, and slippage tolerances.

use std::collections::BTreeMap;
use std::fmt;

use dex_core::{parse_amount, ContractId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserve snapshot of a two-asset constant-product pool.
///
/// Holds exactly two `(asset, amount)` entries, sorted by asset id so that
/// equality and display are canonical regardless of construction order. A
/// snapshot is taken fresh from the indexer for every quote; it is never
/// cached or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    entries: [(ContractId, u64); 2],
}

impl PoolReserves {
    /// Build a snapshot from two asset/amount pairs.
    /// Fails with `InvalidPoolState` if the asset ids are equal.
    pub fn new(
        asset_a: ContractId,
        reserve_a: u64,
        asset_b: ContractId,
        reserve_b: u64,
    ) -> Result<Self, AmmError> {
        if asset_a == asset_b {
            return Err(AmmError::InvalidPoolState {
                reason: format!("duplicate asset {} in pool", asset_a),
            });
        }
        let entries = if asset_a < asset_b {
            [(asset_a, reserve_a), (asset_b, reserve_b)]
        } else {
            [(asset_b, reserve_b), (asset_a, reserve_a)]
        };
        Ok(Self { entries })
    }

    /// Build a snapshot from the indexer's `collateralized.amounts` map
    /// (`"block:tx"` keys, decimal-string values).
    pub fn from_amounts(amounts: &BTreeMap<String, String>) -> Result<Self, AmmError> {
        let mut entries = amounts.iter();
        let (first, second) = match (entries.next(), entries.next(), entries.next()) {
            (Some(first), Some(second), None) => (first, second),
            _ => {
                return Err(AmmError::InvalidPoolState {
                    reason: format!("expected 2 pooled assets, found {}", amounts.len()),
                })
            }
        };

        let (asset_a, reserve_a) = parse_reserve_entry(first)?;
        let (asset_b, reserve_b) = parse_reserve_entry(second)?;
        Self::new(asset_a, reserve_a, asset_b, reserve_b)
    }

    /// Reserve amount held for the given asset
    pub fn reserve(&self, asset: &ContractId) -> Option<u64> {
        self.entries
            .iter()
            .find(|(id, _)| id == asset)
            .map(|(_, amount)| *amount)
    }

    /// The other asset in the pair
    pub fn counterpart(&self, asset: &ContractId) -> Option<ContractId> {
        match &self.entries {
            [(a, _), (b, _)] if a == asset => Some(*b),
            [(a, _), (b, _)] if b == asset => Some(*a),
            _ => None,
        }
    }

    /// Both asset ids, in canonical order
    pub fn assets(&self) -> [ContractId; 2] {
        [self.entries[0].0, self.entries[1].0]
    }
}

fn parse_reserve_entry((id, amount): (&String, &String)) -> Result<(ContractId, u64), AmmError> {
    let id: ContractId = id.parse().map_err(|e| AmmError::InvalidPoolState {
        reason: format!("bad asset id in reserves: {}", e),
    })?;
    let amount = parse_amount(amount).map_err(|e| AmmError::InvalidAmount {
        message: e.to_string(),
    })?;
    Ok((id, amount))
}

impl fmt::Display for PoolReserves {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [(a, ra), (b, rb)] = &self.entries;
        write!(f, "{}: {} | {}: {}", a, ra, b, rb)
    }
}

/// Slippage tolerance in basis points (1 bps = 0.01%).
///
/// Token amounts never touch floating point; the tolerance is held as an
/// exact fraction over 10_000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlippageTolerance(u32);

impl SlippageTolerance {
    pub const MAX_BPS: u32 = 10_000;

    /// The swap UI default (10%)
    pub const DEFAULT: Self = Self(1_000);

    /// From basis points in `[0, 10_000]`
    pub fn from_basis_points(bps: u32) -> Result<Self, AmmError> {
        if bps > Self::MAX_BPS {
            return Err(AmmError::InvalidTolerance {
                value: bps as f64 / Self::MAX_BPS as f64,
            });
        }
        Ok(Self(bps))
    }

    /// From a fraction in `[0, 1]` (e.g. 0.10 for 10%)
    pub fn from_fraction(fraction: f64) -> Result<Self, AmmError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(AmmError::InvalidTolerance { value: fraction });
        }
        Ok(Self((fraction * Self::MAX_BPS as f64).round() as u32))
    }

    /// From a percentage in `[0, 100]` (e.g. 10 for 10%)
    pub fn from_percent(percent: f64) -> Result<Self, AmmError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(AmmError::InvalidTolerance {
                value: percent / 100.0,
            });
        }
        Ok(Self((percent * 100.0).round() as u32))
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }

    pub fn as_fraction(&self) -> f64 {
        self.0 as f64 / Self::MAX_BPS as f64
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Swap quote with calculated values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Asset being sold into the pool
    pub input_asset: ContractId,
    /// Amount being sold
    pub input_amount: u64,
    /// Asset received from the pool
    pub output_asset: ContractId,
    /// Expected output under the constant-product invariant
    pub output_amount: u64,
    /// Price impact percentage (display only)
    pub price_impact: f64,
    /// Suggested min output with the default slippage tolerance
    pub min_output_suggested: u64,
}

/// One leg of a discovered pool's asset pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolAsset {
    pub contract_id: ContractId,
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divisibility: Option<u8>,
}

/// A discovered AMM pool contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolInfo {
    /// The pool contract itself
    pub pool_id: ContractId,
    /// Pool ticker (e.g. "GLTT-AMM")
    pub ticker: String,
    /// The two pooled assets
    pub assets: [PoolAsset; 2],
    /// Circulating LP token supply, when the listing carries it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lp_supply: Option<u64>,
}

impl fmt::Display for PoolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} / {}",
            self.ticker, self.pool_id, self.assets[0].ticker, self.assets[1].ticker
        )
    }
}

/// AMM protocol errors.
///
/// Every kind is a synchronous validation failure surfaced directly to the
/// caller; nothing here is retried internally.
#[derive(Debug, Error)]
pub enum AmmError {
    /// Malformed or empty-liquidity reserve snapshot; there is no valid price
    #[error("Invalid pool state: {reason}")]
    InvalidPoolState { reason: String },

    /// Quote requested for an asset the pool does not hold
    #[error("Asset {0} is not in the pool")]
    UnknownAsset(ContractId),

    /// Malformed numeric input
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Slippage tolerance outside [0, 1]
    #[error("Slippage tolerance {value} is outside [0, 1]")]
    InvalidTolerance { value: f64 },

    /// Input too small relative to reserves; the swap would yield nothing
    #[error("Swap output is zero; increase the input amount")]
    ZeroOutput,

    /// No AMM contract with the given id
    #[error("Pool not found: {0}")]
    PoolNotFound(String),

    /// Failure in the chain-state provider
    #[error("Indexer error: {0}")]
    Indexer(String),
}

impl AmmError {
    /// Stable machine-readable code for the API layer
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPoolState { .. } => "invalid_pool_state",
            Self::UnknownAsset(_) => "unknown_asset",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidTolerance { .. } => "invalid_tolerance",
            Self::ZeroOutput => "zero_output",
            Self::PoolNotFound(_) => "pool_not_found",
            Self::Indexer(_) => "indexer_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(block: u64, tx: u32) -> ContractId {
        ContractId::new(block, tx)
    }

    #[test]
    fn test_reserves_canonical_order() {
        let a = cid(343443, 1);
        let b = cid(343447, 1);
        let forward = PoolReserves::new(a, 10, b, 20).unwrap();
        let reverse = PoolReserves::new(b, 20, a, 10).unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.reserve(&a), Some(10));
        assert_eq!(forward.reserve(&b), Some(20));
        assert_eq!(forward.counterpart(&a), Some(b));
        assert_eq!(forward.counterpart(&b), Some(a));
    }

    #[test]
    fn test_reserves_reject_duplicate_asset() {
        let a = cid(343443, 1);
        let err = PoolReserves::new(a, 10, a, 20).unwrap_err();
        assert!(matches!(err, AmmError::InvalidPoolState { .. }));
    }

    #[test]
    fn test_from_amounts() {
        let mut amounts = BTreeMap::new();
        amounts.insert("343443:1".to_string(), "1000".to_string());
        amounts.insert("343447:1".to_string(), "2000".to_string());
        let reserves = PoolReserves::from_amounts(&amounts).unwrap();
        assert_eq!(reserves.reserve(&cid(343443, 1)), Some(1000));
        assert_eq!(reserves.reserve(&cid(343447, 1)), Some(2000));
    }

    #[test]
    fn test_from_amounts_wrong_arity() {
        let mut amounts = BTreeMap::new();
        amounts.insert("343443:1".to_string(), "1000".to_string());
        let err = PoolReserves::from_amounts(&amounts).unwrap_err();
        assert!(matches!(err, AmmError::InvalidPoolState { .. }));

        amounts.insert("343447:1".to_string(), "2000".to_string());
        amounts.insert("343450:1".to_string(), "3000".to_string());
        let err = PoolReserves::from_amounts(&amounts).unwrap_err();
        assert!(matches!(err, AmmError::InvalidPoolState { .. }));
    }

    #[test]
    fn test_from_amounts_bad_number() {
        let mut amounts = BTreeMap::new();
        amounts.insert("343443:1".to_string(), "10.5".to_string());
        amounts.insert("343447:1".to_string(), "2000".to_string());
        let err = PoolReserves::from_amounts(&amounts).unwrap_err();
        assert!(matches!(err, AmmError::InvalidAmount { .. }));
    }

    #[test]
    fn test_tolerance_constructors() {
        assert_eq!(
            SlippageTolerance::from_fraction(0.10).unwrap().basis_points(),
            1000
        );
        assert_eq!(
            SlippageTolerance::from_percent(0.5).unwrap().basis_points(),
            50
        );
        assert_eq!(
            SlippageTolerance::from_basis_points(10_000)
                .unwrap()
                .basis_points(),
            10_000
        );
    }

    #[test]
    fn test_tolerance_rejects_out_of_range() {
        assert!(SlippageTolerance::from_fraction(-0.01).is_err());
        assert!(SlippageTolerance::from_fraction(1.01).is_err());
        assert!(SlippageTolerance::from_fraction(f64::NAN).is_err());
        assert!(SlippageTolerance::from_percent(101.0).is_err());
        assert!(SlippageTolerance::from_basis_points(10_001).is_err());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AmmError::ZeroOutput.error_code(), "zero_output");
        assert_eq!(
            AmmError::UnknownAsset(cid(1, 1)).error_code(),
            "unknown_asset"
        );
    }
}

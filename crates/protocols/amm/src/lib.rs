//! Constant-Product AMM Protocol
//!
//! Quoting against Glittr collateralized pool contracts: reserve snapshots,
//! the constant-product output formula, and slippage-derived minimum-output
//! bounds. Transaction construction and signing stay with the wallet SDK.

pub mod calculator;
pub mod fetch;
pub mod state;

// Re-exports
pub use calculator::{
    initial_lp_share, lp_mint_reward, matching_deposit_amount, min_output_with_slippage,
    price_impact, quote_swap, swap_output,
};
pub use fetch::{discover_pools, fetch_pool_reserves, parse_pool_listing, quote_pool_swap};
pub use state::{
    AmmError, PoolAsset, PoolInfo, PoolReserves, SlippageTolerance, SwapQuote,
};

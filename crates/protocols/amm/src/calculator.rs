//! AMM Calculator
//!
//! Swap math using the constant product formula (x * y = k). Pure functions,
//! no I/O; all amount arithmetic goes through BigInt so reserve products can
//! never overflow.

use dex_core::ContractId;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::state::{AmmError, PoolReserves, SlippageTolerance, SwapQuote};

/// Calculate swap output using the constant product formula.
///
/// The on-chain validator recomputes `y - x*y/(x + input)` over the
/// rationals and floors the result once, which for integer `y` equals
/// `y - ceil(x*y / (x + input))`. Flooring the quotient before subtracting
/// would overshoot by one whenever the division is inexact, so the ceiling
/// here is load-bearing.
pub fn swap_output(
    reserve_in: u64,
    reserve_out: u64,
    input_amount: u64,
) -> Result<u64, AmmError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InvalidPoolState {
            reason: "pool has no liquidity".to_string(),
        });
    }

    let x = BigInt::from(reserve_in);
    let y = BigInt::from(reserve_out);
    let denominator = &x + BigInt::from(input_amount);
    let quotient = (&x * &y + &denominator - 1) / &denominator;
    let output: BigInt = &y - quotient;

    // output < reserve_out always holds, so the conversion cannot fail
    let output = output.to_u64().unwrap_or(0);
    if output == 0 {
        return Err(AmmError::ZeroOutput);
    }
    Ok(output)
}

/// Calculate a swap quote against a reserve snapshot.
///
/// Fails with `UnknownAsset` if `input_asset` is not pooled, with
/// `InvalidPoolState` if either side has no liquidity, and with `ZeroOutput`
/// for inputs too small to move the pool.
pub fn quote_swap(
    reserves: &PoolReserves,
    input_asset: &ContractId,
    input_amount: u64,
) -> Result<SwapQuote, AmmError> {
    let reserve_in = reserves
        .reserve(input_asset)
        .ok_or(AmmError::UnknownAsset(*input_asset))?;
    let output_asset = reserves
        .counterpart(input_asset)
        .ok_or(AmmError::UnknownAsset(*input_asset))?;
    let reserve_out = reserves
        .reserve(&output_asset)
        .ok_or(AmmError::UnknownAsset(output_asset))?;

    let output_amount = swap_output(reserve_in, reserve_out, input_amount)?;

    Ok(SwapQuote {
        input_asset: *input_asset,
        input_amount,
        output_asset,
        output_amount,
        price_impact: price_impact(reserve_in, reserve_out, input_amount, output_amount),
        min_output_suggested: min_output_with_slippage(output_amount, SlippageTolerance::DEFAULT),
    })
}

/// Minimum acceptable output for a quote under a slippage tolerance.
///
/// Computes `floor(output - output * tolerance)` exactly:
/// `output - ceil(output * bps / 10_000)`. Always in `[0, output]`; equals
/// `output` at 0% and 0 at 100%. This value becomes an on-chain assertion,
/// so it must be derived at the same precision as the quote itself.
pub fn min_output_with_slippage(output_amount: u64, tolerance: SlippageTolerance) -> u64 {
    let output = output_amount as u128;
    let bps = tolerance.basis_points() as u128;
    let max_bps = SlippageTolerance::MAX_BPS as u128;
    let haircut = (output * bps + max_bps - 1) / max_bps;
    (output - haircut) as u64
}

/// Price impact as a percentage (spot price vs execution price).
/// Display only; never feeds back into amount arithmetic.
pub fn price_impact(
    reserve_in: u64,
    reserve_out: u64,
    input_amount: u64,
    output_amount: u64,
) -> f64 {
    if input_amount == 0 || output_amount == 0 || reserve_in == 0 {
        return 0.0;
    }

    let spot_price = reserve_out as f64 / reserve_in as f64;
    let execution_price = output_amount as f64 / input_amount as f64;

    if spot_price == 0.0 {
        return 0.0;
    }
    ((spot_price - execution_price) / spot_price).abs() * 100.0
}

/// Initial LP share for pool creation using the geometric mean.
///
/// Formula: sqrt(x_amount * y_amount), BigInt-backed since the product can
/// exceed u64::MAX. Returns 0 if either amount is 0.
pub fn initial_lp_share(x_amount: u64, y_amount: u64) -> u64 {
    if x_amount == 0 || y_amount == 0 {
        return 0;
    }
    let product = BigInt::from(x_amount) * BigInt::from(y_amount);
    product.sqrt().to_u64().unwrap_or(u64::MAX)
}

/// LP token reward for a proportional liquidity deposit.
///
/// reward = min(input_x * supply / reserve_x, input_y * supply / reserve_y)
pub fn lp_mint_reward(
    reserve_x: u64,
    reserve_y: u64,
    lp_supply: u64,
    input_x: u64,
    input_y: u64,
) -> u64 {
    if reserve_x == 0 || reserve_y == 0 || lp_supply == 0 {
        return 0;
    }
    let reward_x = BigInt::from(input_x) * BigInt::from(lp_supply) / BigInt::from(reserve_x);
    let reward_y = BigInt::from(input_y) * BigInt::from(lp_supply) / BigInt::from(reserve_y);
    reward_x.min(reward_y).to_u64().unwrap_or(0)
}

/// Second-leg amount needed to keep a deposit proportional to the pool.
///
/// needed = input * reserve_out / reserve_in
pub fn matching_deposit_amount(reserve_in: u64, reserve_out: u64, input_amount: u64) -> u64 {
    if reserve_in == 0 {
        return 0;
    }
    let needed = BigInt::from(input_amount) * BigInt::from(reserve_out) / BigInt::from(reserve_in);
    needed.to_u64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(block: u64, tx: u32) -> ContractId {
        ContractId::new(block, tx)
    }

    fn pool(reserve_a: u64, reserve_b: u64) -> PoolReserves {
        PoolReserves::new(cid(343443, 1), reserve_a, cid(343447, 1), reserve_b).unwrap()
    }

    #[test]
    fn test_balanced_pool_small_swap() {
        // x=1000, y=1000, input 10:
        // floor(1000 - 1000*1000/1010) = floor(9.900...) = 9
        let quote = quote_swap(&pool(1000, 1000), &cid(343443, 1), 10).unwrap();
        assert_eq!(quote.output_asset, cid(343447, 1));
        assert_eq!(quote.output_amount, 9);
    }

    #[test]
    fn test_min_output_ten_percent() {
        // floor(9 - 0.9) = 8
        let tolerance = SlippageTolerance::from_percent(10.0).unwrap();
        assert_eq!(min_output_with_slippage(9, tolerance), 8);
    }

    #[test]
    fn test_skewed_pool_reverse_direction() {
        // Pool A:500 B:2000, selling 100 B:
        // floor(500 - 2000*500/2100) = floor(23.8...) = 23
        let quote = quote_swap(&pool(500, 2000), &cid(343447, 1), 100).unwrap();
        assert_eq!(quote.output_asset, cid(343443, 1));
        assert_eq!(quote.output_amount, 23);
    }

    #[test]
    fn test_zero_liquidity_rejected() {
        let err = quote_swap(&pool(0, 1000), &cid(343443, 1), 10).unwrap_err();
        assert!(matches!(err, AmmError::InvalidPoolState { .. }));
        let err = quote_swap(&pool(1000, 0), &cid(343443, 1), 10).unwrap_err();
        assert!(matches!(err, AmmError::InvalidPoolState { .. }));
    }

    #[test]
    fn test_zero_input_yields_zero_output_error() {
        let err = quote_swap(&pool(1000, 1000), &cid(343443, 1), 0).unwrap_err();
        assert!(matches!(err, AmmError::ZeroOutput));
    }

    #[test]
    fn test_dust_input_rejected() {
        // 1 unit into a deep pool rounds to nothing
        let err = quote_swap(&pool(1_000_000, 10), &cid(343443, 1), 1).unwrap_err();
        assert!(matches!(err, AmmError::ZeroOutput));
    }

    #[test]
    fn test_unknown_asset_rejected() {
        let err = quote_swap(&pool(1000, 1000), &cid(999999, 7), 10).unwrap_err();
        assert!(matches!(err, AmmError::UnknownAsset(id) if id == cid(999999, 7)));
    }

    #[test]
    fn test_output_never_drains_pool() {
        // Even absurdly large inputs leave at least one unit of the output
        // reserve behind.
        for input in [1u64, 1000, u64::MAX / 2, u64::MAX] {
            let out = swap_output(1000, 1000, input).unwrap();
            assert!(out < 1000, "input {} drained the pool: {}", input, out);
        }
    }

    #[test]
    fn test_output_monotonic_in_input() {
        let mut previous = 0;
        for input in (10..5000).step_by(7) {
            let out = swap_output(100_000, 50_000, input).unwrap();
            assert!(
                out >= previous,
                "output decreased at input {}: {} < {}",
                input,
                out,
                previous
            );
            previous = out;
        }
    }

    #[test]
    fn test_round_trip_never_profits() {
        let (x, y) = (100_000u64, 40_000u64);
        for input in [13u64, 500, 9_999, 77_777] {
            let out = swap_output(x, y, input).unwrap();
            // Post-trade reserves: input side grew, output side shrank
            let back = swap_output(y - out, x + input, out).unwrap();
            assert!(
                back <= input,
                "round trip minted value: {} in, {} back",
                input,
                back
            );
        }
    }

    #[test]
    fn test_large_reserves_no_overflow() {
        // Products near u64::MAX^2 must not wrap
        let out = swap_output(u64::MAX, u64::MAX, u64::MAX).unwrap();
        assert!(out < u64::MAX);
        assert!(out > 0);
    }

    #[test]
    fn test_subtraction_form_floor_placement() {
        // x=1000, y=1000, input 10: the quotient 1000*1000/1010 = 990.099...
        // must round UP before subtracting. Flooring it would give 10.
        assert_eq!(swap_output(1000, 1000, 10).unwrap(), 9);
        // Exact division: 1000*1000/2000 = 500, no rounding either way
        assert_eq!(swap_output(1000, 1000, 1000).unwrap(), 500);
    }

    #[test]
    fn test_min_output_bounds() {
        let q = 12_345u64;
        for bps in [0u32, 1, 50, 1000, 9_999, 10_000] {
            let tolerance = SlippageTolerance::from_basis_points(bps).unwrap();
            let min = min_output_with_slippage(q, tolerance);
            assert!(min <= q);
        }
        assert_eq!(
            min_output_with_slippage(q, SlippageTolerance::from_basis_points(0).unwrap()),
            q
        );
        assert_eq!(
            min_output_with_slippage(q, SlippageTolerance::from_basis_points(10_000).unwrap()),
            0
        );
    }

    #[test]
    fn test_min_output_of_zero_is_zero() {
        assert_eq!(min_output_with_slippage(0, SlippageTolerance::DEFAULT), 0);
    }

    #[test]
    fn test_quote_fills_suggested_min_output() {
        let quote = quote_swap(&pool(1000, 1000), &cid(343443, 1), 10).unwrap();
        // 10% default tolerance on an output of 9
        assert_eq!(quote.min_output_suggested, 8);
        assert!(quote.price_impact > 0.0);
    }

    #[test]
    fn test_price_impact_rough_magnitude() {
        // Selling 100 into 1000/2000: spot 2.0, execution ~1.81
        let out = swap_output(1000, 2000, 100).unwrap();
        let impact = price_impact(1000, 2000, 100, out);
        assert!((impact - 9.1).abs() < 0.5, "impact was {}", impact);
    }

    #[test]
    fn test_initial_lp_share() {
        assert_eq!(initial_lp_share(100, 400), 200);
        assert_eq!(initial_lp_share(1000, 1000), 1000);
        assert_eq!(initial_lp_share(0, 1000), 0);
        assert_eq!(initial_lp_share(1000, 0), 0);
        // Overflow-safe for large values
        assert!(initial_lp_share(u64::MAX / 2, u64::MAX / 2) > 0);
    }

    #[test]
    fn test_lp_mint_reward_takes_minimum_leg() {
        assert_eq!(lp_mint_reward(1000, 4000, 2000, 100, 400), 200);
        // Excess on one side does not raise the reward
        assert_eq!(lp_mint_reward(1000, 4000, 2000, 500, 400), 200);
        assert_eq!(lp_mint_reward(0, 4000, 2000, 100, 400), 0);
        assert_eq!(lp_mint_reward(1000, 4000, 0, 100, 400), 0);
    }

    #[test]
    fn test_matching_deposit_amount() {
        assert_eq!(matching_deposit_amount(1000, 4000, 100), 400);
        assert_eq!(matching_deposit_amount(4000, 1000, 100), 25);
        assert_eq!(matching_deposit_amount(0, 1000, 100), 0);
    }
}

//! AMM Protocol Routes

use amm::{AmmError, SlippageTolerance};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dex_core::{parse_amount, ContractId};
use glittr_client::GlittrClient;

use crate::dto::{
    ApiError, DepositPreviewApiRequest, DepositPreviewApiResponse, PoolsResponse, QuoteApiRequest,
    QuoteApiResponse, ReserveEntryDto, ReservesResponse,
};
use crate::AppState;

/// Create AMM routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pools", get(get_pools))
        .route("/pools/{pool_id}", get(get_pool))
        .route("/pools/{pool_id}/reserves", get(get_reserves))
        .route("/quote", post(get_quote))
        .route("/deposit/preview", post(preview_deposit))
}

type ErrorResponse = (StatusCode, Json<ApiError>);

async fn require_client(state: &AppState) -> Result<GlittrClient, ErrorResponse> {
    state.client().await.ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("indexer_unavailable", "Indexer not reachable")),
        )
    })
}

/// Map each AMM error kind to a distinct code and status so the UI can show
/// specific guidance ("pool has no liquidity", "increase input amount", ...)
/// instead of a generic failure.
fn amm_error(e: AmmError) -> ErrorResponse {
    let status = match &e {
        AmmError::UnknownAsset(_)
        | AmmError::InvalidAmount { .. }
        | AmmError::InvalidTolerance { .. } => StatusCode::BAD_REQUEST,
        AmmError::PoolNotFound(_) => StatusCode::NOT_FOUND,
        AmmError::InvalidPoolState { .. } | AmmError::ZeroOutput => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AmmError::Indexer(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(ApiError::new(e.error_code(), e.to_string())))
}

fn parse_pool_path(pool_id: &str) -> Result<ContractId, ErrorResponse> {
    pool_id.parse().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(format!("{}", e))),
        )
    })
}

/// GET /amm/pools - List discovered AMM pools
async fn get_pools(State(state): State<AppState>) -> Result<Json<PoolsResponse>, ErrorResponse> {
    let client = require_client(&state).await?;
    let pools = amm::discover_pools(&client).await.map_err(amm_error)?;
    let count = pools.len();
    Ok(Json(PoolsResponse { pools, count }))
}

/// GET /amm/pools/{pool_id} - Get a specific pool
async fn get_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<String>,
) -> Result<Json<amm::PoolInfo>, ErrorResponse> {
    let pool_id = parse_pool_path(&pool_id)?;
    let client = require_client(&state).await?;

    let pools = amm::discover_pools(&client).await.map_err(amm_error)?;
    let pool = pools
        .into_iter()
        .find(|p| p.pool_id == pool_id)
        .ok_or_else(|| amm_error(AmmError::PoolNotFound(pool_id.to_string())))?;

    Ok(Json(pool))
}

/// GET /amm/pools/{pool_id}/reserves - Current reserve snapshot
async fn get_reserves(
    State(state): State<AppState>,
    Path(pool_id): Path<String>,
) -> Result<Json<ReservesResponse>, ErrorResponse> {
    let pool_id = parse_pool_path(&pool_id)?;
    let client = require_client(&state).await?;

    let reserves = amm::fetch_pool_reserves(&client, &pool_id)
        .await
        .map_err(amm_error)?;

    let entries = reserves
        .assets()
        .iter()
        .map(|asset| ReserveEntryDto {
            asset: *asset,
            amount: reserves.reserve(asset).unwrap_or(0).to_string(),
        })
        .collect();

    Ok(Json(ReservesResponse {
        pool_id,
        reserves: entries,
    }))
}

/// POST /amm/quote - Quote a swap against a fresh reserve snapshot
async fn get_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteApiRequest>,
) -> Result<Json<QuoteApiResponse>, ErrorResponse> {
    let input_amount = parse_amount(&request.input_amount).map_err(|e| {
        amm_error(AmmError::InvalidAmount {
            message: e.to_string(),
        })
    })?;

    let tolerance = match request.slippage_fraction {
        Some(fraction) => SlippageTolerance::from_fraction(fraction).map_err(amm_error)?,
        None => SlippageTolerance::DEFAULT,
    };

    let client = require_client(&state).await?;
    let quote = amm::quote_pool_swap(&client, &request.pool_id, &request.input_asset, input_amount)
        .await
        .map_err(amm_error)?;

    let min_output = amm::min_output_with_slippage(quote.output_amount, tolerance);

    Ok(Json(QuoteApiResponse {
        pool_id: request.pool_id,
        input_asset: quote.input_asset,
        input_amount: quote.input_amount.to_string(),
        output_asset: quote.output_asset,
        output_amount: quote.output_amount.to_string(),
        min_output: min_output.to_string(),
        price_impact: quote.price_impact,
        slippage_fraction: tolerance.as_fraction(),
    }))
}

/// POST /amm/deposit/preview - Proportional second leg for a liquidity deposit
async fn preview_deposit(
    State(state): State<AppState>,
    Json(request): Json<DepositPreviewApiRequest>,
) -> Result<Json<DepositPreviewApiResponse>, ErrorResponse> {
    let input_amount = parse_amount(&request.input_amount).map_err(|e| {
        amm_error(AmmError::InvalidAmount {
            message: e.to_string(),
        })
    })?;

    let client = require_client(&state).await?;

    let reserves = amm::fetch_pool_reserves(&client, &request.pool_id)
        .await
        .map_err(amm_error)?;

    let reserve_in = reserves
        .reserve(&request.input_asset)
        .ok_or_else(|| amm_error(AmmError::UnknownAsset(request.input_asset)))?;
    let matching_asset = reserves
        .counterpart(&request.input_asset)
        .ok_or_else(|| amm_error(AmmError::UnknownAsset(request.input_asset)))?;
    let reserve_out = reserves.reserve(&matching_asset).unwrap_or(0);

    let matching_amount = amm::matching_deposit_amount(reserve_in, reserve_out, input_amount);

    // LP supply comes from the pool's asset listing, when present
    let pools = amm::discover_pools(&client).await.map_err(amm_error)?;
    let lp_reward_estimate = pools
        .iter()
        .find(|p| p.pool_id == request.pool_id)
        .and_then(|p| p.lp_supply)
        .map(|supply| {
            amm::lp_mint_reward(reserve_in, reserve_out, supply, input_amount, matching_amount)
                .to_string()
        });

    Ok(Json(DepositPreviewApiResponse {
        pool_id: request.pool_id,
        input_asset: request.input_asset,
        input_amount: input_amount.to_string(),
        matching_asset,
        matching_amount: matching_amount.to_string(),
        lp_reward_estimate,
    }))
}

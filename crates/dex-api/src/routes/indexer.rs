//! Indexer status and configuration endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use dex_core::IndexerConfig;

use crate::dto::{IndexerConfigRequest, StatusResponse};
use crate::AppState;

/// Create indexer routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/configure", post(configure))
}

/// GET /indexer/status - Report indexer connectivity
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let config = state.config().await;
    let connected = match state.client().await {
        Some(client) => client.is_online().await,
        None => false,
    };

    Json(StatusResponse {
        connected,
        indexer_url: config.indexer.url,
        network: config.network.to_string(),
    })
}

/// POST /indexer/configure - Update indexer configuration
pub async fn configure(
    State(state): State<AppState>,
    Json(request): Json<IndexerConfigRequest>,
) -> Json<StatusResponse> {
    state
        .set_indexer_config(IndexerConfig {
            url: request.url,
            api_key: request.api_key,
        })
        .await;

    get_status(State(state)).await
}

//! API route handlers

pub mod amm;
pub mod health;
pub mod indexer;
pub mod proxy;

use axum::{routing::get, Router};

use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/indexer", indexer::router())
        .nest("/amm", amm::router())
        .nest("/proxy", proxy::router())
        .with_state(state)
}

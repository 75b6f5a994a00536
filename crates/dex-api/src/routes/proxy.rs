//! CORS proxy to the indexer API
//!
//! Browser frontends cannot call the indexer origin directly; these routes
//! forward GET/POST requests under `/proxy/` and relay the JSON response.
//! The permissive CORS layer on the app router covers preflight.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::dto::ApiError;
use crate::AppState;

/// Create proxy routes
pub fn router() -> Router<AppState> {
    Router::new().route("/{*path}", get(proxy_get).post(proxy_post))
}

async fn proxy_get(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let target = target_url(&state, &path, query.as_deref()).await;
    tracing::debug!("Proxying GET to {}", target);
    forward(state.proxy_http().get(&target)).await
}

async fn proxy_post(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let target = target_url(&state, &path, None).await;
    tracing::debug!("Proxying POST to {}", target);
    forward(state.proxy_http().post(&target).json(&body)).await
}

async fn target_url(state: &AppState, path: &str, query: Option<&str>) -> String {
    let base = state.config().await.indexer.url;
    let base = base.trim_end_matches('/');
    match query {
        Some(q) if !q.is_empty() => format!("{}/{}?{}", base, path, q),
        _ => format!("{}/{}", base, path),
    }
}

/// Send the forwarded request and relay the upstream status and JSON body
async fn forward(request: reqwest::RequestBuilder) -> Response {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            return (
                StatusCode::BAD_GATEWAY,
                Json(ApiError::upstream(e.to_string())),
            )
                .into_response();
        }
    };

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    match response.json::<serde_json::Value>().await {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiError::upstream(format!("invalid upstream JSON: {}", e))),
        )
            .into_response(),
    }
}

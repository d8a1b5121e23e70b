use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use wisefolio_market_data::upstream::{query_pairs, FINNHUB_ENDPOINTS};

use crate::{
    config::FINNHUB_API_KEY,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Body of `POST /functions/v1/finnhub-api`.
#[derive(Debug, Deserialize)]
pub struct FinnhubRequest {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub params: Map<String, Value>,
}

pub async fn finnhub_proxy(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FinnhubRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let upstream = state
        .finnhub
        .clone()
        .ok_or(ApiError::MissingApiKey(FINNHUB_API_KEY))?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let endpoint = request
        .endpoint
        .as_deref()
        .map(|e| e.trim().trim_matches('/'))
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Endpoint is required".to_string()))?;
    if !FINNHUB_ENDPOINTS.contains(&endpoint) {
        return Err(ApiError::BadRequest(format!(
            "Unsupported endpoint: {}",
            endpoint
        )));
    }

    tracing::debug!("Proxying Finnhub endpoint {}", endpoint);
    let data = upstream.get(endpoint, query_pairs(&request.params)).await?;
    Ok(Json(json!({ "data": data })))
}

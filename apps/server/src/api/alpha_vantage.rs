use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use wisefolio_market_data::upstream::query_pairs;

use crate::{
    config::ALPHA_VANTAGE_API_KEY,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Functions that may be called without a symbol.
const SYMBOL_OPTIONAL_PREFIX: &str = "TIME_SERIES";

/// Body of `POST /functions/v1/alpha-vantage-api`.
#[derive(Debug, Default, Deserialize)]
pub struct AlphaVantageRequest {
    pub function: Option<String>,
    pub symbol: Option<String>,
    pub interval: Option<String>,
    pub outputsize: Option<String>,
    pub datatype: Option<String>,
    pub time_period: Option<Value>,
    pub series_type: Option<String>,
    #[serde(default)]
    pub additional_params: serde_json::Map<String, Value>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl AlphaVantageRequest {
    /// Query pairs for the upstream call, without the API key.
    fn query(&self, function: &str) -> Vec<(String, String)> {
        let mut query = BTreeMap::new();
        query.insert("function".to_string(), function.to_string());
        query.insert(
            "datatype".to_string(),
            non_empty(&self.datatype).unwrap_or("json").to_string(),
        );

        let optional = [
            ("symbol", non_empty(&self.symbol)),
            ("interval", non_empty(&self.interval)),
            ("outputsize", non_empty(&self.outputsize)),
            ("series_type", non_empty(&self.series_type)),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                query.insert(key.to_string(), value.to_string());
            }
        }
        match &self.time_period {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                query.insert("time_period".to_string(), s.trim().to_string());
            }
            Some(Value::Number(n)) => {
                query.insert("time_period".to_string(), n.to_string());
            }
            _ => {}
        }

        for (key, value) in query_pairs(&self.additional_params) {
            query.entry(key).or_insert(value);
        }
        query.into_iter().collect()
    }
}

pub async fn alpha_vantage_proxy(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AlphaVantageRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let upstream = state
        .alpha_vantage
        .clone()
        .ok_or(ApiError::MissingApiKey(ALPHA_VANTAGE_API_KEY))?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let function = non_empty(&request.function)
        .ok_or_else(|| ApiError::BadRequest("Function is required".to_string()))?;
    if non_empty(&request.symbol).is_none() && !function.starts_with(SYMBOL_OPTIONAL_PREFIX) {
        return Err(ApiError::BadRequest("Symbol is required".to_string()));
    }

    let data = upstream.get("", request.query(function)).await?;

    if let Some(message) = data.get("Error Message").and_then(Value::as_str) {
        return Err(ApiError::Internal(format!(
            "Alpha Vantage API error: {}",
            message
        )));
    }
    if let Some(note) = data.get("Note").and_then(Value::as_str) {
        tracing::warn!("Alpha Vantage API note: {}", note);
    }

    Ok(Json(json!({ "data": data })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_datatype() {
        let request = AlphaVantageRequest {
            function: Some("TIME_SERIES_DAILY".to_string()),
            symbol: Some("IBM".to_string()),
            outputsize: Some("compact".to_string()),
            ..Default::default()
        };
        let query = request.query("TIME_SERIES_DAILY");
        assert!(query.contains(&("datatype".to_string(), "json".to_string())));
        assert!(query.contains(&("symbol".to_string(), "IBM".to_string())));
        assert!(query.contains(&("outputsize".to_string(), "compact".to_string())));
        assert!(!query.iter().any(|(k, _)| k == "interval"));
    }

    #[test]
    fn test_additional_params_do_not_override() {
        let mut request = AlphaVantageRequest {
            symbol: Some("IBM".to_string()),
            time_period: Some(json!(14)),
            ..Default::default()
        };
        request
            .additional_params
            .insert("symbol".to_string(), json!("MSFT"));
        request
            .additional_params
            .insert("month".to_string(), json!("2024-01"));

        let query = request.query("RSI");
        assert!(query.contains(&("symbol".to_string(), "IBM".to_string())));
        assert!(query.contains(&("month".to_string(), "2024-01".to_string())));
        assert!(query.contains(&("time_period".to_string(), "14".to_string())));
    }
}

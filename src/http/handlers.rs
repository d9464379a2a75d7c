//! Endpoint handlers.

use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::health::NodeStatus;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::market::DataRecord;
use crate::observability::metrics;

/// Query string of `GET /data`.
#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    pub limit: Option<i64>,
}

/// Body of `GET /data`.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub count: usize,
    pub data: Vec<DataRecord>,
}

/// `GET /health`: one status per configured host, primary first.
///
/// Never fails; unreachable hosts are reported down.
pub async fn health(State(state): State<AppState>) -> Json<Vec<NodeStatus>> {
    let start = Instant::now();
    let statuses = state.health.check_configured().await;

    let up = statuses.iter().filter(|s| s.up).count();
    tracing::debug!(up, total = statuses.len(), "Health check complete");
    metrics::record_request("health", 200, start);

    Json(statuses)
}

/// `GET /data?limit=N`: the newest `N` candles, newest first.
pub async fn data(
    State(state): State<AppState>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let start = Instant::now();
    let result = fetch(&state, query).await;

    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request("data", status, start);

    result.map(Json)
}

async fn fetch(
    state: &AppState,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<DataResponse, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let limit = resolve_limit(query.limit, state.data.default_limit, state.data.max_limit)?;

    let data = state.fetcher.fetch_records(limit).await?;
    Ok(DataResponse {
        count: data.len(),
        data,
    })
}

fn resolve_limit(requested: Option<i64>, default: u32, max: u32) -> Result<u32, ApiError> {
    let Some(limit) = requested else {
        return Ok(default);
    };
    match u32::try_from(limit) {
        Ok(limit) if (1..=max).contains(&limit) => Ok(limit),
        _ => Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {max}, got {limit}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit() {
        assert_eq!(resolve_limit(None, 500, 10_000).unwrap(), 500);
        assert_eq!(resolve_limit(Some(3), 500, 10_000).unwrap(), 3);
        assert_eq!(resolve_limit(Some(10_000), 500, 10_000).unwrap(), 10_000);

        for bad in [0, -1, 10_001, i64::MAX] {
            assert!(
                matches!(resolve_limit(Some(bad), 500, 10_000), Err(ApiError::BadRequest(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_response_shape() {
        let body = DataResponse {
            count: 1,
            data: vec![DataRecord {
                open_time: Some("2023-11-14T22:13:20Z".into()),
                open: Some(1.0),
                high: Some(2.0),
                low: Some(0.5),
                close: Some(1.5),
                volume: None,
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["open_time"], "2023-11-14T22:13:20Z");
        assert_eq!(json["data"][0]["volume"], serde_json::Value::Null);
    }
}

use crate::api::ApiResponse;
use crate::services::performance::{PairPerformance, TimeframePerformance};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::collections::BTreeMap;

/// GET /api/performance/pairs
async fn by_pairs(
    State(state): State<AppState>,
) -> Json<ApiResponse<BTreeMap<String, PairPerformance>>> {
    ApiResponse::ok(state.performance.by_pair())
}

/// GET /api/performance/timeframes
async fn by_timeframes(State(state): State<AppState>) -> Json<ApiResponse<TimeframePerformance>> {
    ApiResponse::ok(state.performance.by_timeframe())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/performance/pairs", get(by_pairs))
        .route("/api/performance/timeframes", get(by_timeframes))
}

use crate::api::ApiResponse;
use crate::services::{performance::OverallStats, sessions};
use crate::types::TradingSessionInfo;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub performance: OverallStats,
    pub trading_session: TradingSessionInfo,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/stats
async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<StatsData>> {
    let now = Utc::now();
    ApiResponse::ok(StatsData {
        performance: state.performance.overall_stats_at(now),
        trading_session: sessions::session_info(now),
        timestamp: now,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/stats", get(get_stats))
}

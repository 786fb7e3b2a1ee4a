use crate::api::ApiResponse;
use crate::services::{pairs::PairStatus, sessions};
use crate::types::MarketStatus;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ActivePairsData {
    pub active_pairs: Vec<&'static str>,
    pub pairs_info: Vec<PairStatus>,
}

/// GET /api/market/status
async fn market_status() -> Json<ApiResponse<MarketStatus>> {
    ApiResponse::ok(sessions::market_status(Utc::now()))
}

/// GET /api/pairs/active
async fn active_pairs(State(state): State<AppState>) -> Json<ApiResponse<ActivePairsData>> {
    let now = Utc::now();
    ApiResponse::ok(ActivePairsData {
        active_pairs: state.pairs.active_pairs(now),
        pairs_info: state.pairs.all_pairs_status(now),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/market/status", get(market_status))
        .route("/api/pairs/active", get(active_pairs))
}

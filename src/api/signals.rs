//! Signal endpoints: recent history, per-pair history, generation and
//! CSV export. `/api/signal/generate` is the only side-effecting route;
//! every other endpoint is a read.

use crate::api::ApiResponse;
use crate::error::{EngineError, Result};
use crate::services::export;
use crate::types::Signal;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct RecentQuery {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PairQuery {
    days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GenerateQuery {
    pair: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    format: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignalListResponse {
    success: bool,
    data: Vec<Signal>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct ExportResponse {
    success: bool,
    filename: String,
}

/// GET /api/signals/recent?limit=N
async fn get_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<SignalListResponse>> {
    let limit = query.limit.unwrap_or(20);
    if limit <= 0 {
        return Err(EngineError::InvalidArgument(
            "limit must be a positive integer".to_string(),
        ));
    }

    let signals = state.store.get_recent(limit as usize)?;
    Ok(Json(SignalListResponse {
        success: true,
        count: signals.len(),
        data: signals,
    }))
}

/// GET /api/signals/pair/:pair?days=N
async fn get_by_pair(
    State(state): State<AppState>,
    Path(pair): Path<String>,
    Query(query): Query<PairQuery>,
) -> Result<Json<SignalListResponse>> {
    let days = query.days.unwrap_or(7);
    if days <= 0 {
        return Err(EngineError::InvalidArgument(
            "days must be a positive integer".to_string(),
        ));
    }

    let signals = state.store.get_by_pair(&pair, days);
    Ok(Json(SignalListResponse {
        success: true,
        count: signals.len(),
        data: signals,
    }))
}

/// GET /api/signal/generate?pair=EUR/USD — triggers one generation
/// cycle. Intentionally side-effecting, unlike every other endpoint.
async fn generate(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<ApiResponse<Signal>>> {
    let signal = state.generator.generate(query.pair.as_deref()).await?;
    Ok(ApiResponse::ok(signal))
}

/// GET /api/export/signals?format=csv
async fn export_signals(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportResponse>> {
    let format = query.format.as_deref().unwrap_or("csv");
    if format != "csv" {
        return Err(EngineError::InvalidArgument(format!(
            "unsupported export format {format:?}"
        )));
    }

    let filename = export::export_csv(&state.store, &state.config.export_dir)?;
    Ok(Json(ExportResponse {
        success: true,
        filename,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/signals/recent", get(get_recent))
        .route("/api/signals/pair/:pair", get(get_by_pair))
        .route("/api/signal/generate", get(generate))
        .route("/api/export/signals", get(export_signals))
}

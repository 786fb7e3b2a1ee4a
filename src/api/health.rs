use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct HealthResponse {
    success: bool,
    healthy: bool,
    components: BTreeMap<String, bool>,
    timestamp: DateTime<Utc>,
}

/// GET /api/health — never fails; probe failures surface as `false`
/// component entries.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.health.check();
    Json(HealthResponse {
        success: true,
        healthy: snapshot.healthy,
        components: snapshot.components,
        timestamp: snapshot.timestamp,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

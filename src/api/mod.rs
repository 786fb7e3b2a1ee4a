pub mod health;
pub mod market;
pub mod performance;
pub mod signals;
pub mod stats;

use crate::AppState;
use axum::{Json, Router};
use serde::Serialize;

/// Response envelope shared by every data-carrying endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(stats::router())
        .merge(signals::router())
        .merge(performance::router())
        .merge(market::router())
        .merge(health::router())
}

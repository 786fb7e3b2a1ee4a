use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Engine error taxonomy.
///
/// Every fallible engine operation returns one of these; the API layer
/// maps them onto the `{success: false, error}` envelope.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A signal field violates its domain constraints.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown signal id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad query parameter or argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Illegal outcome change (signal already resolved, or target
    /// outcome is not win/loss).
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Scorer or market-data feed timed out or failed. Recoverable
    /// during resolution: the signal stays pending and is retried.
    #[error("external source unavailable: {0}")]
    ExternalUnavailable(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    fn status(&self) -> StatusCode {
        match self {
            EngineError::Validation(_) | EngineError::InvalidArgument(_) => {
                StatusCode::BAD_REQUEST
            }
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::InvalidTransition(_) => StatusCode::CONFLICT,
            EngineError::ExternalUnavailable(_) | EngineError::Reqwest(_) => {
                StatusCode::BAD_GATEWAY
            }
            EngineError::SerdeJson(_) | EngineError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            EngineError::Validation("bad pair".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngineError::InvalidArgument("limit".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngineError::NotFound("abc".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EngineError::InvalidTransition("already won".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EngineError::ExternalUnavailable("feed down".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_display_includes_detail() {
        let err = EngineError::NotFound("deadbeef".into());
        assert_eq!(err.to_string(), "not found: deadbeef");
    }
}

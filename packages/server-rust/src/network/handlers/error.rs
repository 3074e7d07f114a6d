//! Translation of foundation errors into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dmx_gatekeeper_core::{ErrorCategory, FoundationError};
use serde_json::json;

/// A foundation error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub FoundationError);

impl From<FoundationError> for ApiError {
    fn from(err: FoundationError) -> Self {
        Self(err)
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::DependencyValidation if self.0.is_not_found() => StatusCode::NOT_FOUND,
            ErrorCategory::DependencyValidation => StatusCode::BAD_REQUEST,
            ErrorCategory::Dependency | ErrorCategory::Service => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // The category message only; causes stay in the logs.
        let mut body = json!({
            "error": self.0.kind.to_string(),
            "category": self.0.category().as_str(),
        });
        if let Some(violations) = self.0.violations() {
            body["errors"] = json!(violations);
        }
        (status, Json(body)).into_response()
    }
}

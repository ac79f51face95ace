//! API error response type
//!
//! Shared axum error handling: domain errors map to `{"error": message}`
//! JSON bodies with the status code from the error taxonomy.

use crate::common::error::ActivosError;
use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Axum-facing wrapper for `ActivosError`
#[derive(Debug)]
pub struct AppError(pub ActivosError);

impl From<ActivosError> for AppError {
    fn from(err: ActivosError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        // Full detail stays in the server log; clients get the safe message
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let payload = json!({ "error": self.0.external_message() });
        (status, Json(payload)).into_response()
    }
}

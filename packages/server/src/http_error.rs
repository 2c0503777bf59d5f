//! HTTP error handling for the REST server
//!
//! Every failure leaves the server as a JSON body with an `error` message
//! and a machine-readable `code`; validation failures additionally list the
//! individual problems under `errors`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use neo4j_mcp_core::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// JSON error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpError {
    /// User-facing error message
    #[serde(rename = "error")]
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Individual validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl HttpError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            errors: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, "NOT_FOUND")
    }

    /// 400 carrying each failed rule
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            message: "Validation failed".to_string(),
            code: "VALIDATION_ERROR".to_string(),
            errors: Some(errors),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" | "INVALID_INPUT" | "CONSTRUCTION_ERROR" => StatusCode::BAD_REQUEST,
            "CONNECTION_FAILURE" => StatusCode::SERVICE_UNAVAILABLE,
            "STATE_ERROR" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {} ({}): {}", status, self.code, self.message);
        }
        (status, Json(self)).into_response()
    }
}

impl From<DatabaseError> for HttpError {
    fn from(err: DatabaseError) -> Self {
        HttpError::new(err.to_string(), err.kind().code())
    }
}

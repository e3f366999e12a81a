//! REST API error and payload helpers.
//!
//! Error payload shape is `{ "error": string, "details"?: [string] }`;
//! `details` is only populated for the CSV batch paths, which report every
//! offending row at once.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::{CsvError, ReferenceError, StoreError, ValidationError};

/// Page-size cap shared by the list endpoints.
pub const MAX_PAGE_SIZE: usize = 100;

// =============================================================================
// API Error
// =============================================================================

/// HTTP-facing error type.
///
/// Not-found storage outcomes map to 404; every other rejection is a
/// deterministic input problem and maps to 400.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was not parseable JSON.
    #[error("Invalid JSON body.")]
    InvalidJson,

    /// A bad request with a caller-facing message.
    #[error("{0}")]
    BadRequest(String),

    /// CSV failed to tokenize, or rows were malformed.
    #[error("Failed to parse CSV.")]
    CsvParse { details: Vec<String> },

    /// One or more CSV rows failed field validation.
    #[error("Validation failed for one or more rows.")]
    CsvRows { details: Vec<String> },

    /// A record failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An event cross-reference check failed.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The storage collaborator rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<CsvError> for ApiError {
    fn from(err: CsvError) -> Self {
        ApiError::CsvParse {
            details: vec![err.to_string()],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = match &self {
            ApiError::CsvParse { details } | ApiError::CsvRows { details } => {
                error_response_with_details(&self.to_string(), details)
            }
            _ => error_response(&self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Payload Helpers
// =============================================================================

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({ "error": error })
}

/// Create an error response body with per-row details.
pub fn error_response_with_details(error: &str, details: &[String]) -> Value {
    json!({ "error": error, "details": details })
}

/// Parse a request body as JSON, mapping failures to the canonical message.
pub fn parse_json(body: &str) -> ApiResult<Value> {
    serde_json::from_str(body).map_err(|_| ApiError::InvalidJson)
}

/// Coerce a numeric-looking query parameter, truncating toward zero.
/// Anything unusable is 0 rather than an error.
pub fn parse_numeric(value: Option<&str>) -> i64 {
    let Some(raw) = value else { return 0 };
    if raw.is_empty() {
        return 0;
    }
    match raw.trim().parse::<f64>() {
        Ok(numeric) if numeric.is_finite() => numeric.trunc() as i64,
        _ => 0,
    }
}

/// Clamp a page size: non-positive falls back to the endpoint default,
/// anything above [`MAX_PAGE_SIZE`] is capped.
pub fn clamp_page_size(value: i64, fallback: usize) -> usize {
    if value <= 0 {
        fallback
    } else {
        (value as usize).min(MAX_PAGE_SIZE)
    }
}

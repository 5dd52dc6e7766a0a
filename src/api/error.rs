//! API Errors
//!
//! Every failure is rendered as `{ "error", "code" }`, plus `invalidIds`
//! for per-element type violations.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("All ids must be valid numbers")]
    InvalidIds(Vec<Value>),
    #[error("selectedIds must be an array")]
    SelectedIdsNotArray,
    #[error("All selectedIds must be valid numbers")]
    InvalidSelectedIds(Vec<Value>),
    #[error("order must be an array")]
    OrderNotArray,
    #[error("All order ids must be valid numbers")]
    InvalidOrderIds(Vec<Value>),
    #[error("ids array cannot be empty")]
    EmptyArray,
    #[error("offset must be a non-negative number")]
    InvalidOffset,
    #[error("limit must be a number between 1 and 1000")]
    InvalidLimit,
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::InvalidIds(_) => "INVALID_IDS",
            ApiError::SelectedIdsNotArray | ApiError::InvalidSelectedIds(_) => {
                "INVALID_SELECTED_IDS"
            }
            ApiError::OrderNotArray => "INVALID_ORDER",
            ApiError::InvalidOrderIds(_) => "INVALID_ORDER_IDS",
            ApiError::EmptyArray => "EMPTY_ARRAY",
            ApiError::InvalidOffset => "INVALID_OFFSET",
            ApiError::InvalidLimit => "INVALID_LIMIT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> ErrorBody<'_> {
        let error = match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            error,
            code: self.code(),
            invalid_ids: self.invalid_ids(),
        }
    }

    fn invalid_ids(&self) -> Option<&[Value]> {
        match self {
            ApiError::InvalidIds(ids)
            | ApiError::InvalidSelectedIds(ids)
            | ApiError::InvalidOrderIds(ids) => Some(ids),
            _ => None,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    invalid_ids: Option<&'a [Value]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!("Internal error: {}", detail);
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_of(err: ApiError) -> Value {
        serde_json::to_value(err.body()).unwrap()
    }

    #[test]
    fn test_codes_and_status() {
        assert_eq!(ApiError::EmptyArray.code(), "EMPTY_ARRAY");
        assert_eq!(ApiError::OrderNotArray.code(), "INVALID_ORDER");
        assert_eq!(ApiError::SelectedIdsNotArray.code(), "INVALID_SELECTED_IDS");
        assert_eq!(ApiError::InvalidLimit.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_ids_listed() {
        let body = body_of(ApiError::InvalidIds(vec![json!("x"), json!(null)]));
        assert_eq!(
            body,
            json!({
                "error": "All ids must be valid numbers",
                "code": "INVALID_IDS",
                "invalidIds": ["x", null]
            })
        );
    }

    #[test]
    fn test_internal_detail_hidden() {
        let body = body_of(ApiError::Internal("lock poisoned".into()));
        assert_eq!(body, json!({ "error": "Internal server error", "code": "INTERNAL_ERROR" }));
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: ApiError = DomainError::InvalidInput("bad size".into()).into();
        assert_eq!(err.code(), "INVALID_INPUT");
    }
}

//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::AnalysisError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    /// Underlying failure detail; present only in debug mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Missing or invalid X-User-Id header")]
    MissingOwner,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Could not extract enough text from document")]
    InsufficientText,
    #[error("AI analysis failed")]
    AnalysisFailed { detail: Option<String> },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map a pipeline failure to its API shape. `debug` gates whether the
    /// underlying detail is exposed to the caller.
    pub fn from_analysis(e: AnalysisError, debug: bool) -> Self {
        match e {
            AnalysisError::InsufficientText { .. } => ApiError::InsufficientText,
            AnalysisError::Database(db) => ApiError::Internal(db.to_string()),
            other => ApiError::AnalysisFailed {
                detail: debug.then(|| other.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message, None)
            }
            ApiError::MissingOwner => (
                StatusCode::BAD_REQUEST,
                "MISSING_OWNER",
                "Missing or invalid X-User-Id header".to_string(),
                None,
            ),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, "FORBIDDEN", message, None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
            ApiError::InsufficientText => (
                StatusCode::BAD_REQUEST,
                "INSUFFICIENT_TEXT",
                "Could not extract enough text from document.".to_string(),
                None,
            ),
            ApiError::AnalysisFailed { detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ANALYSIS_FAILED",
                "AI analysis failed. Check server logs for details.".to_string(),
                detail,
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                detail,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::InferenceError;

    #[test]
    fn insufficient_text_maps_to_400() {
        let err = ApiError::from_analysis(AnalysisError::InsufficientText { extracted: 12 }, false);
        assert!(matches!(err, ApiError::InsufficientText));
    }

    #[test]
    fn analysis_detail_hidden_without_debug() {
        let err = ApiError::from_analysis(
            AnalysisError::Inference(InferenceError::Provider {
                status: 429,
                body: "quota".into(),
            }),
            false,
        );
        match err {
            ApiError::AnalysisFailed { detail } => assert!(detail.is_none()),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn analysis_detail_shown_in_debug() {
        let err = ApiError::from_analysis(
            AnalysisError::JsonParsing("expected value at line 1".into()),
            true,
        );
        match err {
            ApiError::AnalysisFailed { detail } => {
                assert!(detail.unwrap().contains("expected value"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}

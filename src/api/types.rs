//! Shared types for the API layer.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::pipeline::{GeminiClient, InferenceClient};

/// Shared context for all API routes: configuration, storage paths, and
/// the injected inference provider (swapped for a mock in tests).
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub db_path: PathBuf,
    pub uploads_dir: PathBuf,
    pub inference: Arc<dyn InferenceClient>,
}

impl ApiContext {
    /// Production context with a real Gemini client, constructed once.
    pub fn new(config: AppConfig) -> Self {
        let inference = Arc::new(GeminiClient::new(
            &config.gemini_base_url,
            &config.gemini_api_key,
            config.inference_timeout_secs,
        ));
        Self::with_inference(config, inference)
    }

    /// Context with an explicit inference provider.
    pub fn with_inference(config: AppConfig, inference: Arc<dyn InferenceClient>) -> Self {
        let db_path = config.database_path();
        let uploads_dir = config.uploads_dir();
        Self {
            config: Arc::new(config),
            db_path,
            uploads_dir,
            inference,
        }
    }
}

/// Owner identity delivered by the upstream authentication layer as an
/// `X-User-Id` header. This service trusts it; it performs no auth itself.
pub fn owner_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(ApiError::MissingOwner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn owner_id_parses_valid_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(owner_id(&headers).unwrap(), id);
    }

    #[test]
    fn missing_header_rejected() {
        assert!(matches!(
            owner_id(&HeaderMap::new()),
            Err(ApiError::MissingOwner)
        ));
    }

    #[test]
    fn malformed_header_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(owner_id(&headers), Err(ApiError::MissingOwner)));
    }
}

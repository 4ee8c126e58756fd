//! Gemini REST client behind an object-safe trait, so the pipeline can be
//! exercised with a mock provider in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("cannot reach inference provider at {0}")]
    Connection(String),

    #[error("inference provider returned error (status {status}): {body}")]
    Provider { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("model returned no candidates")]
    EmptyResponse,

    #[error("response decoding error: {0}")]
    ResponseDecoding(String),
}

/// Inference provider boundary: model discovery + one-shot generation.
pub trait InferenceClient: Send + Sync {
    /// Identifiers of models that support content generation.
    fn list_generation_models(&self) -> Result<Vec<String>, InferenceError>;

    /// Submit a prompt to the given model and return its raw text reply.
    fn generate(&self, model: &str, prompt: &str) -> Result<String, InferenceError>;
}

/// Blocking HTTP client for the Gemini REST API.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_connect() {
            InferenceError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            InferenceError::HttpClient(format!(
                "Request timed out after {}s",
                self.timeout_secs
            ))
        } else {
            InferenceError::HttpClient(e.to_string())
        }
    }
}

// ── Wire types ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Asks the provider to reply with a JSON-typed payload. Reduces, but
/// does not eliminate, Markdown-fenced output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl InferenceClient for GeminiClient {
    fn list_generation_models(&self) -> Result<Vec<String>, InferenceError> {
        let url = format!("{}/v1beta/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ListModelsResponse = response
            .json()
            .map_err(|e| InferenceError::ResponseDecoding(e.to_string()))?;

        Ok(parsed
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| m.name)
            .collect())
    }

    fn generate(&self, model: &str, prompt: &str) -> Result<String, InferenceError> {
        let url = format!("{}/v1beta/{}:generateContent", self.base_url, model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| InferenceError::ResponseDecoding(e.to_string()))?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(InferenceError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Mock provider for tests — configurable reply, model list, and failure
/// modes, with a shared call counter so tests can assert that no inference
/// call happened.
pub struct MockInferenceClient {
    response: Result<String, String>,
    models: Result<Vec<String>, String>,
    generate_calls: Arc<AtomicUsize>,
}

impl MockInferenceClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            models: Ok(vec!["models/gemini-2.0-flash".to_string()]),
            generate_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = Ok(models);
        self
    }

    pub fn failing_discovery(mut self, message: &str) -> Self {
        self.models = Err(message.to_string());
        self
    }

    pub fn failing_generate(mut self, message: &str) -> Self {
        self.response = Err(message.to_string());
        self
    }

    /// Handle to the generate-call counter; clone before moving the
    /// client into the pipeline.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.generate_calls)
    }
}

impl InferenceClient for MockInferenceClient {
    fn list_generation_models(&self) -> Result<Vec<String>, InferenceError> {
        match &self.models {
            Ok(models) => Ok(models.clone()),
            Err(message) => Err(InferenceError::Provider {
                status: 503,
                body: message.clone(),
            }),
        }
    }

    fn generate(&self, _model: &str, _prompt: &str) -> Result<String, InferenceError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(InferenceError::Provider {
                status: 500,
                body: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let client = MockInferenceClient::new("{\"a\":1}");
        assert_eq!(client.generate("m", "p").unwrap(), "{\"a\":1}");
        assert_eq!(client.call_counter().load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mock_failing_generate_counts_the_call() {
        let client = MockInferenceClient::new("").failing_generate("quota exceeded");
        let counter = client.call_counter();
        assert!(client.generate("m", "p").is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mock_lists_models() {
        let client =
            MockInferenceClient::new("").with_models(vec!["models/gemini-pro".to_string()]);
        assert_eq!(
            client.list_generation_models().unwrap(),
            vec!["models/gemini-pro".to_string()]
        );
    }

    #[test]
    fn gemini_client_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:9999/", "key", 30);
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}

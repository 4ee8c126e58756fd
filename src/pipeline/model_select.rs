//! Dynamic model selection with a three-tier fallback.
//!
//! Model availability varies per API key and region, so the pipeline must
//! never fail solely because of model discovery: ranked preference →
//! first available → hard-coded fallback.

use super::gemini::InferenceClient;

/// Preferred Gemini models in order of preference.
const MODEL_PREFERENCES: &[&str] = &[
    "models/gemini-2.0-flash",
    "models/gemini-1.5-flash",
    "models/gemini-2.0-flash-exp",
    "models/gemini-pro",
    "models/gemini-flash-latest",
];

/// Used when discovery fails or returns nothing.
pub const FALLBACK_MODEL: &str = "models/gemini-1.5-flash";

/// Pick the best available model. Infallible by contract.
pub fn select_model(client: &dyn InferenceClient) -> String {
    match client.list_generation_models() {
        Ok(available) if !available.is_empty() => {
            for preferred in MODEL_PREFERENCES {
                if available.iter().any(|m| m == preferred) {
                    return (*preferred).to_string();
                }
            }
            available[0].clone()
        }
        Ok(_) => {
            tracing::warn!("model discovery returned no generation-capable models, using fallback");
            FALLBACK_MODEL.to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "model discovery failed, using fallback");
            FALLBACK_MODEL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::gemini::MockInferenceClient;

    #[test]
    fn prefers_highest_ranked_available() {
        let client = MockInferenceClient::new("").with_models(vec![
            "models/gemini-pro".to_string(),
            "models/gemini-1.5-flash".to_string(),
        ]);
        assert_eq!(select_model(&client), "models/gemini-1.5-flash");
    }

    #[test]
    fn preference_order_is_not_list_order() {
        let client = MockInferenceClient::new("").with_models(vec![
            "models/gemini-flash-latest".to_string(),
            "models/gemini-2.0-flash".to_string(),
        ]);
        assert_eq!(select_model(&client), "models/gemini-2.0-flash");
    }

    #[test]
    fn falls_back_to_first_available_when_no_preference_matches() {
        let client = MockInferenceClient::new("").with_models(vec![
            "models/gemini-exotic-a".to_string(),
            "models/gemini-exotic-b".to_string(),
        ]);
        assert_eq!(select_model(&client), "models/gemini-exotic-a");
    }

    #[test]
    fn empty_discovery_uses_hard_fallback() {
        let client = MockInferenceClient::new("").with_models(vec![]);
        assert_eq!(select_model(&client), FALLBACK_MODEL);
    }

    #[test]
    fn discovery_error_uses_hard_fallback() {
        let client = MockInferenceClient::new("").failing_discovery("network unreachable");
        assert_eq!(select_model(&client), FALLBACK_MODEL);
    }
}

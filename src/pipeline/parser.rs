//! Parse the model's raw reply into a typed analysis result.
//!
//! Providers sometimes wrap JSON in Markdown fences despite the JSON
//! response hint, so fences are stripped first. Missing top-level keys
//! default; malformed JSON is a hard error so the orchestrator can fail
//! the document. The nested `analysis_data` shape is deliberately not
//! validated and passes through untouched.

use serde::Deserialize;

use super::AnalysisError;
use crate::models::enums::RiskLevel;

/// Decoded model output, before it is written onto a Document.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub document_type: String,
    pub overall_risk_score: i64,
    pub risk_level: RiskLevel,
    pub analysis_data: serde_json::Value,
}

#[derive(Deserialize)]
struct RawAnalysis {
    document_type: Option<String>,
    overall_risk_score: Option<i64>,
    risk_level: Option<String>,
    analysis_data: Option<serde_json::Value>,
}

pub fn parse_analysis_response(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let cleaned = strip_code_fences(raw.trim());
    if cleaned.is_empty() {
        return Err(AnalysisError::MalformedResponse("empty response".into()));
    }

    let parsed: RawAnalysis = serde_json::from_str(&cleaned)
        .map_err(|e| AnalysisError::JsonParsing(e.to_string()))?;

    Ok(AnalysisResult {
        document_type: parsed.document_type.unwrap_or_else(|| "Unknown".into()),
        overall_risk_score: parsed.overall_risk_score.unwrap_or(0),
        risk_level: parsed
            .risk_level
            .map(|s| RiskLevel::from_model_output(&s))
            .unwrap_or(RiskLevel::Medium),
        analysis_data: parsed
            .analysis_data
            .unwrap_or_else(|| serde_json::json!({})),
    })
}

/// Strip exactly one leading and, when present, one trailing Markdown
/// fence line. Text without a leading fence is returned unchanged.
fn strip_code_fences(text: &str) -> String {
    if !text.starts_with("```") {
        return text.to_string();
    }

    let mut lines: Vec<&str> = text.lines().collect();
    lines.remove(0);
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.last().is_some_and(|l| l.trim_start().starts_with("```")) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_json_parses_unchanged() {
        let result = parse_analysis_response(
            r#"{"document_type":"NDA","overall_risk_score":85,"risk_level":"High","analysis_data":{"missing_clauses":["Indemnification"]}}"#,
        )
        .unwrap();
        assert_eq!(result.document_type, "NDA");
        assert_eq!(result.overall_risk_score, 85);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(
            result.analysis_data["missing_clauses"][0],
            "Indemnification"
        );
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let result =
            parse_analysis_response("```json\n{\"overall_risk_score\": 40}\n```").unwrap();
        assert_eq!(result.overall_risk_score, 40);
    }

    #[test]
    fn fence_stripping_matches_known_example() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn fence_without_closing_line_still_parses() {
        let result = parse_analysis_response("```json\n{\"overall_risk_score\": 10}").unwrap();
        assert_eq!(result.overall_risk_score, 10);
    }

    #[test]
    fn stripping_is_idempotent_on_clean_json() {
        let clean = "{\"a\":1}";
        assert_eq!(strip_code_fences(clean), clean);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let result = parse_analysis_response("{}").unwrap();
        assert_eq!(result.document_type, "Unknown");
        assert_eq!(result.overall_risk_score, 0);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.analysis_data, serde_json::json!({}));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            parse_analysis_response("not json"),
            Err(AnalysisError::JsonParsing(_))
        ));
    }

    #[test]
    fn empty_response_is_malformed() {
        assert!(matches!(
            parse_analysis_response("   "),
            Err(AnalysisError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_analysis_response("```json\n```"),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn unknown_risk_level_degrades_to_medium() {
        let result =
            parse_analysis_response(r#"{"risk_level": "catastrophic"}"#).unwrap();
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn nested_payload_passes_through_unvalidated() {
        // Out-of-range scores and unexpected nested shapes are kept as-is
        let result = parse_analysis_response(
            r#"{"analysis_data": {"risk_assessment": {"financial_risk": 900}, "stray": true}}"#,
        )
        .unwrap();
        assert_eq!(result.analysis_data["risk_assessment"]["financial_risk"], 900);
        assert_eq!(result.analysis_data["stray"], true);
    }
}

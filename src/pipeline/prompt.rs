//! Prompt construction for the legal risk analysis request.

/// Hard cap on the document excerpt included in the prompt. Text beyond
/// this is dropped, not summarized — a deliberate accuracy/cost tradeoff.
pub const MAX_DOCUMENT_CHARS: usize = 30_000;

/// Version tag for the output schema below. Bump when the schema changes
/// so stored `analysis_data` payloads can be told apart.
pub const ANALYSIS_SCHEMA_VERSION: &str = "v1";

/// The literal output schema the model must follow.
const ANALYSIS_SCHEMA: &str = r#"{
    "document_type": "string (e.g. Commercial Lease, NDA, Employment Contract)",
    "overall_risk_score": "integer (0-100, where 100 is highest risk)",
    "risk_level": "string (High, Medium, or Low)",
    "analysis_data": {
        "risk_assessment": {
            "financial_risk": "integer (0-100)",
            "legal_liability_risk": "integer (0-100)",
            "compliance_risk": "integer (0-100)",
            "ambiguity_risk": "integer (0-100)"
        },
        "missing_clauses": [
            "string (List critical standard clauses that are completely missing)"
        ],
        "legal_threats": [
            "string (List highly dangerous or unbalanced clauses present)"
        ],
        "clause_breakdown": [
            {
                "clause_name": "string (e.g. Payment Terms, Liability, Termination)",
                "status": "string (Present, Missing, or Weak)",
                "risk_rating": "string (High, Medium, or Low)",
                "comments": "string (Detailed explanation of why this clause is risky or standard)"
            }
        ],
        "ai_insights": {
            "suggested_improvements": [
                "string (Actionable steps to fix the document)"
            ],
            "recommended_additions": [
                "string (Specific clauses that should be added)"
            ],
            "risk_explanation_summary": "string (A 2-3 sentence overarching summary of the major risks)",
            "plain_language_explanation": "string (A strictly plain-english, non-legal translation of what the most dangerous parts of this contract mean for a layperson)"
        }
    }
}"#;

/// Render the full inference prompt: schema description plus the document
/// excerpt, truncated to [`MAX_DOCUMENT_CHARS`].
pub fn build_analysis_prompt(document_text: &str) -> String {
    let excerpt: String = document_text.chars().take(MAX_DOCUMENT_CHARS).collect();

    format!(
        r#"You are an expert AI Legal Document Analyzer.
Analyze the following legal document text and return a strict JSON object matching the schema below.

SCHEMA ({ANALYSIS_SCHEMA_VERSION}):
{ANALYSIS_SCHEMA}

DOCUMENT TEXT TO ANALYZE:
{excerpt}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_schema_and_document() {
        let prompt = build_analysis_prompt("This agreement is made between Landlord and Tenant.");
        assert!(prompt.contains("overall_risk_score"));
        assert!(prompt.contains("clause_breakdown"));
        assert!(prompt.contains("ai_insights"));
        assert!(prompt.contains(ANALYSIS_SCHEMA_VERSION));
        assert!(prompt.contains("Landlord and Tenant"));
    }

    fn excerpt_of(prompt: &str) -> &str {
        prompt
            .split("DOCUMENT TEXT TO ANALYZE:\n")
            .nth(1)
            .expect("prompt has a document section")
    }

    #[test]
    fn document_text_is_hard_capped() {
        let long_text = "a".repeat(MAX_DOCUMENT_CHARS + 5_000);
        let prompt = build_analysis_prompt(&long_text);
        assert_eq!(excerpt_of(&prompt).chars().count(), MAX_DOCUMENT_CHARS);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        // Multi-byte chars must not panic or split
        let text = "é".repeat(MAX_DOCUMENT_CHARS + 100);
        let prompt = build_analysis_prompt(&text);
        assert_eq!(excerpt_of(&prompt).chars().count(), MAX_DOCUMENT_CHARS);
    }

    #[test]
    fn short_text_is_untouched() {
        let prompt = build_analysis_prompt("short clause");
        assert!(prompt.ends_with("short clause"));
    }
}

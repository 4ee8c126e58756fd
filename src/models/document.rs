use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DocumentStatus, RiskLevel};

/// A single uploaded legal document and its analysis outcome.
///
/// Created in `processing`; exactly one terminal transition to
/// `completed` or `failed`. The analysis fields are populated only
/// on the `completed` path and stay NULL otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_name: String,
    /// Stored file reference under the uploads directory.
    pub file_path: Option<String>,
    pub created_at: NaiveDateTime,
    pub status: DocumentStatus,
    pub document_type: Option<String>,
    pub overall_risk_score: Option<i64>,
    pub risk_level: Option<RiskLevel>,
    /// Nested analysis payload (risk sub-scores, missing clauses, legal
    /// threats, clause breakdown, AI insights). Stored as-is from the model.
    pub analysis_data: Option<serde_json::Value>,
}

impl Document {
    /// Fresh document in its initial state, before the pipeline runs.
    pub fn new(owner_id: Uuid, file_name: String, file_path: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            file_name,
            file_path,
            created_at: chrono::Utc::now().naive_utc(),
            status: DocumentStatus::Processing,
            document_type: None,
            overall_risk_score: None,
            risk_level: None,
            analysis_data: None,
        }
    }
}

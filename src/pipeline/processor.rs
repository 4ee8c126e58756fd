//! Analysis orchestrator and document status machine.
//!
//! Drives upload → extract → select model → prompt → inference → parse →
//! persist. Exactly one `documents` row is created per upload attempt;
//! failed attempts stay recorded for audit. A document enters `processing`
//! on creation and transitions exactly once to `completed` or `failed`.

use std::io::{Read, Seek};
use std::sync::Arc;

use rusqlite::Connection;
use uuid::Uuid;

use super::extraction;
use super::gemini::InferenceClient;
use super::model_select::select_model;
use super::parser::{parse_analysis_response, AnalysisResult};
use super::prompt::build_analysis_prompt;
use super::AnalysisError;
use crate::db::{repository, DatabaseError};
use crate::models::Document;

/// Minimum extracted-text length for an analysis to be attempted.
const MIN_TEXT_CHARS: usize = 50;

/// Identity of an upload, supplied by the transport layer.
#[derive(Debug, Clone)]
pub struct UploadMeta {
    pub owner_id: Uuid,
    pub file_name: String,
    /// Stored file reference, if the blob was persisted.
    pub file_path: Option<String>,
}

/// One-shot, synchronous analysis pipeline over an injected inference
/// provider. No retries, no background dispatch.
pub struct DocumentAnalyzer {
    client: Arc<dyn InferenceClient>,
}

impl DocumentAnalyzer {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    /// Run the full pipeline for one uploaded blob.
    ///
    /// On failure the created document row is left behind in `failed`
    /// state and the error describes why; the caller maps it to a
    /// response. The stream is rewound by extraction, so it can still
    /// be persisted afterwards.
    pub fn analyze_upload<R: Read + Seek>(
        &self,
        conn: &Connection,
        upload: UploadMeta,
        stream: &mut R,
    ) -> Result<Document, AnalysisError> {
        let doc = Document::new(upload.owner_id, upload.file_name, upload.file_path);
        repository::insert_document(conn, &doc)?;
        tracing::info!(document_id = %doc.id, file_name = %doc.file_name, "analysis started");

        let text = extraction::extract_text(stream, &doc.file_name);
        if text.trim().is_empty() || text.chars().count() < MIN_TEXT_CHARS {
            repository::mark_document_failed(conn, &doc.id)?;
            let extracted = text.chars().count();
            tracing::warn!(document_id = %doc.id, extracted, "insufficient text extracted");
            return Err(AnalysisError::InsufficientText { extracted });
        }

        match self.run_inference(&text) {
            Ok(result) => {
                repository::complete_document(
                    conn,
                    &doc.id,
                    &result.document_type,
                    result.overall_risk_score,
                    result.risk_level,
                    &result.analysis_data,
                )?;
                tracing::info!(
                    document_id = %doc.id,
                    document_type = %result.document_type,
                    risk_score = result.overall_risk_score,
                    "analysis completed"
                );
                repository::get_document(conn, &doc.id)?.ok_or_else(|| {
                    AnalysisError::Database(DatabaseError::NotFound {
                        entity_type: "Document".into(),
                        id: doc.id.to_string(),
                    })
                })
            }
            Err(e) => {
                tracing::error!(
                    document_id = %doc.id,
                    error_type = error_type(&e),
                    error = %e,
                    "analysis failed"
                );
                repository::mark_document_failed(conn, &doc.id)?;
                Err(e)
            }
        }
    }

    /// Everything past extraction, behind a single error boundary.
    fn run_inference(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let model = select_model(self.client.as_ref());
        tracing::info!(model, "selected inference model");

        let prompt = build_analysis_prompt(text);
        let response = self.client.generate(&model, &prompt)?;
        parse_analysis_response(&response)
    }
}

fn error_type(e: &AnalysisError) -> &'static str {
    match e {
        AnalysisError::InsufficientText { .. } => "InsufficientText",
        AnalysisError::Inference(_) => "Inference",
        AnalysisError::MalformedResponse(_) => "MalformedResponse",
        AnalysisError::JsonParsing(_) => "JsonParsing",
        AnalysisError::Database(_) => "Database",
    }
}

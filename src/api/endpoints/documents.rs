//! Document endpoints: upload (runs the analysis pipeline synchronously),
//! list, detail, and dashboard stats.

use std::io::Cursor;
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{owner_id, ApiContext};
use crate::db::repository::{self, DocumentStats};
use crate::db::sqlite::open_database;
use crate::models::Document;
use crate::pipeline::{AnalysisError, DocumentAnalyzer, UploadMeta};

/// `POST /api/documents/upload` — receive a file, run the pipeline, and
/// return the persisted document (201) or the failure taxonomy.
///
/// The whole analysis runs inline on this request: one synchronous
/// attempt, no background queue. A slow provider blocks the request up
/// to the configured inference timeout.
pub async fn upload(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let owner = owner_id(&headers)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file field: {e}")))?;
            file = Some((file_name, bytes.to_vec()));
        }
    }
    let (file_name, bytes) = file.ok_or_else(|| ApiError::BadRequest("No file uploaded".into()))?;

    // Persist the blob before analysis so failed attempts keep their source
    std::fs::create_dir_all(&ctx.uploads_dir)
        .map_err(|e| ApiError::Internal(format!("Uploads directory: {e}")))?;
    let stored_name = format!("{}_{}", Uuid::new_v4(), base_name(&file_name));
    std::fs::write(ctx.uploads_dir.join(&stored_name), &bytes)
        .map_err(|e| ApiError::Internal(format!("Failed to store upload: {e}")))?;

    let debug = ctx.config.debug;
    let db_path = ctx.db_path.clone();
    let inference = Arc::clone(&ctx.inference);
    let meta = UploadMeta {
        owner_id: owner,
        file_name,
        file_path: Some(stored_name),
    };

    // Blocking section: SQLite + the inference HTTP call
    let result = tokio::task::spawn_blocking(move || {
        let conn = open_database(&db_path).map_err(AnalysisError::Database)?;
        let analyzer = DocumentAnalyzer::new(inference);
        let mut stream = Cursor::new(bytes);
        analyzer.analyze_upload(&conn, meta, &mut stream)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Analysis task failed: {e}")))?;

    match result {
        Ok(doc) => Ok((StatusCode::CREATED, Json(doc))),
        Err(e) => Err(ApiError::from_analysis(e, debug)),
    }
}

/// `GET /api/documents` — caller's documents, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<Vec<Document>>, ApiError> {
    let owner = owner_id(&headers)?;
    let conn = open_database(&ctx.db_path).map_err(|e| ApiError::Internal(e.to_string()))?;
    let docs =
        repository::list_documents(&conn, &owner).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(docs))
}

/// `GET /api/documents/{id}` — single document. 404 for unknown ids,
/// 403 when it belongs to someone else (the distinction is deliberate).
pub async fn detail(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let owner = owner_id(&headers)?;
    let conn = open_database(&ctx.db_path).map_err(|e| ApiError::Internal(e.to_string()))?;

    let doc = repository::get_document(&conn, &id)
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Document {id}")))?;

    if doc.owner_id != owner {
        return Err(ApiError::Forbidden(
            "You do not have permission to access this document.".into(),
        ));
    }
    Ok(Json(doc))
}

/// `GET /api/documents/stats` — dashboard counters for the caller.
pub async fn stats(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<DocumentStats>, ApiError> {
    let owner = owner_id(&headers)?;
    let conn = open_database(&ctx.db_path).map_err(|e| ApiError::Internal(e.to_string()))?;
    let stats =
        repository::document_stats(&conn, &owner).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(stats))
}

/// Strip any path components a client might smuggle into the filename.
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("upload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_path_components() {
        assert_eq!(base_name("lease.pdf"), "lease.pdf");
        assert_eq!(base_name("/etc/passwd"), "passwd");
        assert_eq!(base_name("..\\..\\evil.docx"), "evil.docx");
        assert_eq!(base_name(""), "upload");
    }
}

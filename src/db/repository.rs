use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use serde::Serialize;
use uuid::Uuid;

use super::DatabaseError;
use crate::models::enums::{DocumentStatus, RiskLevel};
use crate::models::Document;

// ═══════════════════════════════════════════
// Document Repository
// ═══════════════════════════════════════════

pub fn insert_document(conn: &Connection, doc: &Document) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO documents (id, owner_id, file_name, file_path, created_at, status,
         document_type, overall_risk_score, risk_level, analysis_data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            doc.id.to_string(),
            doc.owner_id.to_string(),
            doc.file_name,
            doc.file_path,
            doc.created_at.to_string(),
            doc.status.as_str(),
            doc.document_type,
            doc.overall_risk_score,
            doc.risk_level.map(|r| r.as_str()),
            doc.analysis_data
                .as_ref()
                .map(|v| serde_json::to_string(v).unwrap_or_default()),
        ],
    )?;
    Ok(())
}

pub fn get_document(conn: &Connection, id: &Uuid) -> Result<Option<Document>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, file_name, file_path, created_at, status,
         document_type, overall_risk_score, risk_level, analysis_data
         FROM documents WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], row_to_document_row);

    match result {
        Ok(row) => Ok(Some(document_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All documents belonging to one owner, newest first.
pub fn list_documents(conn: &Connection, owner_id: &Uuid) -> Result<Vec<Document>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, file_name, file_path, created_at, status,
         document_type, overall_risk_score, risk_level, analysis_data
         FROM documents WHERE owner_id = ?1 ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map(params![owner_id.to_string()], row_to_document_row)?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(document_from_row(row?)?);
    }
    Ok(documents)
}

/// Terminal transition to `failed`. Analysis fields stay NULL.
pub fn mark_document_failed(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE documents SET status = ?1 WHERE id = ?2",
        params![DocumentStatus::Failed.as_str(), id.to_string()],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Document".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Terminal transition to `completed`, writing the analysis fields
/// in the same statement so a completed row is never half-populated.
pub fn complete_document(
    conn: &Connection,
    id: &Uuid,
    document_type: &str,
    overall_risk_score: i64,
    risk_level: RiskLevel,
    analysis_data: &serde_json::Value,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE documents SET status = ?1, document_type = ?2, overall_risk_score = ?3,
         risk_level = ?4, analysis_data = ?5 WHERE id = ?6",
        params![
            DocumentStatus::Completed.as_str(),
            document_type,
            overall_risk_score,
            risk_level.as_str(),
            serde_json::to_string(analysis_data).unwrap_or_else(|_| "{}".into()),
            id.to_string(),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Document".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Dashboard counters for one owner.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    /// All documents ever uploaded by this owner.
    pub total: i64,
    /// Completed within the last 24 hours.
    pub processed: i64,
    /// Documents with overall_risk_score above 70.
    pub risk_alerts: i64,
    /// Still in `processing`.
    pub pending: i64,
}

pub fn document_stats(conn: &Connection, owner_id: &Uuid) -> Result<DocumentStats, DatabaseError> {
    let owner = owner_id.to_string();

    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE owner_id = ?1",
        params![owner],
        |row| row.get(0),
    )?;

    let processed: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE owner_id = ?1 AND status = 'completed'
         AND created_at >= datetime('now', '-1 day')",
        params![owner],
        |row| row.get(0),
    )?;

    let risk_alerts: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE owner_id = ?1 AND overall_risk_score > 70",
        params![owner],
        |row| row.get(0),
    )?;

    let pending: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE owner_id = ?1 AND status = 'processing'",
        params![owner],
        |row| row.get(0),
    )?;

    Ok(DocumentStats {
        total,
        processed,
        risk_alerts,
        pending,
    })
}

// ═══════════════════════════════════════════
// Row mapping
// ═══════════════════════════════════════════

struct DocumentRow {
    id: String,
    owner_id: String,
    file_name: String,
    file_path: Option<String>,
    created_at: String,
    status: String,
    document_type: Option<String>,
    overall_risk_score: Option<i64>,
    risk_level: Option<String>,
    analysis_data: Option<String>,
}

fn row_to_document_row(row: &rusqlite::Row<'_>) -> Result<DocumentRow, rusqlite::Error> {
    Ok(DocumentRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        file_name: row.get(2)?,
        file_path: row.get(3)?,
        created_at: row.get(4)?,
        status: row.get(5)?,
        document_type: row.get(6)?,
        overall_risk_score: row.get(7)?,
        risk_level: row.get(8)?,
        analysis_data: row.get(9)?,
    })
}

fn document_from_row(row: DocumentRow) -> Result<Document, DatabaseError> {
    let risk_level = match row.risk_level {
        Some(s) => Some(RiskLevel::from_str(&s)?),
        None => None,
    };

    let analysis_data = match row.analysis_data {
        Some(s) => Some(serde_json::from_str(&s).map_err(|e| DatabaseError::InvalidJson {
            column: "analysis_data".into(),
            reason: e.to_string(),
        })?),
        None => None,
    };

    Ok(Document {
        id: Uuid::parse_str(&row.id).map_err(|_| DatabaseError::InvalidEnum {
            field: "id".into(),
            value: row.id,
        })?,
        owner_id: Uuid::parse_str(&row.owner_id).map_err(|_| DatabaseError::InvalidEnum {
            field: "owner_id".into(),
            value: row.owner_id,
        })?,
        file_name: row.file_name,
        file_path: row.file_path,
        created_at: NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S%.f")
            .map_err(|_| DatabaseError::InvalidEnum {
                field: "created_at".into(),
                value: row.created_at,
            })?,
        status: DocumentStatus::from_str(&row.status)?,
        document_type: row.document_type,
        overall_risk_score: row.overall_risk_score,
        risk_level,
        analysis_data,
    })
}

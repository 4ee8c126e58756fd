//! Plain-text extraction from uploaded document blobs.
//!
//! Dispatch is by lower-cased file extension. Extraction failure is a soft
//! condition: every per-format error is logged and degrades to empty text,
//! and the orchestrator decides whether the result is sufficient. The
//! stream's read position is restored to the start on return so the caller
//! can re-read the same blob afterwards.

pub mod docx;
pub mod pdf;

use std::io::{Read, Seek, SeekFrom};

use thiserror::Error;

/// Internal per-format failures. Never escape [`extract_text`].
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("text decoding error: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract plain text from a document blob, dispatching on the declared
/// filename's extension. Unsupported extensions yield empty text.
pub fn extract_text<R: Read + Seek>(stream: &mut R, file_name: &str) -> String {
    let text = match read_and_extract(stream, file_name) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(file_name, error = %e, "text extraction failed, treating as empty");
            String::new()
        }
    };

    // Rewind so the caller can re-read the blob (e.g. to persist it).
    if let Err(e) = stream.seek(SeekFrom::Start(0)) {
        tracing::warn!(file_name, error = %e, "failed to rewind upload stream");
    }

    text
}

fn read_and_extract<R: Read>(stream: &mut R, file_name: &str) -> Result<String, ExtractionError> {
    match file_extension(file_name).as_str() {
        "pdf" => {
            let bytes = read_all(stream)?;
            pdf::extract(&bytes)
        }
        "docx" | "doc" => {
            let bytes = read_all(stream)?;
            docx::extract(&bytes)
        }
        "txt" => {
            let bytes = read_all(stream)?;
            String::from_utf8(bytes).map_err(|e| ExtractionError::Encoding(e.to_string()))
        }
        other => {
            tracing::debug!(file_name, extension = other, "unsupported extension, no text");
            Ok(String::new())
        }
    }
}

/// Everything after the last dot, lower-cased. A filename without a dot
/// yields the whole name, which then falls into the unsupported branch.
fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn read_all<R: Read>(stream: &mut R) -> Result<Vec<u8>, ExtractionError> {
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(bytes)
}

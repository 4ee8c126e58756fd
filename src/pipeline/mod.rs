pub mod extraction;
pub mod gemini;
pub mod model_select;
pub mod parser;
pub mod processor;
pub mod prompt;

pub use gemini::{GeminiClient, InferenceClient, InferenceError, MockInferenceClient};
pub use model_select::select_model;
pub use parser::{parse_analysis_response, AnalysisResult};
pub use processor::{DocumentAnalyzer, UploadMeta};
pub use prompt::build_analysis_prompt;

use thiserror::Error;

use crate::db::DatabaseError;

/// Pipeline failure taxonomy. `InsufficientText` is user-correctable;
/// everything else surfaces as a generic analysis failure at the API
/// boundary, with detail exposed only in debug mode.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("could not extract enough text from document ({extracted} characters)")]
    InsufficientText { extracted: usize },

    #[error("inference request failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

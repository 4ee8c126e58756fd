//! Lexiguard — legal document risk analysis service.
//!
//! Documents come in over HTTP, text is extracted, a Gemini model scores
//! the legal risk, and the verdict is persisted to SQLite. Each upload is
//! one analysis attempt with exactly one terminal outcome, kept for audit.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

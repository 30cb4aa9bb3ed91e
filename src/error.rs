//! Error types for report generation, persistence and rendering.
//!
//! Submission and report building never fail; everything that can go wrong
//! lives at the edges (file I/O, format selection, configuration).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid status '{0}' (expected PASS, FAIL, WARN or SKIP)")]
    InvalidStatus(String),

    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: std::io::Error },

    #[error("failed to read existing file {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to write report to file {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },

    #[error("failed to lock {}: {source}", path.display())]
    Lock { path: PathBuf, source: std::io::Error },

    #[error("failed to parse existing file {} as a test report: {source}", path.display())]
    UnrecognizedReport { path: PathBuf, source: serde_json::Error },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid submissions in {source_name}: {reason}")]
    Submissions { source_name: String, reason: String },

    #[error("run '{0}' not found in report history")]
    RunNotFound(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

//! Result aggregation and reporting for HPC GPU node health checks.
//!
//! Checks submit `(name, status, details, error)` results to a [`Reporter`].
//! The reporter keeps the latest result per check, projects them into a
//! fixed report schema, renders it as JSON, a table or a friendly summary,
//! and persists it, appending each run to a history file.

pub mod cli;
pub mod config;
pub mod console_format;
pub mod error;
pub mod report;
pub mod reporter;
pub mod store;
pub mod types;
pub mod ui;

pub use error::{ReportError, Result};
pub use report::{OutputFormat, ReportOutput};
pub use reporter::Reporter;
pub use store::ResultStore;
pub use types::{CheckDetails, CheckKind, CheckResult, Details, Status, Submission};

//! Report generation module - Data transformations and output.
//!
//! This module handles:
//! - Projecting stored check results into the typed report schema
//! - Calculating summary statistics
//! - Rendering reports as JSON, a box-drawn table or a friendly narrative
//! - Persisting reports, including the append-across-runs history file
//!
//! Table layout itself is handled by the console_format module.
//!
//! # Module Organization
//!
//! - `types` - Report schema (typed per-check reports, HostResults, TestRun, AppendedReport)
//! - `builder` - Store snapshot to ReportOutput projection
//! - `stats` - Summary statistics
//! - `table` - Table output
//! - `friendly` - Narrative output
//! - `export` - File persistence and history

mod builder;
mod export;
mod friendly;
mod stats;
mod table;
mod types;

use crate::error::{ReportError, Result};
use std::fmt;
use std::str::FromStr;

// Re-export types
pub use types::{
    AppendedReport, AuthReport, CdfpCableReport, EthLinkReport, Eth0PresenceReport, FabricManagerReport,
    GidIndexReport, GpuClockReport, GpuCountReport, GpuDriverReport, GpuModeReport, GpuXidReport, HcaErrorReport,
    HostResults, LinkReport, MaxAccReport, MissingInterfaceReport, NvlinkReport, PcieErrorReport, PcieWidthReport,
    PeerMemReport, RdmaNicsReport, ReportEntry, ReportOutput, RowRemapReport, RxDiscardsReport, SramErrorReport,
    TestRun, TestSummary,
};

pub use builder::build;
pub use export::{append_run, load_history, next_run_id, overwrite, persist};
pub use friendly::{FRIENDLY_TITLE, format_friendly, narrative_line};
pub use stats::{summarize, summarize_results};
pub use table::{TABLE_TITLE, detail_text, format_table, results_layout};

/// Output styles a report can be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Friendly,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
            OutputFormat::Friendly => "friendly",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "friendly" => Ok(OutputFormat::Friendly),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Render `report` in the named format.
///
/// Unknown format names are rejected before anything is rendered.
pub fn render(report: &ReportOutput, format: &str) -> Result<String> {
    render_as(report, format.parse()?)
}

pub fn render_as(report: &ReportOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Table => Ok(format_table(&report.host)),
        OutputFormat::Friendly => Ok(format_friendly(&report.host)),
    }
}

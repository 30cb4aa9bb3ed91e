//! The reporter facade.
//!
//! One `Reporter` is constructed at program start and handed by reference to
//! every check. Checks submit results; the caller then generates, renders or
//! writes the report. Submissions and report building only touch the store;
//! file writes happen after a snapshot is taken, serialized by `write_guard`
//! within the process and by a file lock across processes.

use crate::config::ReportSettings;
use crate::error::{ReportError, Result};
use crate::report::{self, OutputFormat, ReportOutput, TestSummary};
use crate::store::ResultStore;
use crate::types::{CheckDetails, CheckResult, Details, Status};
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
pub struct Reporter {
    store: ResultStore,
    output_file: Option<PathBuf>,
    append: bool,
    write_guard: Mutex<()>,
}

impl Reporter {
    /// Create a reporter writing to `output_file`, or to stdout when `None`.
    ///
    /// The output file's directory is created up front. Append mode is on.
    pub fn new(output_file: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = output_file.as_deref().and_then(Path::parent)
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir { path: dir.to_path_buf(), source })?;
        }

        debug!("Reporter initialized with output file: {:?}", output_file);
        Ok(Self { store: ResultStore::new(), output_file, append: true, write_guard: Mutex::new(()) })
    }

    pub fn from_settings(settings: &ReportSettings) -> Result<Self> {
        let mut reporter = Self::new(settings.output_file.clone())?;
        reporter.set_append_mode(settings.append);
        Ok(reporter)
    }

    pub fn set_append_mode(&mut self, append: bool) {
        self.append = append;
    }

    pub fn append_mode(&self) -> bool {
        self.append
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// Record a result under an arbitrary check name.
    pub fn submit(&self, name: &str, status: Status, details: Details, error: Option<&str>) {
        self.store.submit(name, status, details, error);
    }

    /// Record a typed result under its kind's canonical name.
    pub fn record(&self, status: Status, details: CheckDetails, error: Option<&str>) {
        let name = details.kind().name();
        self.store.submit(name, status, details.into_details(status), error);
    }

    /// Snapshot the store and project it into the report schema.
    pub fn generate_report(&self) -> ReportOutput {
        report::build(&self.store.get_all())
    }

    pub fn render(&self, format: &str) -> Result<String> {
        report::render(&self.generate_report(), format)
    }

    /// Generate the report and write it to the output file, or to stdout.
    pub fn write_report(&self, format: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_report_to(format, &mut handle)
    }

    /// Like `write_report`, with console output going to `console`.
    ///
    /// The format is checked first; an unknown one writes nothing anywhere.
    pub fn write_report_to<W: Write>(&self, format: &str, console: &mut W) -> Result<()> {
        let format: OutputFormat = format.parse()?;
        let report = self.generate_report();

        match &self.output_file {
            Some(path) => {
                let _guard = self.write_guard.lock().unwrap_or_else(PoisonError::into_inner);
                report::persist(&report, path, self.append, format)
            }
            None => {
                let rendered = report::render_as(&report, format)?;
                console
                    .write_all(rendered.as_bytes())
                    .map_err(|source| ReportError::Write { path: PathBuf::from("<stdout>"), source })
            }
        }
    }

    /// Copy of every stored result.
    pub fn results(&self) -> HashMap<String, CheckResult> {
        self.store.get_all()
    }

    pub fn results_count(&self) -> usize {
        self.store.count()
    }

    pub fn failed_checks(&self) -> Vec<String> {
        self.store.names_where_status(Status::Fail)
    }

    pub fn passed_checks(&self) -> Vec<String> {
        self.store.names_where_status(Status::Pass)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn summary(&self) -> TestSummary {
        report::summarize_results(&self.store.get_all())
    }

    /// The `=== Test Summary ===` block printed after table output.
    pub fn format_summary(&self) -> String {
        let summary = self.summary();
        let failed = self.failed_checks();

        let mut out = String::from("\n=== Test Summary ===\n");
        out.push_str(&format!("Total tests: {}\n", summary.total));
        out.push_str(&format!("Passed: {}\n", summary.passed));
        out.push_str(&format!("Failed: {}\n", summary.failed));
        if summary.skipped > 0 {
            out.push_str(&format!("Skipped: {}\n", summary.skipped));
        }

        if failed.is_empty() {
            out.push_str("✅ All tests passed!\n");
        } else {
            out.push_str(&format!("Failed tests: [{}]\n", failed.join(", ")));
            out.push_str(&format!("❌ {} test(s) failed\n", failed.len()));
        }
        out
    }

    pub fn print_summary(&self) {
        print!("{}", self.format_summary());
    }
}

#[cfg(test)]
#[path = "reporter_test.rs"]
mod reporter_test;

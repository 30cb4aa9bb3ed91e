// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use hpc_healthcheck::cli::{CliArgs, Command};
use hpc_healthcheck::config::{self, Settings};
use hpc_healthcheck::console_format::{Align, Column, TableLayout};
use hpc_healthcheck::report::{self, OutputFormat, ReportOutput};
use hpc_healthcheck::{CheckKind, ReportError, Reporter, Result, Submission, ui};
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    let settings = match config::resolve_settings(&args) {
        Ok(s) => s,
        Err(e) => {
            ui::print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.logging.level.as_str()))
        .init();

    let code = match run(&args.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            ui::print_error(&e.to_string());
            1
        }
    };

    std::process::exit(code);
}

fn run(command: &Command, settings: &Settings) -> Result<i32> {
    match command {
        Command::Report { results } => run_report(results, settings),
        Command::Show { file, run_id } => run_show(file, run_id.as_deref(), settings),
        Command::ListChecks => {
            print!("{}", format_check_list());
            Ok(0)
        }
    }
}

/// Ingest submissions, write the report, exit 1 if anything failed
fn run_report(source: &str, settings: &Settings) -> Result<i32> {
    // Reject a bad format before reading or writing anything
    let format = settings.output_format()?;

    let submissions = read_submissions(source)?;
    debug!("Read {} submissions from {}", submissions.len(), source);

    let reporter = Reporter::from_settings(&settings.report)?;
    for submission in submissions {
        reporter.submit(&submission.name, submission.status, submission.details, submission.error.as_deref());
    }

    reporter.write_report(format.as_str())?;
    if let Some(path) = reporter.output_file() {
        ui::status(&format!("Report written to {}", path.display()));
    }

    if format == OutputFormat::Table {
        reporter.print_summary();
    }

    let failed = reporter.failed_checks();
    if failed.is_empty() {
        info!("All {} checks passed", reporter.results_count());
        Ok(0)
    } else {
        info!("{} of {} checks failed: {}", failed.len(), reporter.results_count(), failed.join(", "));
        Ok(1)
    }
}

fn read_submissions(source: &str) -> Result<Vec<Submission>> {
    let (source_name, contents) = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| ReportError::Submissions { source_name: "stdin".to_string(), reason: e.to_string() })?;
        ("stdin".to_string(), buf)
    } else {
        let contents = fs::read_to_string(source)
            .map_err(|e| ReportError::Submissions { source_name: source.to_string(), reason: e.to_string() })?;
        (source.to_string(), contents)
    };

    serde_json::from_str(&contents).map_err(|e| ReportError::Submissions { source_name, reason: e.to_string() })
}

/// Render one run of a stored report to stdout
fn run_show(file: &Path, run_id: Option<&str>, settings: &Settings) -> Result<i32> {
    let format = settings.output_format()?;
    let history = report::load_history(file)?;

    let run = match run_id {
        Some(id) => history.find(id).ok_or_else(|| ReportError::RunNotFound(id.to_string()))?,
        None => match history.latest() {
            Some(run) => run,
            None => {
                ui::status(&format!("No runs recorded in {}", file.display()));
                return Ok(0);
            }
        },
    };

    ui::status(&format!(
        "{} ({}), run {} of {}",
        run.run_id,
        run.timestamp,
        history.test_runs.iter().position(|r| r.run_id == run.run_id).map_or(0, |i| i + 1),
        history.test_runs.len()
    ));

    let snapshot = ReportOutput { host: run.test_results.clone() };
    print!("{}", report::render_as(&snapshot, format)?);
    Ok(0)
}

fn format_check_list() -> String {
    let layout = TableLayout::new(vec![
        Column::new("CHECK", 34, Align::Left),
        Column::new("DESCRIPTION", 68, Align::Left),
    ]);
    let rows: Vec<Vec<&str>> = CheckKind::ALL.iter().map(|kind| vec![kind.name(), kind.description()]).collect();
    layout.render(None, &rows)
}

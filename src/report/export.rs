//! Report persistence: plain overwrite and the append-across-runs history.
//!
//! A history file holds `{"test_runs": [...]}`. Older tool versions wrote a
//! single `{"localhost": {...}}` document instead; such a file is migrated
//! into a one-run history the first time it is appended to.
//!
//! Every rewrite goes through a temporary file in the destination directory
//! followed by a rename, so a failed write leaves the previous file intact.
//! Appends hold an exclusive advisory lock on `<file>.lock` for the whole
//! read-modify-write cycle.

use super::types::{AppendedReport, ReportOutput, TestRun};
use super::{OutputFormat, render_as};
use crate::error::{ReportError, Result};
use crate::types::format_rfc3339;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info};
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Write `report` to `path` in the given format.
///
/// With `append` set and JSON output, the report becomes a new run in the
/// history file. Every other combination replaces the file outright.
pub fn persist(report: &ReportOutput, path: &Path, append: bool, format: OutputFormat) -> Result<()> {
    if append && format == OutputFormat::Json {
        append_run(report, path)?;
        return Ok(());
    }

    let rendered = render_as(report, format)?;
    overwrite(path, &rendered)
}

/// Replace `path` with `contents`, creating the parent directory if needed.
pub fn overwrite(path: &Path, contents: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    write_atomic(path, contents)?;
    info!("Report written to {}", path.display());
    Ok(())
}

/// Append `report` to the history at `path` as a new run and return that run.
///
/// Fails without touching the file if it exists but is neither a history
/// nor a legacy single-run report.
pub fn append_run(report: &ReportOutput, path: &Path) -> Result<TestRun> {
    ensure_parent_dir(path)?;
    let _lock = lock_history(path)?;

    let mut history = match read_existing(path)? {
        Some(bytes) => parse_history(path, &bytes)?,
        None => AppendedReport::default(),
    };

    let now = Utc::now();
    let run = TestRun {
        run_id: next_run_id(&history, now.timestamp()),
        timestamp: format_rfc3339(&now),
        test_results: report.host.clone(),
    };
    history.test_runs.push(run.clone());

    let mut json = serde_json::to_string_pretty(&history)?;
    json.push('\n');
    write_atomic(path, &json)?;

    info!("Appended {} to {} ({} runs)", run.run_id, path.display(), history.test_runs.len());
    Ok(run)
}

/// Read a stored report without modifying it.
///
/// A legacy single-run file comes back as a one-run history, exactly as an
/// append would see it.
pub fn load_history(path: &Path) -> Result<AppendedReport> {
    let bytes = fs::read(path).map_err(|source| ReportError::Read { path: path.to_path_buf(), source })?;
    parse_history(path, &bytes)
}

/// `run_<secs>`, or `run_<secs>_<n>` when that id is already in `history`.
pub fn next_run_id(history: &AppendedReport, unix_secs: i64) -> String {
    let base = format!("run_{}", unix_secs);
    if history.find(&base).is_none() {
        return base;
    }

    let mut n = 1;
    loop {
        let candidate = format!("{}_{}", base, n);
        if history.find(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

fn parse_history(path: &Path, bytes: &[u8]) -> Result<AppendedReport> {
    if let Ok(history) = serde_json::from_slice::<AppendedReport>(bytes) {
        debug!("{}: {} existing runs", path.display(), history.test_runs.len());
        return Ok(history);
    }

    match serde_json::from_slice::<ReportOutput>(bytes) {
        Ok(legacy) => {
            let run = migrate_legacy(path, legacy);
            info!("Migrating single-run report {} into history as {}", path.display(), run.run_id);
            Ok(AppendedReport { test_runs: vec![run] })
        }
        Err(source) => Err(ReportError::UnrecognizedReport { path: path.to_path_buf(), source }),
    }
}

/// The run id comes from the file's mtime when the filesystem reports one.
fn migrate_legacy(path: &Path, legacy: ReportOutput) -> TestRun {
    let now = Utc::now();
    let written_at = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|mtime| DateTime::<Utc>::from(mtime).timestamp())
        .unwrap_or_else(|_| now.timestamp());

    TestRun {
        run_id: format!("run_{}", written_at),
        timestamp: format_rfc3339(&now),
        test_results: legacy.host,
    }
}

/// File contents, or `None` if there is no file yet.
fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ReportError::Read { path: path.to_path_buf(), source }),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir { path: dir.to_path_buf(), source })?;
    }
    Ok(())
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Unlock is automatic when the returned file goes out of scope
fn lock_history(path: &Path) -> Result<File> {
    let lock_path = lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|source| ReportError::Lock { path: lock_path.clone(), source })?;

    file.lock_exclusive().map_err(|source| ReportError::Lock { path: lock_path.clone(), source })?;
    debug!("Locked {}", lock_path.display());
    Ok(file)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| ReportError::Write { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = match fs::metadata(path) {
        Ok(existing) => {
            let tmp = tempfile::Builder::new().tempfile_in(dir).map_err(write_err)?;
            tmp.as_file().set_permissions(existing.permissions()).map_err(write_err)?;
            tmp
        }
        Err(_) => new_file_builder().tempfile_in(dir).map_err(write_err)?,
    };
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// New report files are created 0644 (less the umask), not tempfile's 0600.
fn new_file_builder<'a, 'b>() -> tempfile::Builder<'a, 'b> {
    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o644));
    }
    builder
}

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

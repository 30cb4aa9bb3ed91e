/// Configuration resolution module
///
/// This module handles:
/// - Locating and parsing the optional TOML configuration file
/// - Applying CLI overrides on top of file values
///
/// Format names are kept as strings here and validated when a report is
/// rendered, so a bad value in the file surfaces as an unsupported format.
use crate::cli::CliArgs;
use crate::error::{ReportError, Result};
use crate::report::OutputFormat;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "hpc-healthcheck.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub format: String,
    pub output_file: Option<PathBuf>,
    pub append: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self { format: OutputFormat::Table.to_string(), output_file: None, append: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "warn".to_string() }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ReportError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ReportError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ReportError::Config(msg) => ReportError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.report.format.parse()
    }

    /// Apply CLI flags on top of whatever the file said.
    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(format) = &args.format {
            self.report.format = format.clone();
        }
        if let Some(path) = &args.output_file {
            self.report.output_file = Some(path.clone());
        }
        if args.no_append {
            self.report.append = false;
        }
        if args.verbose {
            self.logging.level = "debug".to_string();
        }
    }
}

/// System-wide file first, then the per-user one.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![Path::new("/etc").join(CONFIG_FILE_NAME)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{}", CONFIG_FILE_NAME)));
    }
    paths
}

/// Build the effective settings from CLI arguments
pub fn resolve_settings(args: &CliArgs) -> Result<Settings> {
    resolve_settings_from(args, &default_config_paths())
}

/// An explicit `--config` must exist; the search paths are optional.
pub fn resolve_settings_from(args: &CliArgs, search_paths: &[PathBuf]) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => {
            debug!("Using config file from --config: {}", path.display());
            Settings::load(path)?
        }
        None => match search_paths.iter().find(|p| p.is_file()) {
            Some(path) => {
                debug!("Using config file {}", path.display());
                Settings::load(path)?
            }
            None => {
                debug!("No config file found, using defaults");
                Settings::default()
            }
        },
    };

    settings.apply_overrides(args);
    debug!("Effective settings: {:?}", settings);
    Ok(settings)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "hpc-healthcheck")]
#[command(about = "Collect, persist and render HPC GPU node health-check results")]
#[command(version)]
pub struct CliArgs {
    /// Configuration file (default: /etc/hpc-healthcheck.toml, then ~/.hpc-healthcheck.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose logging (same as [logging] level = "debug")
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output format: json, table or friendly
    #[arg(long = "output", short = 'o', global = true, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Write the report to this file instead of stdout (directory is created)
    #[arg(long, short = 'f', global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Overwrite the output file instead of appending a new run to its history
    #[arg(long, global = true)]
    pub no_append: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Ingest check results and write the report
    ///
    /// Results are a JSON array of {"name", "status", "details"?, "error"?}
    /// objects. Exits non-zero when any check failed.
    Report {
        /// File holding the results, or "-" for stdin
        #[arg(long, value_name = "FILE|-")]
        results: String,
    },

    /// Render a stored report file (latest run unless --run is given)
    Show {
        /// Report file, either a run history or a single-run report
        file: PathBuf,

        /// Run id to show, e.g. run_1700000000
        #[arg(long = "run", value_name = "RUN_ID")]
        run_id: Option<String>,
    },

    /// List every check kind the report knows about
    ListChecks,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Report { results } = &self.command
            && results.trim().is_empty()
        {
            return Err("--results needs a file path or \"-\" for stdin".to_string());
        }

        if let Some(path) = &self.output_file
            && path.as_os_str().is_empty()
        {
            return Err("--output-file must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_with_globals() {
        let args = CliArgs::try_parse_from([
            "hpc-healthcheck",
            "-o",
            "friendly",
            "report",
            "--results",
            "results.json",
            "-f",
            "/tmp/out/report.json",
            "--no-append",
        ])
        .unwrap();

        assert_eq!(args.format.as_deref(), Some("friendly"));
        assert_eq!(args.output_file, Some(PathBuf::from("/tmp/out/report.json")));
        assert!(args.no_append);
        assert_eq!(args.command, Command::Report { results: "results.json".to_string() });
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_show_with_run() {
        let args =
            CliArgs::try_parse_from(["hpc-healthcheck", "show", "report.json", "--run", "run_1700000000"]).unwrap();
        assert_eq!(
            args.command,
            Command::Show { file: PathBuf::from("report.json"), run_id: Some("run_1700000000".to_string()) }
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(["hpc-healthcheck"]).is_err());
    }

    #[test]
    fn test_validate_empty_results_fails() {
        let args = CliArgs {
            config: None,
            verbose: false,
            format: None,
            output_file: None,
            no_append: false,
            command: Command::Report { results: "  ".to_string() },
        };
        assert!(args.validate().is_err());
    }
}

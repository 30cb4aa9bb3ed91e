/// Integration tests for the hpc-healthcheck binary
///
/// These drive the compiled binary against the fixtures in test-fixtures/
/// and temporary output directories. Every run gets an empty config file so
/// a system-wide /etc/hpc-healthcheck.toml cannot leak in.
use hpc_healthcheck::report::{AppendedReport, ReportOutput};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

// Helper to get the test fixtures directory
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-fixtures")
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).display().to_string()
}

// Helper to run the binary with an isolated, empty config
fn run(dir: &TempDir, args: &[&str]) -> Output {
    let config = dir.path().join("empty.toml");
    fs::write(&config, "").unwrap();

    Command::new(env!("CARGO_BIN_EXE_hpc-healthcheck"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run hpc-healthcheck {}: {}", args.join(" "), e))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output, context: &str) {
    assert!(
        output.status.success(),
        "{} failed with status: {:?}\nstderr: {}",
        context,
        output.status.code(),
        stderr(output)
    );
}

#[test]
fn test_fixtures_exist() {
    let fixtures = fixtures_dir();
    assert!(fixtures.join("results-passing.json").exists());
    assert!(fixtures.join("results-failing.json").exists());
    assert!(fixtures.join("legacy-report.json").exists());
}

#[test]
fn test_list_checks() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["list-checks"]);
    assert_success(&output, "list-checks");

    let out = stdout(&output);
    for name in ["gpu_count_check", "rdma_nics_count", "nvlink_speed_check", "row_remap_error_check"] {
        assert!(out.contains(name), "missing {} in:\n{}", name, out);
    }
}

#[test]
fn test_report_json_to_stdout() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["-o", "json", "report", "--results", &fixture("results-passing.json")]);
    assert_success(&output, "report -o json");

    let report: ReportOutput = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report.host.gpu_count_check[0].gpu_count, 8);
    assert_eq!(report.host.rdma_nics_count[0].num_rdma_nics, 16);
    assert_eq!(report.host.gpu_driver_check[0].driver_version, "535.104.05");
    assert!(report.host.link_check.is_empty());
}

#[test]
fn test_report_table_with_failures() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["report", "--results", &fixture("results-failing.json")]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("DIAGNOSTIC TEST RESULTS"));
    assert!(out.contains("Failed: 2/16"));
    assert!(out.contains("NVLink Issues Found"));
    assert!(out.contains("=== Test Summary ==="));
    assert!(out.contains("Failed tests: [nvlink_speed_check, pcie_error_check, rx_discards_check]"));
}

#[test]
fn test_report_friendly() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["-o", "friendly", "report", "--results", &fixture("results-passing.json")]);
    assert_success(&output, "report -o friendly");

    let out = stdout(&output);
    assert!(out.contains("HPC Diagnostic Results"));
    assert!(out.contains("   Total Tests: 4\n"));
    assert!(out.contains("All tests passed!"));
    assert!(!out.contains("=== Test Summary ==="));
}

#[test]
fn test_unsupported_format_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("report.json");
    let output = run(
        &dir,
        &["-o", "xml", "-f", path.to_str().unwrap(), "report", "--results", &fixture("results-passing.json")],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unsupported output format: xml"));
    assert!(!path.exists());
}

#[test]
fn test_appends_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logs").join("report.json");
    let file = path.to_str().unwrap();

    for _ in 0..2 {
        let output = run(&dir, &["-o", "json", "-f", file, "report", "--results", &fixture("results-passing.json")]);
        assert_success(&output, "report -f");
        assert!(stdout(&output).is_empty());
    }

    let history: AppendedReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(history.test_runs.len(), 2);
    assert_ne!(history.test_runs[0].run_id, history.test_runs[1].run_id);
    assert!(history.test_runs[0].timestamp <= history.test_runs[1].timestamp);
}

#[test]
fn test_no_append_overwrites() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let file = path.to_str().unwrap();

    for _ in 0..2 {
        let output = run(
            &dir,
            &["-o", "json", "-f", file, "--no-append", "report", "--results", &fixture("results-passing.json")],
        );
        assert_success(&output, "report --no-append");
    }

    let report: ReportOutput = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(report.host.gpu_count_check.len(), 1);
}

#[test]
fn test_legacy_report_migrated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    fs::copy(fixtures_dir().join("legacy-report.json"), &path).unwrap();
    let legacy: ReportOutput = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    let output =
        run(&dir, &["-o", "json", "-f", path.to_str().unwrap(), "report", "--results", &fixture("results-passing.json")]);
    assert_success(&output, "report onto legacy file");

    let history: AppendedReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(history.test_runs.len(), 2);
    assert_eq!(history.test_runs[0].test_results, legacy.host);
    assert_eq!(history.test_runs[1].test_results.rdma_nics_count[0].num_rdma_nics, 16);
}

#[test]
fn test_unrecognized_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let original = "{\"hosts\": []}\n";
    fs::write(&path, original).unwrap();

    let output =
        run(&dir, &["-o", "json", "-f", path.to_str().unwrap(), "report", "--results", &fixture("results-passing.json")]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("report.json"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_results_from_stdin() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("empty.toml");
    fs::write(&config, "").unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_hpc-healthcheck"))
        .arg("--config")
        .arg(&config)
        .args(["-o", "json", "report", "--results", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"[{"name": "eth0_presence_check", "status": "PASS", "details": {"eth0_present": true}}]"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert_success(&output, "report --results -");

    let report: ReportOutput = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(report.host.eth0_presence_check[0].eth0_present);
}

#[test]
fn test_invalid_submissions_rejected() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("bad.json");
    fs::write(&results, r#"[{"name": "gpu_count_check", "status": "MAYBE"}]"#).unwrap();

    let output = run(&dir, &["report", "--results", results.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid submissions"));
}

#[test]
fn test_show_latest_and_named_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let file = path.to_str().unwrap();

    let first = run(&dir, &["-o", "json", "-f", file, "report", "--results", &fixture("results-passing.json")]);
    assert_success(&first, "first append");
    let second = run(&dir, &["-o", "json", "-f", file, "report", "--results", &fixture("results-failing.json")]);
    assert_eq!(second.status.code(), Some(1));

    let history: AppendedReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let first_id = history.test_runs[0].run_id.clone();

    let latest = run(&dir, &["-o", "json", "show", file]);
    assert_success(&latest, "show");
    let report: ReportOutput = serde_json::from_str(&stdout(&latest)).unwrap();
    assert_eq!(report.host.pcie_error_check.len(), 1);

    let named = run(&dir, &["-o", "json", "show", file, "--run", &first_id]);
    assert_success(&named, "show --run");
    let report: ReportOutput = serde_json::from_str(&stdout(&named)).unwrap();
    assert!(report.host.pcie_error_check.is_empty());
    assert!(stderr(&named).contains(&first_id));
}

#[test]
fn test_show_unknown_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    fs::copy(fixtures_dir().join("legacy-report.json"), &path).unwrap();

    let output = run(&dir, &["show", path.to_str().unwrap(), "--run", "run_0"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("run_0"));
}

#[test]
fn test_config_file_sets_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("hpc.toml");
    fs::write(&config, "[report]\nformat = \"json\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_hpc-healthcheck"))
        .arg("--config")
        .arg(&config)
        .args(["report", "--results", &fixture("results-passing.json")])
        .output()
        .unwrap();
    assert_success(&output, "report with config");

    let report: ReportOutput = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report.host.gpu_count_check[0].gpu_count, 8);
}

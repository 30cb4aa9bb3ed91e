//! Statistics and summary generation for check results.
//!
//! Two views exist: one over a built report (friendly output, `show`) and
//! one over the raw store (the `=== Test Summary ===` block), which also
//! counts checks outside the report schema.

use super::types::{HostResults, TestSummary};
use crate::types::{CheckResult, Status};
use std::collections::HashMap;

/// Calculate summary statistics from a built report.
///
/// WARN counts as passed. SKIP is tallied separately and left out of `total`.
pub fn summarize(host: &HostResults) -> TestSummary {
    tally(host.entries().iter().map(|entry| entry.status()))
}

/// Same counts, taken straight from a store snapshot.
pub fn summarize_results(results: &HashMap<String, CheckResult>) -> TestSummary {
    tally(results.values().map(|result| result.status))
}

fn tally(statuses: impl Iterator<Item = Status>) -> TestSummary {
    let mut summary = TestSummary::default();

    for status in statuses {
        match status {
            Status::Pass => summary.passed += 1,
            Status::Warn => {
                summary.passed += 1;
                summary.warned += 1;
            }
            Status::Fail => summary.failed += 1,
            Status::Skip => summary.skipped += 1,
        }
    }

    summary.total = summary.passed + summary.failed;
    summary
}

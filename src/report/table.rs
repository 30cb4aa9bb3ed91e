//! Table output formatting for check results.
//!
//! One row per populated check kind: label, status glyph and a short detail
//! string. Layout (widths, alignment, truncation) lives in `console_format`.

use super::types::{HostResults, ReportEntry};
use crate::console_format::{Align, Column, TableLayout};
use crate::types::Status;

pub const TABLE_TITLE: &str = "DIAGNOSTIC TEST RESULTS";

const NAME_WIDTH: usize = 24;
const STATUS_WIDTH: usize = 8;
const DETAILS_WIDTH: usize = 34;

/// Column layout shared by every results table.
pub fn results_layout() -> TableLayout {
    TableLayout::new(vec![
        Column::new("TEST NAME", NAME_WIDTH, Align::Left),
        Column::new("STATUS", STATUS_WIDTH, Align::Center),
        Column::new("DETAILS", DETAILS_WIDTH, Align::Left),
    ])
}

/// Render the populated checks of `host` as a box-drawn table.
pub fn format_table(host: &HostResults) -> String {
    let rows: Vec<Vec<String>> = host
        .entries()
        .iter()
        .map(|entry| {
            let glyph = entry.status().glyph();
            vec![
                entry.kind().label().to_string(),
                glyph.to_string(),
                format!("{} {}", glyph, detail_text(entry)),
            ]
        })
        .collect();

    results_layout().render(Some(TABLE_TITLE), &rows)
}

/// The most decision-relevant field(s) of one report, in a few words.
pub fn detail_text(entry: &ReportEntry<'_>) -> String {
    let failed = entry.status() == Status::Fail;

    match entry {
        ReportEntry::GpuCount(r) => format!("GPU Count: {}", r.gpu_count),
        ReportEntry::GpuMode(r) => {
            if failed && !r.enabled_gpu_indexes.is_empty() {
                format!("MIG Enabled: [{}]", r.enabled_gpu_indexes.join(", "))
            } else {
                "MIG Mode Disabled".to_string()
            }
        }
        ReportEntry::PcieError(r) => format!("PCIe Status: {}", r.status),
        ReportEntry::RdmaNicsCount(r) => format!("RDMA NICs: {}", r.num_rdma_nics),
        ReportEntry::RxDiscards(r) => {
            if failed {
                format!("Failed: {}/{}", r.failed_count, r.interface_count)
            } else {
                format!("Interfaces: {}", r.interface_count)
            }
        }
        ReportEntry::GidIndex(r) => {
            if failed && !r.invalid_indexes.is_empty() {
                let indexes: Vec<String> = r.invalid_indexes.iter().map(|i| i.to_string()).collect();
                format!("Invalid Index: [{}]", indexes.join(", "))
            } else {
                "All indexes valid".to_string()
            }
        }
        ReportEntry::Link(_) => "RDMA Links Checked".to_string(),
        ReportEntry::EthLink(_) => "Ethernet Links Checked".to_string(),
        ReportEntry::Auth(_) => "RDMA Auth Checked".to_string(),
        ReportEntry::SramError(r) => format!("Uncorr: {}, Corr: {}", r.max_uncorrectable, r.max_correctable),
        ReportEntry::GpuDriver(r) => format!("Version: {}", r.driver_version),
        ReportEntry::GpuClock(r) => {
            if failed {
                "Clock Speed Issues".to_string()
            } else if !r.message.is_empty() {
                r.message.clone()
            } else {
                "Clock Speeds OK".to_string()
            }
        }
        ReportEntry::PeerMemModule(r) => {
            String::from(if r.module_loaded { "Module Loaded" } else { "Module Not Loaded" })
        }
        ReportEntry::NvlinkSpeed(_) => {
            String::from(if failed { "NVLink Issues Found" } else { "NVLink Speed/Count OK" })
        }
        ReportEntry::Eth0Presence(r) => {
            String::from(if r.eth0_present { "eth0 Interface Present" } else { "eth0 Interface Missing" })
        }
        ReportEntry::CdfpCable(r) => String::from(match r.status {
            Status::Fail => "CDFP Cable Issues",
            Status::Skip => "CDFP Check Skipped",
            _ => "CDFP Cables OK",
        }),
        ReportEntry::PcieWidthMissingLanes(_) => {
            String::from(if failed { "Missing Lanes Detected" } else { "Link Widths OK" })
        }
        ReportEntry::FabricManager(r) => {
            String::from(if r.is_running { "Service Running" } else { "Service Not Running" })
        }
        ReportEntry::HcaError(_) => String::from(if failed { "HCA Errors Detected" } else { "No HCA Errors" }),
        ReportEntry::MissingInterface(r) => format!("Missing: {}", r.missing_count),
        ReportEntry::GpuXid(r) => String::from(match r.status {
            Status::Fail => "XID Errors Found",
            Status::Warn => "XID Warnings Found",
            _ => "No XID Errors",
        }),
        ReportEntry::MaxAcc(_) => String::from(if failed { "Config Mismatch" } else { "Config OK" }),
        ReportEntry::RowRemapError(r) => format!("Remap Failures: {}", r.failure_count),
    }
}

//! Friendly output format: a narrative block per check plus a summary.
//!
//! Meant for an operator reading a terminal, not for parsing.

use super::stats::summarize;
use super::types::{HostResults, ReportEntry};
use crate::types::{CheckKind, Status};

pub const FRIENDLY_TITLE: &str = "🔍 HPC Diagnostic Results";

fn section_rule() -> String {
    format!("   {}\n", "-".repeat(30))
}

/// Render every populated check, then the summary block.
pub fn format_friendly(host: &HostResults) -> String {
    let mut output = String::new();
    output.push_str(FRIENDLY_TITLE);
    output.push('\n');
    output.push_str(&"=".repeat(51));
    output.push_str("\n\n");

    for entry in host.entries() {
        output.push_str(entry.kind().heading());
        output.push('\n');
        output.push_str(&section_rule());
        output.push_str(&format!("   {}\n\n", narrative_line(&entry)));
    }

    let summary = summarize(host);
    output.push_str("📊 Summary\n");
    output.push_str(&section_rule());
    output.push_str(&format!("   Total Tests: {}\n", summary.total));
    output.push_str(&format!("   Passed: {}\n", summary.passed));
    output.push_str(&format!("   Failed: {}\n", summary.failed));
    if summary.warned > 0 {
        output.push_str(&format!("   Warnings: {}\n", summary.warned));
    }
    if summary.skipped > 0 {
        output.push_str(&format!("   Skipped: {}\n", summary.skipped));
    }

    if summary.failed == 0 {
        output.push_str("\n   🎉 All tests passed! Your HPC environment is healthy.\n");
    } else {
        output.push_str(&format!("\n   ⚠️  {} test(s) failed. Please review the results above.\n", summary.failed));
    }

    output
}

/// One result line, e.g. `✅ GPU Count: 8 (PASSED)`.
pub fn narrative_line(entry: &ReportEntry<'_>) -> String {
    let status = entry.status();
    let subject = subject(entry.kind());

    let text = if status == Status::Skip {
        "Check skipped (not applicable for this shape)".to_string()
    } else {
        narrative(entry, status == Status::Pass)
    };

    format!("{} {}: {} ({})", status.glyph(), subject, text, status.outcome())
}

fn subject(kind: CheckKind) -> &'static str {
    match kind {
        CheckKind::GpuCount => "GPU Count",
        CheckKind::GpuMode => "GPU Mode",
        CheckKind::PcieError => "PCIe Bus",
        CheckKind::RdmaNicsCount => "RDMA NICs",
        CheckKind::RxDiscards => "Network Interfaces",
        CheckKind::GidIndex => "GID Indexes",
        CheckKind::Link => "RDMA Links",
        CheckKind::EthLink => "Ethernet Links",
        CheckKind::Auth => "Authentication",
        CheckKind::SramError => "SRAM Errors",
        CheckKind::GpuDriver => "GPU Driver",
        CheckKind::GpuClock => "GPU Clock Speeds",
        CheckKind::PeerMemModule => "PeerMem Module",
        CheckKind::NvlinkSpeed => "NVLink",
        CheckKind::Eth0Presence => "Eth0 Interface",
        CheckKind::CdfpCable => "CDFP Cables",
        CheckKind::PcieWidthMissingLanes => "PCIe Links",
        CheckKind::FabricManager => "Fabric Manager",
        CheckKind::HcaError => "HCA",
        CheckKind::MissingInterface => "PCIe Interfaces",
        CheckKind::GpuXid => "GPU XID",
        CheckKind::MaxAcc => "MAX_ACC_OUT_READ",
        CheckKind::RowRemapError => "GPU Row Remap",
    }
}

fn narrative(entry: &ReportEntry<'_>, ok: bool) -> String {
    let pick = |pass: &str, fail: &str| if ok { pass.to_string() } else { fail.to_string() };

    match entry {
        ReportEntry::GpuCount(r) => r.gpu_count.to_string(),
        ReportEntry::GpuMode(r) => {
            if ok {
                "MIG disabled on all GPUs".to_string()
            } else if !r.enabled_gpu_indexes.is_empty() {
                format!("MIG enabled on GPUs [{}]", r.enabled_gpu_indexes.join(", "))
            } else {
                "Check failed".to_string()
            }
        }
        ReportEntry::PcieError(_) => pick("No errors detected", "Errors detected"),
        ReportEntry::RdmaNicsCount(r) => format!("{} detected", r.num_rdma_nics),
        ReportEntry::RxDiscards(r) => {
            if ok {
                format!("{} checked, no RX discard issues", r.interface_count)
            } else if r.failed_count > 0 {
                format!("{} failed out of {} checked", r.failed_count, r.interface_count)
            } else {
                "RX discard check failed".to_string()
            }
        }
        ReportEntry::GidIndex(r) => {
            if ok {
                "All valid".to_string()
            } else if !r.invalid_indexes.is_empty() {
                let indexes: Vec<String> = r.invalid_indexes.iter().map(|i| i.to_string()).collect();
                format!("Invalid indexes found [{}]", indexes.join(", "))
            } else {
                "Check failed".to_string()
            }
        }
        ReportEntry::Link(_) | ReportEntry::EthLink(_) => pick("All links healthy", "Link issues detected"),
        ReportEntry::Auth(_) => {
            pick("All RDMA interfaces authenticated", "RDMA interface authentication issues")
        }
        ReportEntry::SramError(r) => {
            format!("Uncorrectable: {}, Correctable: {}", r.max_uncorrectable, r.max_correctable)
        }
        ReportEntry::GpuDriver(r) => format!("Version {}", r.driver_version),
        ReportEntry::GpuClock(r) => {
            if !r.message.is_empty() {
                r.message.clone()
            } else {
                pick("All GPUs running at acceptable speeds", "Some GPUs below acceptable speed threshold")
            }
        }
        ReportEntry::PeerMemModule(_) => pick("nvidia_peermem loaded", "nvidia_peermem not loaded"),
        ReportEntry::NvlinkSpeed(_) => {
            pick("All links meet speed and count requirements", "Speed or count issues detected")
        }
        ReportEntry::Eth0Presence(_) => pick("eth0 is present", "eth0 is missing"),
        ReportEntry::CdfpCable(_) => {
            pick("All GPU-to-module mappings correct", "GPU-to-module mapping issues detected")
        }
        ReportEntry::PcieWidthMissingLanes(_) => {
            pick("All links at expected width and speed", "Missing lanes or degraded speed detected")
        }
        ReportEntry::FabricManager(r) => {
            if !r.message.is_empty() {
                r.message.clone()
            } else {
                pick("nvidia-fabricmanager running", "nvidia-fabricmanager not running")
            }
        }
        ReportEntry::HcaError(_) => pick("No fatal errors detected", "Fatal errors detected"),
        ReportEntry::MissingInterface(r) => {
            if ok { "None missing".to_string() } else { format!("{} missing", r.missing_count) }
        }
        ReportEntry::GpuXid(r) => {
            if !r.message.is_empty() {
                r.message.clone()
            } else {
                pick("No XID errors found", "XID errors found")
            }
        }
        ReportEntry::MaxAcc(_) => pick("Configuration correct", "Configuration mismatch"),
        ReportEntry::RowRemapError(r) => {
            if ok { "No remap failures".to_string() } else { format!("{} remap failure(s)", r.failure_count) }
        }
    }
}

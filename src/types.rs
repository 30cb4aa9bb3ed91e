//! Core data structures for check results.
//!
//! A check hands in a `(name, status, details, error)` tuple. The store keeps
//! one `CheckResult` per name; the report builder later projects the details
//! of every known `CheckKind` into its typed report.

use crate::error::ReportError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Open key/value payload attached to a check result.
pub type Details = Map<String, Value>;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    Warn,
    Skip,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Warn => "WARN",
            Status::Skip => "SKIP",
        }
    }

    /// Glyph used by the table and friendly renderers.
    pub fn glyph(&self) -> &'static str {
        match self {
            Status::Pass => "✅",
            Status::Fail => "❌",
            Status::Warn => "⚠️",
            Status::Skip => "⏭️",
        }
    }

    /// Trailing outcome marker in the friendly format, e.g. "(PASSED)".
    pub fn outcome(&self) -> &'static str {
        match self {
            Status::Pass => "PASSED",
            Status::Fail => "FAILED",
            Status::Warn => "WARNING",
            Status::Skip => "SKIPPED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PASS" => Ok(Status::Pass),
            "FAIL" => Ok(Status::Fail),
            "WARN" => Ok(Status::Warn),
            "SKIP" => Ok(Status::Skip),
            _ => Err(ReportError::InvalidStatus(s.to_string())),
        }
    }
}

/// Same spellings as `FromStr`, so files and command-line input agree.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Every check kind the report schema knows about, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    GpuCount,
    GpuMode,
    PcieError,
    RdmaNicsCount,
    RxDiscards,
    GidIndex,
    Link,
    EthLink,
    Auth,
    SramError,
    GpuDriver,
    GpuClock,
    PeerMemModule,
    NvlinkSpeed,
    Eth0Presence,
    CdfpCable,
    PcieWidthMissingLanes,
    FabricManager,
    HcaError,
    MissingInterface,
    GpuXid,
    MaxAcc,
    RowRemapError,
}

impl CheckKind {
    pub const ALL: [CheckKind; 23] = [
        CheckKind::GpuCount,
        CheckKind::GpuMode,
        CheckKind::PcieError,
        CheckKind::RdmaNicsCount,
        CheckKind::RxDiscards,
        CheckKind::GidIndex,
        CheckKind::Link,
        CheckKind::EthLink,
        CheckKind::Auth,
        CheckKind::SramError,
        CheckKind::GpuDriver,
        CheckKind::GpuClock,
        CheckKind::PeerMemModule,
        CheckKind::NvlinkSpeed,
        CheckKind::Eth0Presence,
        CheckKind::CdfpCable,
        CheckKind::PcieWidthMissingLanes,
        CheckKind::FabricManager,
        CheckKind::HcaError,
        CheckKind::MissingInterface,
        CheckKind::GpuXid,
        CheckKind::MaxAcc,
        CheckKind::RowRemapError,
    ];

    /// Canonical check name. Doubles as the report's JSON key.
    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::GpuCount => "gpu_count_check",
            CheckKind::GpuMode => "gpu_mode_check",
            CheckKind::PcieError => "pcie_error_check",
            CheckKind::RdmaNicsCount => "rdma_nics_count",
            CheckKind::RxDiscards => "rx_discards_check",
            CheckKind::GidIndex => "gid_index_check",
            CheckKind::Link => "link_check",
            CheckKind::EthLink => "eth_link_check",
            CheckKind::Auth => "auth_check",
            CheckKind::SramError => "sram_error_check",
            CheckKind::GpuDriver => "gpu_driver_check",
            CheckKind::GpuClock => "gpu_clk_check",
            CheckKind::PeerMemModule => "peermem_module_check",
            CheckKind::NvlinkSpeed => "nvlink_speed_check",
            CheckKind::Eth0Presence => "eth0_presence_check",
            CheckKind::CdfpCable => "cdfp_cable_check",
            CheckKind::PcieWidthMissingLanes => "pcie_width_missing_lanes_check",
            CheckKind::FabricManager => "fabricmanager_check",
            CheckKind::HcaError => "hca_error_check",
            CheckKind::MissingInterface => "missing_interface_check",
            CheckKind::GpuXid => "gpu_xid_check",
            CheckKind::MaxAcc => "max_acc_check",
            CheckKind::RowRemapError => "row_remap_error_check",
        }
    }

    /// Row label in the table format.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::GpuCount => "GPU Count Check",
            CheckKind::GpuMode => "GPU Mode Check",
            CheckKind::PcieError => "PCIe Error Check",
            CheckKind::RdmaNicsCount => "RDMA NIC Count",
            CheckKind::RxDiscards => "Network RX Discards",
            CheckKind::GidIndex => "GID Index Check",
            CheckKind::Link => "RDMA Link Check",
            CheckKind::EthLink => "Ethernet Link Check",
            CheckKind::Auth => "Authentication Check",
            CheckKind::SramError => "SRAM Error Check",
            CheckKind::GpuDriver => "GPU Driver Check",
            CheckKind::GpuClock => "GPU Clock Check",
            CheckKind::PeerMemModule => "PeerMem Module Check",
            CheckKind::NvlinkSpeed => "NVLink Speed Check",
            CheckKind::Eth0Presence => "Eth0 Presence Check",
            CheckKind::CdfpCable => "CDFP Cable Check",
            CheckKind::PcieWidthMissingLanes => "PCIe Width Check",
            CheckKind::FabricManager => "Fabric Manager Check",
            CheckKind::HcaError => "HCA Error Check",
            CheckKind::MissingInterface => "Missing Interface Check",
            CheckKind::GpuXid => "GPU XID Check",
            CheckKind::MaxAcc => "MAX_ACC Config Check",
            CheckKind::RowRemapError => "Row Remap Error Check",
        }
    }

    /// Section heading in the friendly format.
    pub fn heading(&self) -> &'static str {
        match self {
            CheckKind::GpuCount => "🖥️  GPU Health Check",
            CheckKind::GpuMode => "🖥️  GPU Mode Check",
            CheckKind::PcieError => "🔗 PCIe Health Check",
            CheckKind::RdmaNicsCount => "🌐 RDMA Network Check",
            CheckKind::RxDiscards => "🌐 Network RX Discards Check",
            CheckKind::GidIndex => "🔗 GID Index Check",
            CheckKind::Link => "🌐 RDMA Link Health Check",
            CheckKind::EthLink => "🌐 Ethernet Link Health Check",
            CheckKind::Auth => "🔐 Authentication Check",
            CheckKind::SramError => "💾 SRAM Error Check",
            CheckKind::GpuDriver => "🎮 GPU Driver Health Check",
            CheckKind::GpuClock => "⏱️ GPU Clock Speed Check",
            CheckKind::PeerMemModule => "🔧 PeerMem Module Check",
            CheckKind::NvlinkSpeed => "🔗 NVLink Health Check",
            CheckKind::Eth0Presence => "🌐 Eth0 Interface Check",
            CheckKind::CdfpCable => "🔌 CDFP Cable Health Check",
            CheckKind::PcieWidthMissingLanes => "🔗 PCIe Link Width Check",
            CheckKind::FabricManager => "🧵 Fabric Manager Check",
            CheckKind::HcaError => "🌐 HCA Error Check",
            CheckKind::MissingInterface => "🔌 Missing Interface Check",
            CheckKind::GpuXid => "🎮 GPU XID Error Check",
            CheckKind::MaxAcc => "🔧 MAX_ACC_OUT_READ Check",
            CheckKind::RowRemapError => "💾 GPU Row Remap Check",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CheckKind::GpuCount => "Check GPU count using nvidia-smi",
            CheckKind::GpuMode => "Check if GPU is in Multi-Instance GPU (MIG) mode",
            CheckKind::PcieError => "Check for PCIe errors in system logs",
            CheckKind::RdmaNicsCount => "Check RDMA NICs count",
            CheckKind::RxDiscards => "Check network interfaces for RX discards",
            CheckKind::GidIndex => "Check device GID indexes are in range",
            CheckKind::Link => "Check RDMA link state and parameters",
            CheckKind::EthLink => "Check Ethernet link state and parameters for RoCE interfaces",
            CheckKind::Auth => "Check authentication status of RDMA interfaces",
            CheckKind::SramError => "Check SRAM correctable and uncorrectable errors",
            CheckKind::GpuDriver => "Check GPU driver version compatibility",
            CheckKind::GpuClock => "Check GPU clock speeds are within acceptable range",
            CheckKind::PeerMemModule => "Check for presence of the nvidia_peermem module",
            CheckKind::NvlinkSpeed => "Check NVLink presence, count and speed",
            CheckKind::Eth0Presence => "Check if the eth0 network interface is present",
            CheckKind::CdfpCable => "Check CDFP cable connections between GPUs",
            CheckKind::PcieWidthMissingLanes => "Check PCIe link width and speed for missing lanes",
            CheckKind::FabricManager => "Check if the nvidia-fabricmanager service is running",
            CheckKind::HcaError => "Check for MLX5 HCA fatal errors in system logs",
            CheckKind::MissingInterface => "Check for missing PCIe interfaces (revision ff)",
            CheckKind::GpuXid => "Check for NVIDIA GPU XID errors in system logs",
            CheckKind::MaxAcc => "Check MAX_ACC_OUT_READ and ADVANCED_PCI_SETTINGS configuration",
            CheckKind::RowRemapError => "Check for GPU row remap errors",
        }
    }

    pub fn from_name(name: &str) -> Option<CheckKind> {
        CheckKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The latest outcome recorded for one check name.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub name: String,
    pub status: Status,
    pub details: Details,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl CheckResult {
    /// Submission time as RFC3339 UTC with second precision ("...Z").
    pub fn timestamp_utc(&self) -> String {
        format_rfc3339(&self.timestamp)
    }
}

pub fn format_rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One externally supplied result, as read by `hpc-healthcheck report --results`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Submission {
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub details: Details,
    #[serde(default)]
    pub error: Option<String>,
}

/// Strongly typed payload for each known check kind.
///
/// Checks hand these to `Reporter::record` instead of packing an open map by
/// hand. Structured sub-results the reporter does not interpret (link tables,
/// per-interface auth state, ...) are carried as opaque JSON values.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckDetails {
    GpuCount { gpu_count: u64 },
    GpuMode { message: String, enabled_gpu_indexes: Vec<String> },
    PcieError,
    RdmaNicsCount { rdma_nic_count: u64 },
    RxDiscards { interface_count: u64, failed_interfaces: Vec<String> },
    GidIndex { invalid_indexes: Vec<i64> },
    Link { links: Value },
    EthLink { eth_links: Value },
    Auth { interfaces: Value },
    SramError { max_uncorrectable: u64, max_correctable: u64 },
    GpuDriver { driver_version: String },
    GpuClock { message: String },
    PeerMemModule { module_loaded: bool },
    NvlinkSpeed { nvlinks: Value },
    Eth0Presence { eth0_present: bool },
    CdfpCable { cdfp_result: Option<Value> },
    PcieWidthMissingLanes {
        gpu_widths: Value,
        rdma_widths: Value,
        gpu_speeds: Value,
        rdma_speeds: Value,
        state_errors: Value,
    },
    FabricManager { is_running: bool, service_info: String, message: String },
    HcaError,
    MissingInterface { missing_count: u64 },
    GpuXid { message: String, critical_errors: Value, warning_errors: Value },
    MaxAcc { pcie_config: Value },
    RowRemapError { failure_count: u64 },
}

impl CheckDetails {
    pub fn kind(&self) -> CheckKind {
        match self {
            CheckDetails::GpuCount { .. } => CheckKind::GpuCount,
            CheckDetails::GpuMode { .. } => CheckKind::GpuMode,
            CheckDetails::PcieError => CheckKind::PcieError,
            CheckDetails::RdmaNicsCount { .. } => CheckKind::RdmaNicsCount,
            CheckDetails::RxDiscards { .. } => CheckKind::RxDiscards,
            CheckDetails::GidIndex { .. } => CheckKind::GidIndex,
            CheckDetails::Link { .. } => CheckKind::Link,
            CheckDetails::EthLink { .. } => CheckKind::EthLink,
            CheckDetails::Auth { .. } => CheckKind::Auth,
            CheckDetails::SramError { .. } => CheckKind::SramError,
            CheckDetails::GpuDriver { .. } => CheckKind::GpuDriver,
            CheckDetails::GpuClock { .. } => CheckKind::GpuClock,
            CheckDetails::PeerMemModule { .. } => CheckKind::PeerMemModule,
            CheckDetails::NvlinkSpeed { .. } => CheckKind::NvlinkSpeed,
            CheckDetails::Eth0Presence { .. } => CheckKind::Eth0Presence,
            CheckDetails::CdfpCable { .. } => CheckKind::CdfpCable,
            CheckDetails::PcieWidthMissingLanes { .. } => CheckKind::PcieWidthMissingLanes,
            CheckDetails::FabricManager { .. } => CheckKind::FabricManager,
            CheckDetails::HcaError => CheckKind::HcaError,
            CheckDetails::MissingInterface { .. } => CheckKind::MissingInterface,
            CheckDetails::GpuXid { .. } => CheckKind::GpuXid,
            CheckDetails::MaxAcc { .. } => CheckKind::MaxAcc,
            CheckDetails::RowRemapError { .. } => CheckKind::RowRemapError,
        }
    }

    /// Flatten into the stored details map.
    ///
    /// A few kinds only record part of their payload depending on the status:
    /// RX discard failures only on FAIL, NVLink details only when not PASS.
    pub fn into_details(self, status: Status) -> Details {
        let mut details = Details::new();
        let mut put = |key: &str, value: Value| {
            details.insert(key.to_string(), value);
        };

        match self {
            CheckDetails::GpuCount { gpu_count } => put("gpu_count", gpu_count.into()),
            CheckDetails::GpuMode { message, enabled_gpu_indexes } => {
                put("message", message.into());
                put("enabled_gpu_indexes", enabled_gpu_indexes.into());
            }
            CheckDetails::PcieError | CheckDetails::HcaError => {}
            CheckDetails::RdmaNicsCount { rdma_nic_count } => put("rdma_nic_count", rdma_nic_count.into()),
            CheckDetails::RxDiscards { interface_count, failed_interfaces } => {
                put("interface_count", interface_count.into());
                if status == Status::Fail {
                    put("failed_count", (failed_interfaces.len() as u64).into());
                    put("failed_interfaces", failed_interfaces.join(",").into());
                }
            }
            CheckDetails::GidIndex { invalid_indexes } => put("invalid_indexes", invalid_indexes.into()),
            CheckDetails::Link { links } => put("links", links),
            CheckDetails::EthLink { eth_links } => put("eth_links", eth_links),
            CheckDetails::Auth { interfaces } => put("interfaces", interfaces),
            CheckDetails::SramError { max_uncorrectable, max_correctable } => {
                put("max_uncorrectable", max_uncorrectable.into());
                put("max_correctable", max_correctable.into());
            }
            CheckDetails::GpuDriver { driver_version } => put("driver_version", driver_version.into()),
            CheckDetails::GpuClock { message } => put("message", message.into()),
            CheckDetails::PeerMemModule { module_loaded } => put("module_loaded", module_loaded.into()),
            CheckDetails::NvlinkSpeed { nvlinks } => {
                if status != Status::Pass {
                    put("nvlinks", nvlinks);
                }
            }
            CheckDetails::Eth0Presence { eth0_present } => put("eth0_present", eth0_present.into()),
            CheckDetails::CdfpCable { cdfp_result } => {
                if let Some(result) = cdfp_result {
                    put("cdfp_result", result);
                }
            }
            CheckDetails::PcieWidthMissingLanes { gpu_widths, rdma_widths, gpu_speeds, rdma_speeds, state_errors } => {
                put("gpu_widths", gpu_widths);
                put("rdma_widths", rdma_widths);
                put("gpu_speeds", gpu_speeds);
                put("rdma_speeds", rdma_speeds);
                put("state_errors", state_errors);
            }
            CheckDetails::FabricManager { is_running, service_info, message } => {
                put("is_running", is_running.into());
                put("service_info", service_info.into());
                put("message", message.into());
            }
            CheckDetails::MissingInterface { missing_count } => put("missing_count", missing_count.into()),
            CheckDetails::GpuXid { message, critical_errors, warning_errors } => {
                put("message", message.into());
                put("critical_errors", critical_errors);
                put("warning_errors", warning_errors);
            }
            CheckDetails::MaxAcc { pcie_config } => put("pcie_config", pcie_config),
            CheckDetails::RowRemapError { failure_count } => put("failure_count", failure_count.into()),
        }

        details
    }
}

//! Report schema: typed per-check reports and the documents built from them.
//!
//! Field names are part of the on-disk format and must not change. Optional
//! fields are omitted when zero/empty and default back to zero when parsed,
//! so a rendered report parses back into an identical value.

use crate::types::{CheckKind, Status};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_zero(n: &u64) -> bool {
    *n == 0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuCountReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gpu_count: u64,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuModeReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled_gpu_indexes: Vec<String>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcieErrorReport {
    pub status: Status,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdmaNicsReport {
    pub status: Status,
    #[serde(default)]
    pub num_rdma_nics: u64,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RxDiscardsReport {
    #[serde(default)]
    pub interface_count: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub failed_count: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub failed_interfaces: String,
    pub status: Status,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GidIndexReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_indexes: Vec<i64>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthLinkReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_links: Option<Value>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Value>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SramErrorReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_uncorrectable: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_correctable: u64,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuDriverReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub driver_version: String,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuClockReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerMemReport {
    pub status: Status,
    #[serde(default)]
    pub module_loaded: bool,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NvlinkReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nvlinks: Option<Value>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eth0PresenceReport {
    pub status: Status,
    #[serde(default)]
    pub eth0_present: bool,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdfpCableReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdfp_result: Option<Value>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcieWidthReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_widths: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdma_widths: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_speeds: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdma_speeds: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_errors: Option<Value>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricManagerReport {
    pub status: Status,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_info: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HcaErrorReport {
    pub status: Status,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingInterfaceReport {
    pub status: Status,
    #[serde(default)]
    pub missing_count: u64,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuXidReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_errors: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_errors: Option<Value>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxAccReport {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcie_config: Option<Value>,
    #[serde(default)]
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRemapReport {
    pub status: Status,
    #[serde(default)]
    pub failure_count: u64,
    #[serde(default)]
    pub timestamp_utc: String,
}

/// Declares `HostResults` (one zero-or-one element list per check kind) and
/// the borrowed `ReportEntry` view used by the renderers, from a single list
/// so the two can never disagree on kinds or order.
macro_rules! host_results {
    ($( $field:ident: $variant:ident($ty:ty) => $kind:expr ),* $(,)?) => {
        /// Everything currently known about this host.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct HostResults {
            $(
                #[serde(default, skip_serializing_if = "Vec::is_empty")]
                pub $field: Vec<$ty>,
            )*
        }

        /// A single populated report, borrowed from `HostResults`.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum ReportEntry<'a> {
            $( $variant(&'a $ty), )*
        }

        impl HostResults {
            /// All populated reports, in schema order.
            pub fn entries(&self) -> Vec<ReportEntry<'_>> {
                let mut entries = Vec::new();
                $( entries.extend(self.$field.iter().map(ReportEntry::$variant)); )*
                entries
            }
        }

        impl ReportEntry<'_> {
            pub fn kind(&self) -> CheckKind {
                match self {
                    $( ReportEntry::$variant(_) => $kind, )*
                }
            }

            pub fn status(&self) -> Status {
                match self {
                    $( ReportEntry::$variant(r) => r.status, )*
                }
            }

            pub fn timestamp_utc(&self) -> &str {
                match self {
                    $( ReportEntry::$variant(r) => &r.timestamp_utc, )*
                }
            }
        }
    };
}

host_results! {
    gpu_count_check: GpuCount(GpuCountReport) => CheckKind::GpuCount,
    gpu_mode_check: GpuMode(GpuModeReport) => CheckKind::GpuMode,
    pcie_error_check: PcieError(PcieErrorReport) => CheckKind::PcieError,
    rdma_nics_count: RdmaNicsCount(RdmaNicsReport) => CheckKind::RdmaNicsCount,
    rx_discards_check: RxDiscards(RxDiscardsReport) => CheckKind::RxDiscards,
    gid_index_check: GidIndex(GidIndexReport) => CheckKind::GidIndex,
    link_check: Link(LinkReport) => CheckKind::Link,
    eth_link_check: EthLink(EthLinkReport) => CheckKind::EthLink,
    auth_check: Auth(AuthReport) => CheckKind::Auth,
    sram_error_check: SramError(SramErrorReport) => CheckKind::SramError,
    gpu_driver_check: GpuDriver(GpuDriverReport) => CheckKind::GpuDriver,
    gpu_clk_check: GpuClock(GpuClockReport) => CheckKind::GpuClock,
    peermem_module_check: PeerMemModule(PeerMemReport) => CheckKind::PeerMemModule,
    nvlink_speed_check: NvlinkSpeed(NvlinkReport) => CheckKind::NvlinkSpeed,
    eth0_presence_check: Eth0Presence(Eth0PresenceReport) => CheckKind::Eth0Presence,
    cdfp_cable_check: CdfpCable(CdfpCableReport) => CheckKind::CdfpCable,
    pcie_width_missing_lanes_check: PcieWidthMissingLanes(PcieWidthReport) => CheckKind::PcieWidthMissingLanes,
    fabricmanager_check: FabricManager(FabricManagerReport) => CheckKind::FabricManager,
    hca_error_check: HcaError(HcaErrorReport) => CheckKind::HcaError,
    missing_interface_check: MissingInterface(MissingInterfaceReport) => CheckKind::MissingInterface,
    gpu_xid_check: GpuXid(GpuXidReport) => CheckKind::GpuXid,
    max_acc_check: MaxAcc(MaxAccReport) => CheckKind::MaxAcc,
    row_remap_error_check: RowRemapError(RowRemapReport) => CheckKind::RowRemapError,
}

impl HostResults {
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Snapshot of one execution: `{"localhost": {...}}`.
///
/// Also the legacy single-run on-disk format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportOutput {
    #[serde(rename = "localhost")]
    pub host: HostResults,
}

/// One historical execution inside an appended report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    pub run_id: String,
    pub timestamp: String,
    #[serde(default)]
    pub test_results: HostResults,
}

/// Durable multi-run format. Runs are append-only, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppendedReport {
    pub test_runs: Vec<TestRun>,
}

impl AppendedReport {
    pub fn latest(&self) -> Option<&TestRun> {
        self.test_runs.last()
    }

    pub fn find(&self, run_id: &str) -> Option<&TestRun> {
        self.test_runs.iter().find(|run| run.run_id == run_id)
    }
}

/// Summary statistics for a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestSummary {
    /// Counted checks (SKIP excluded)
    pub total: usize,
    /// PASS and WARN
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub skipped: usize,
}

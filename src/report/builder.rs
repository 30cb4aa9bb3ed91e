//! Projection of stored check results into the typed report schema.
//!
//! Extraction is deliberately lenient: a missing field, or one holding a
//! value of the wrong type, takes its zero value and the build carries on.
//! Wrongly typed values are logged at warn level so caller bugs stay visible.

use super::types::*;
use crate::types::{CheckKind, CheckResult, Details};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

/// Build a report from a store snapshot.
///
/// Pure: the same snapshot always yields the same report, because every
/// timestamp comes from the stored result rather than the clock.
pub fn build(snapshot: &HashMap<String, CheckResult>) -> ReportOutput {
    let mut host = HostResults::default();

    for kind in CheckKind::ALL {
        if let Some(result) = snapshot.get(kind.name()) {
            project(kind, result, &mut host);
        }
    }

    for name in snapshot.keys().filter(|name| CheckKind::from_name(name).is_none()) {
        debug!("Result '{}' has no report schema; counted but not projected", name);
    }

    ReportOutput { host }
}

fn project(kind: CheckKind, result: &CheckResult, host: &mut HostResults) {
    let f = Fields { check: &result.name, details: &result.details };
    let status = result.status;
    let timestamp_utc = result.timestamp_utc();

    match kind {
        CheckKind::GpuCount => {
            host.gpu_count_check = vec![GpuCountReport { status, gpu_count: f.uint("gpu_count"), timestamp_utc }];
        }
        CheckKind::GpuMode => {
            host.gpu_mode_check = vec![GpuModeReport {
                status,
                message: f.string("message"),
                enabled_gpu_indexes: f.string_list("enabled_gpu_indexes"),
                timestamp_utc,
            }];
        }
        CheckKind::PcieError => {
            host.pcie_error_check = vec![PcieErrorReport { status, timestamp_utc }];
        }
        CheckKind::RdmaNicsCount => {
            host.rdma_nics_count =
                vec![RdmaNicsReport { status, num_rdma_nics: f.uint("rdma_nic_count"), timestamp_utc }];
        }
        CheckKind::RxDiscards => {
            host.rx_discards_check = vec![RxDiscardsReport {
                interface_count: f.uint("interface_count"),
                failed_count: f.uint("failed_count"),
                failed_interfaces: f.string("failed_interfaces"),
                status,
                timestamp_utc,
            }];
        }
        CheckKind::GidIndex => {
            host.gid_index_check =
                vec![GidIndexReport { status, invalid_indexes: f.int_list("invalid_indexes"), timestamp_utc }];
        }
        CheckKind::Link => {
            host.link_check = vec![LinkReport { status, links: f.opaque("links"), timestamp_utc }];
        }
        CheckKind::EthLink => {
            host.eth_link_check = vec![EthLinkReport { status, eth_links: f.opaque("eth_links"), timestamp_utc }];
        }
        CheckKind::Auth => {
            host.auth_check = vec![AuthReport { status, interfaces: f.opaque("interfaces"), timestamp_utc }];
        }
        CheckKind::SramError => {
            host.sram_error_check = vec![SramErrorReport {
                status,
                max_uncorrectable: f.uint("max_uncorrectable"),
                max_correctable: f.uint("max_correctable"),
                timestamp_utc,
            }];
        }
        CheckKind::GpuDriver => {
            host.gpu_driver_check =
                vec![GpuDriverReport { status, driver_version: f.string("driver_version"), timestamp_utc }];
        }
        CheckKind::GpuClock => {
            host.gpu_clk_check = vec![GpuClockReport { status, message: f.string("message"), timestamp_utc }];
        }
        CheckKind::PeerMemModule => {
            host.peermem_module_check =
                vec![PeerMemReport { status, module_loaded: f.boolean("module_loaded"), timestamp_utc }];
        }
        CheckKind::NvlinkSpeed => {
            host.nvlink_speed_check = vec![NvlinkReport { status, nvlinks: f.opaque("nvlinks"), timestamp_utc }];
        }
        CheckKind::Eth0Presence => {
            host.eth0_presence_check =
                vec![Eth0PresenceReport { status, eth0_present: f.boolean("eth0_present"), timestamp_utc }];
        }
        CheckKind::CdfpCable => {
            host.cdfp_cable_check =
                vec![CdfpCableReport { status, cdfp_result: f.opaque("cdfp_result"), timestamp_utc }];
        }
        CheckKind::PcieWidthMissingLanes => {
            host.pcie_width_missing_lanes_check = vec![PcieWidthReport {
                status,
                gpu_widths: f.opaque("gpu_widths"),
                rdma_widths: f.opaque("rdma_widths"),
                gpu_speeds: f.opaque("gpu_speeds"),
                rdma_speeds: f.opaque("rdma_speeds"),
                state_errors: f.opaque("state_errors"),
                timestamp_utc,
            }];
        }
        CheckKind::FabricManager => {
            host.fabricmanager_check = vec![FabricManagerReport {
                status,
                is_running: f.boolean("is_running"),
                service_info: f.string("service_info"),
                message: f.string("message"),
                timestamp_utc,
            }];
        }
        CheckKind::HcaError => {
            host.hca_error_check = vec![HcaErrorReport { status, timestamp_utc }];
        }
        CheckKind::MissingInterface => {
            host.missing_interface_check =
                vec![MissingInterfaceReport { status, missing_count: f.uint("missing_count"), timestamp_utc }];
        }
        CheckKind::GpuXid => {
            host.gpu_xid_check = vec![GpuXidReport {
                status,
                message: f.string("message"),
                critical_errors: f.opaque("critical_errors"),
                warning_errors: f.opaque("warning_errors"),
                timestamp_utc,
            }];
        }
        CheckKind::MaxAcc => {
            host.max_acc_check = vec![MaxAccReport { status, pcie_config: f.opaque("pcie_config"), timestamp_utc }];
        }
        CheckKind::RowRemapError => {
            host.row_remap_error_check =
                vec![RowRemapReport { status, failure_count: f.uint("failure_count"), timestamp_utc }];
        }
    }
}

/// Typed, never-failing reads from one result's details map.
struct Fields<'a> {
    check: &'a str,
    details: &'a Details,
}

impl Fields<'_> {
    /// JSON `null` counts as absent.
    fn get(&self, key: &str) -> Option<&Value> {
        self.details.get(key).filter(|v| !v.is_null())
    }

    fn mismatch(&self, key: &str, expected: &str, found: &Value) {
        warn!("{}: detail '{}' should be {} but is {}; using zero value", self.check, key, expected, found);
    }

    fn uint(&self, key: &str) -> u64 {
        match self.get(key) {
            None => 0,
            Some(v) => v.as_u64().unwrap_or_else(|| {
                self.mismatch(key, "an unsigned integer", v);
                0
            }),
        }
    }

    fn string(&self, key: &str) -> String {
        match self.get(key) {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(v) => {
                self.mismatch(key, "a string", v);
                String::new()
            }
        }
    }

    fn boolean(&self, key: &str) -> bool {
        match self.get(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(v) => {
                self.mismatch(key, "a boolean", v);
                false
            }
        }
    }

    /// All-or-nothing: one bad element empties the whole list.
    fn int_list(&self, key: &str) -> Vec<i64> {
        let Some(v) = self.get(key) else {
            return Vec::new();
        };
        let parsed = v.as_array().and_then(|items| items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>());
        parsed.unwrap_or_else(|| {
            self.mismatch(key, "a list of integers", v);
            Vec::new()
        })
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        let Some(v) = self.get(key) else {
            return Vec::new();
        };
        let parsed = v
            .as_array()
            .and_then(|items| items.iter().map(|i| i.as_str().map(str::to_string)).collect::<Option<Vec<_>>>());
        parsed.unwrap_or_else(|| {
            self.mismatch(key, "a list of strings", v);
            Vec::new()
        })
    }

    /// Structured payloads pass through uninspected.
    fn opaque(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ResultStore;
    use crate::types::{CheckDetails, Status};
    use serde_json::json;

    fn details(value: Value) -> Details {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_gpu_count_projection() {
        let store = ResultStore::new();
        store.submit("gpu_count_check", Status::Pass, details(json!({"gpu_count": 8})), None);

        let report = build(&store.get_all());
        let gpu = &report.host.gpu_count_check[0];
        assert_eq!(gpu.status, Status::Pass);
        assert_eq!(gpu.gpu_count, 8);
        assert!(chrono::DateTime::parse_from_rfc3339(&gpu.timestamp_utc).is_ok());
        assert!(gpu.timestamp_utc.ends_with('Z'));
    }

    #[test]
    fn test_wrong_types_degrade_to_zero_values() {
        let store = ResultStore::new();
        store.submit("gpu_count_check", Status::Pass, details(json!({"gpu_count": "eight"})), None);
        store.submit("peermem_module_check", Status::Fail, details(json!({"module_loaded": "yes"})), None);
        store.submit("gpu_driver_check", Status::Warn, details(json!({"driver_version": 535})), None);
        store.submit("gid_index_check", Status::Fail, details(json!({"invalid_indexes": [1, "two", 3]})), None);
        store.submit("gpu_mode_check", Status::Fail, details(json!({"enabled_gpu_indexes": "0,1"})), None);

        let host = build(&store.get_all()).host;
        assert_eq!(host.gpu_count_check[0].gpu_count, 0);
        assert!(!host.peermem_module_check[0].module_loaded);
        assert_eq!(host.gpu_driver_check[0].driver_version, "");
        assert!(host.gid_index_check[0].invalid_indexes.is_empty());
        assert!(host.gpu_mode_check[0].enabled_gpu_indexes.is_empty());
    }

    #[test]
    fn test_missing_details_degrade_to_zero_values() {
        let store = ResultStore::new();
        store.submit("sram_error_check", Status::Pass, Details::new(), None);
        store.submit("link_check", Status::Fail, details(json!({"links": null})), None);

        let host = build(&store.get_all()).host;
        assert_eq!(host.sram_error_check[0].max_correctable, 0);
        assert_eq!(host.sram_error_check[0].max_uncorrectable, 0);
        assert_eq!(host.link_check[0].links, None);
    }

    #[test]
    fn test_typed_lists_reconstructed() {
        let store = ResultStore::new();
        store.submit(
            "gid_index_check",
            Status::Fail,
            CheckDetails::GidIndex { invalid_indexes: vec![4, 7] }.into_details(Status::Fail),
            Some("invalid GID index"),
        );
        store.submit(
            "gpu_mode_check",
            Status::Fail,
            CheckDetails::GpuMode { message: "MIG on".into(), enabled_gpu_indexes: vec!["0".into(), "3".into()] }
                .into_details(Status::Fail),
            None,
        );

        let host = build(&store.get_all()).host;
        assert_eq!(host.gid_index_check[0].invalid_indexes, vec![4, 7]);
        assert_eq!(host.gpu_mode_check[0].enabled_gpu_indexes, vec!["0", "3"]);
        assert_eq!(host.gpu_mode_check[0].message, "MIG on");
    }

    #[test]
    fn test_opaque_payload_carried_through() {
        let links = json!([{"device": "mlx5_0", "state": "Active", "physical_state": "LinkUp"}]);
        let store = ResultStore::new();
        store.submit("link_check", Status::Pass, details(json!({ "links": links.clone() })), None);

        let host = build(&store.get_all()).host;
        assert_eq!(host.link_check[0].links, Some(links));
    }

    #[test]
    fn test_unknown_and_absent_kinds_not_projected() {
        let store = ResultStore::new();
        store.submit("custom_probe", Status::Pass, Details::new(), None);

        let report = build(&store.get_all());
        assert!(report.host.is_empty());
        assert!(report.host.entries().is_empty());
    }

    #[test]
    fn test_build_is_idempotent() {
        let store = ResultStore::new();
        store.submit("gpu_count_check", Status::Pass, details(json!({"gpu_count": 8})), None);
        store.submit("pcie_error_check", Status::Fail, Details::new(), Some("PCIe error found"));

        let snapshot = store.get_all();
        assert_eq!(build(&snapshot), build(&snapshot));
    }

    #[test]
    fn test_entries_follow_schema_order() {
        let store = ResultStore::new();
        store.submit("row_remap_error_check", Status::Pass, Details::new(), None);
        store.submit("cdfp_cable_check", Status::Skip, Details::new(), None);
        store.submit("gpu_count_check", Status::Pass, Details::new(), None);

        let report = build(&store.get_all());
        let kinds: Vec<CheckKind> = report.host.entries().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![CheckKind::GpuCount, CheckKind::CdfpCable, CheckKind::RowRemapError]);
    }
}

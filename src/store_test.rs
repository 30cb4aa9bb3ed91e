/// Tests for the result store
///
/// These cover last-write-wins replacement, the derived queries and
/// concurrent submission from many threads.

#[cfg(test)]
mod tests {
    use crate::store::ResultStore;
    use crate::types::{Details, Status};
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn details(pairs: &[(&str, serde_json::Value)]) -> Details {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_last_write_wins() {
        let store = ResultStore::new();
        store.submit("gpu_count_check", Status::Fail, details(&[("gpu_count", json!(7))]), Some("expected 8"));
        store.submit("gpu_count_check", Status::Pass, details(&[("gpu_count", json!(8))]), None);

        assert_eq!(store.count(), 1);
        let result = store.get("gpu_count_check").expect("result should exist");
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.details.get("gpu_count"), Some(&json!(8)));
        // Replacement is total: the earlier error does not linger
        assert_eq!(result.error_message, None);
    }

    #[test]
    fn test_error_message_recorded() {
        let store = ResultStore::new();
        store.submit("pcie_error_check", Status::Fail, Details::new(), Some("PCIe error found"));

        let result = store.get("pcie_error_check").unwrap();
        assert_eq!(result.error_message.as_deref(), Some("PCIe error found"));
        assert_eq!(store.names_where_status(Status::Fail), vec!["pcie_error_check".to_string()]);
        assert!(store.names_where_status(Status::Pass).is_empty());
    }

    #[test]
    fn test_get_all_is_a_copy() {
        let store = ResultStore::new();
        store.submit("eth0_presence_check", Status::Pass, Details::new(), None);

        let mut snapshot = store.get_all();
        snapshot.clear();

        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_clear() {
        let store = ResultStore::new();
        store.submit("a", Status::Pass, Details::new(), None);
        store.submit("b", Status::Skip, Details::new(), None);
        assert_eq!(store.count(), 2);

        store.clear();
        assert_eq!(store.count(), 0);
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_names_where_status_sorted() {
        let store = ResultStore::new();
        store.submit("link_check", Status::Pass, Details::new(), None);
        store.submit("auth_check", Status::Pass, Details::new(), None);
        store.submit("gid_index_check", Status::Warn, Details::new(), None);

        assert_eq!(store.names_where_status(Status::Pass), vec!["auth_check", "link_check"]);
        assert_eq!(store.names_where_status(Status::Warn), vec!["gid_index_check"]);
    }

    #[test]
    fn test_concurrent_submissions() {
        let store = Arc::new(ResultStore::new());
        let mut handles = Vec::new();

        for t in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    let name = format!("check_{}", i % 10);
                    store.submit(&name, Status::Pass, details(&[("thread", json!(t))]), None);
                    let _ = store.count();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // Exactly one entry per distinct name, however the writes interleaved
        assert_eq!(store.count(), 10);
    }
}

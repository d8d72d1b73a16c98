// ── Cross-collection reconciliation ──
//
// The store does not enforce `mobileId` references, so wishlist entries
// can outlive their device. These helpers find such entries and remove
// them best-effort, one at a time.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::manager::WishlistManager;
use crate::model::{Device, RecordId, WishlistEntry};
use crate::remote::RemoteStore;

/// Outcome of a batch of wishlist deletions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: Vec<RecordId>,
    pub failed: Vec<RecordId>,
}

impl RemovalReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.removed.len() + self.failed.len()
    }
}

/// Entries pointing at `device_id`, in wishlist order.
pub fn entries_referencing(
    wishlist: &[Arc<WishlistEntry>],
    device_id: &RecordId,
) -> Vec<Arc<WishlistEntry>> {
    wishlist
        .iter()
        .filter(|e| &e.mobile_id == device_id)
        .cloned()
        .collect()
}

/// Entries whose device no longer exists.
pub fn dangling_entries(
    wishlist: &[Arc<WishlistEntry>],
    devices: &[Arc<Device>],
) -> Vec<Arc<WishlistEntry>> {
    let known: HashSet<&RecordId> = devices.iter().map(|d| &d.id).collect();
    wishlist
        .iter()
        .filter(|e| !known.contains(&e.mobile_id))
        .cloned()
        .collect()
}

/// Delete `entries` sequentially. Failures are logged and skipped.
pub async fn purge_entries<R: RemoteStore>(
    wishlist: &WishlistManager<R>,
    entries: &[Arc<WishlistEntry>],
) -> RemovalReport {
    let mut report = RemovalReport::default();
    for entry in entries {
        match wishlist.delete_entry(&entry.id).await {
            Ok(()) => report.removed.push(entry.id.clone()),
            Err(e) => {
                warn!(entry = %entry.id, device = %entry.mobile_id, error = %e, "could not remove wishlist entry");
                report.failed.push(entry.id.clone());
            }
        }
    }
    report
}

/// Remove every wishlist entry that references `device_id`, according to
/// the current local wishlist.
pub async fn purge_references<R: RemoteStore>(
    wishlist: &WishlistManager<R>,
    device_id: &RecordId,
) -> RemovalReport {
    let entries = entries_referencing(&wishlist.snapshot(), device_id);
    if !entries.is_empty() {
        debug!(device = %device_id, count = entries.len(), "removing wishlist references");
    }
    purge_entries(wishlist, &entries).await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DeviceDraft;

    fn entry(id: &str, mobile_id: &str) -> Arc<WishlistEntry> {
        Arc::new(WishlistEntry {
            id: RecordId::from(id),
            mobile_id: RecordId::from(mobile_id),
            name: "Pixel 9".into(),
            brand: "Google".into(),
            price: None,
            image: None,
            added_at: None,
        })
    }

    fn device(id: &str) -> Arc<Device> {
        let now = Utc::now();
        Arc::new(Device::from_draft(
            RecordId::from(id),
            DeviceDraft::new("Pixel 9", "Google"),
            now,
            now,
        ))
    }

    fn ids(entries: &[Arc<WishlistEntry>]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn finds_every_reference_to_a_device() {
        let wishlist = vec![entry("w1", "1"), entry("w2", "2"), entry("w3", "1")];
        assert_eq!(ids(&entries_referencing(&wishlist, &RecordId::from("1"))), ["w1", "w3"]);
        assert!(entries_referencing(&wishlist, &RecordId::from("9")).is_empty());
    }

    #[test]
    fn dangling_entries_are_those_without_a_device() {
        let wishlist = vec![entry("w1", "1"), entry("w2", "2"), entry("w3", "3")];
        let devices = vec![device("2")];
        assert_eq!(ids(&dangling_entries(&wishlist, &devices)), ["w1", "w3"]);
        assert!(dangling_entries(&wishlist[1..], &devices).is_empty());
    }

    #[test]
    fn report_counts() {
        let report = RemovalReport {
            removed: vec![RecordId::from("w1")],
            failed: vec![RecordId::from("w2")],
        };
        assert_eq!(report.attempted(), 2);
        assert!(!report.is_clean());
        assert!(RemovalReport::default().is_clean());
    }
}

// ── Derived view state ──
//
// Everything a listing needs, computed from a store snapshot: the filtered
// rows, per-row wishlist/deleting flags, and the user-facing labels.

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{Device, RecordId, WishlistEntry};
use crate::store::DataStore;
use crate::stream::filter_devices;

pub const PRICE_NOT_SET: &str = "Price not set";

/// One listed device and its transient flags.
#[derive(Debug, Clone)]
pub struct DeviceRow {
    pub device: Arc<Device>,
    pub wishlisted: bool,
    /// A delete is in flight; the row should render as pending.
    pub deleting: bool,
}

/// The filtered device listing for one search query.
#[derive(Debug, Clone)]
pub struct DeviceView {
    pub query: String,
    pub rows: Vec<DeviceRow>,
    /// Device count before filtering.
    pub total: usize,
}

impl DeviceView {
    /// Compute the view from the store's current snapshots.
    pub fn build(store: &DataStore, query: &str) -> Self {
        Self::from_parts(
            &store.devices_snapshot(),
            &store.wishlist_snapshot(),
            &store.deleting_ids(),
            query,
        )
    }

    pub fn from_parts(
        devices: &[Arc<Device>],
        wishlist: &[Arc<WishlistEntry>],
        deleting: &HashSet<RecordId>,
        query: &str,
    ) -> Self {
        let wishlisted: HashSet<&RecordId> = wishlist.iter().map(|e| &e.mobile_id).collect();
        let rows = filter_devices(devices, query)
            .into_iter()
            .map(|device| DeviceRow {
                wishlisted: wishlisted.contains(&device.id),
                deleting: deleting.contains(&device.id),
                device,
            })
            .collect();

        Self {
            query: query.to_owned(),
            rows,
            total: devices.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_searching(&self) -> bool {
        !self.query.is_empty()
    }

    /// "1 device" / "3 devices", or "1 result" / "3 results" while searching.
    pub fn count_label(&self) -> String {
        let n = self.rows.len();
        let noun = match (self.is_searching(), n == 1) {
            (true, true) => "result",
            (true, false) => "results",
            (false, true) => "device",
            (false, false) => "devices",
        };
        format!("{n} {noun}")
    }

    /// Headline shown when there is nothing to list.
    pub fn empty_message(&self) -> &'static str {
        if self.is_searching() {
            "No matching devices found"
        } else {
            "Your collection is empty"
        }
    }
}

/// "2 items" style label for the wishlist page.
pub fn wishlist_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_owned()
    } else {
        format!("{count} items")
    }
}

/// Format a price in whole rupees with Indian digit grouping
/// (`₹1,23,456`). Absent and zero prices read "Price not set".
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price.filter(|p| p.is_finite() && *p != 0.0) else {
        return PRICE_NOT_SET.to_owned();
    };

    let digits = format!("{:.0}", price.abs());
    if digits == "0" {
        return "₹0".to_owned();
    }
    let sign = if price < 0.0 { "-" } else { "" };
    format!("{sign}₹{}", group_indian(&digits))
}

/// Last three digits, then groups of two: 12345678 -> 1,23,45,678.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DeviceDraft;

    fn device(id: &str, name: &str, brand: &str) -> Arc<Device> {
        let now = Utc::now();
        Arc::new(Device::from_draft(
            RecordId::from(id),
            DeviceDraft::new(name, brand),
            now,
            now,
        ))
    }

    fn entry(id: &str, mobile_id: &str) -> Arc<WishlistEntry> {
        Arc::new(WishlistEntry {
            id: RecordId::from(id),
            mobile_id: RecordId::from(mobile_id),
            name: String::new(),
            brand: String::new(),
            price: None,
            image: None,
            added_at: None,
        })
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(None), "Price not set");
        assert_eq!(format_price(Some(0.0)), "Price not set");
        assert_eq!(format_price(Some(999.0)), "₹999");
        assert_eq!(format_price(Some(1000.0)), "₹1,000");
        assert_eq!(format_price(Some(79_999.0)), "₹79,999");
        assert_eq!(format_price(Some(123_456.0)), "₹1,23,456");
        assert_eq!(format_price(Some(12_345_678.0)), "₹1,23,45,678");
        assert_eq!(format_price(Some(1_499.6)), "₹1,500");
        assert_eq!(format_price(Some(-2_500.0)), "-₹2,500");
    }

    #[test]
    fn rows_carry_wishlist_and_deleting_flags() {
        let devices = vec![device("1", "Pixel 9", "Google"), device("2", "Galaxy S24", "Samsung")];
        let wishlist = vec![entry("w1", "2")];
        let deleting: HashSet<RecordId> = [RecordId::from("1")].into_iter().collect();

        let view = DeviceView::from_parts(&devices, &wishlist, &deleting, "");
        assert_eq!(view.len(), 2);
        assert!(view.rows[0].deleting);
        assert!(!view.rows[0].wishlisted);
        assert!(view.rows[1].wishlisted);
        assert!(!view.rows[1].deleting);
        assert_eq!(view.count_label(), "2 devices");
    }

    #[test]
    fn labels_follow_search_state() {
        let devices = vec![device("1", "Galaxy S24", "Samsung")];
        let view = DeviceView::from_parts(&devices, &[], &HashSet::new(), "sams");
        assert_eq!(view.count_label(), "1 result");
        assert_eq!(view.total, 1);

        let none = DeviceView::from_parts(&devices, &[], &HashSet::new(), "nokia");
        assert!(none.is_empty());
        assert_eq!(none.count_label(), "0 results");
        assert_eq!(none.empty_message(), "No matching devices found");

        let empty = DeviceView::from_parts(&[], &[], &HashSet::new(), "");
        assert_eq!(empty.empty_message(), "Your collection is empty");
        assert_eq!(wishlist_label(1), "1 item");
        assert_eq!(wishlist_label(0), "0 items");
    }

    #[test]
    fn builds_from_store() {
        let store = DataStore::new();
        let view = DeviceView::build(&store, "");
        assert!(view.is_empty());
        assert_eq!(view.total, 0);
    }
}

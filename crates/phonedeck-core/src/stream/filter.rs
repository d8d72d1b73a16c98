// ── Device search and filter predicates ──
//
// Pure functions over snapshots; nothing here mutates or re-queries.

use std::borrow::Borrow;

use crate::model::Device;

/// Case-insensitive substring match over the searchable text fields.
/// The empty query matches every device.
pub fn matches_query(device: &Device, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    device
        .searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// The devices matching `query`, in their original order.
pub fn filter_devices<D>(devices: &[D], query: &str) -> Vec<D>
where
    D: Borrow<Device> + Clone,
{
    devices
        .iter()
        .filter(|d| matches_query(<D as Borrow<Device>>::borrow(d), query))
        .cloned()
        .collect()
}

/// Filter predicate for device listings.
pub enum DeviceFilter {
    All,
    Search(String),
    /// Exact brand, ignoring case.
    Brand(String),
    /// Rated at least this many stars; unrated devices never match.
    MinRating(u8),
    Custom(Box<dyn Fn(&Device) -> bool + Send + Sync>),
}

impl DeviceFilter {
    pub fn matches(&self, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::Search(query) => matches_query(device, query),
            Self::Brand(brand) => device.brand.trim().eq_ignore_ascii_case(brand.trim()),
            Self::MinRating(min) => device.rating.is_some_and(|r| r >= *min),
            Self::Custom(f) => f(device),
        }
    }

    /// Apply several filters at once; a device must pass all of them.
    pub fn apply_all<D>(filters: &[Self], devices: &[D]) -> Vec<D>
    where
        D: Borrow<Device> + Clone,
    {
        devices
            .iter()
            .filter(|d| {
                let device = <D as Borrow<Device>>::borrow(d);
                filters.iter().all(|f| f.matches(device))
            })
            .cloned()
            .collect()
    }
}

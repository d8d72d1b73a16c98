// ── Central reactive data store ──
//
// Thread-safe storage for the catalog collections. Each collection has a
// single writer (its manager); everyone else reads snapshots or subscribes.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::error::Banner;
use crate::model::{Device, RecordId, Review, WishlistEntry};
use crate::stream::EntityStream;

/// Central reactive store for devices, wishlist entries and cached reviews.
///
/// Reads are wait-free snapshot clones. Mutations are broadcast to
/// subscribers via `watch` channels.
pub struct DataStore {
    pub(crate) devices: EntityCollection<Device>,
    pub(crate) wishlist: EntityCollection<WishlistEntry>,
    /// Reviews fetched per device, keyed by device id.
    pub(crate) reviews: DashMap<RecordId, Arc<Vec<Review>>>,
    /// Device ids with a delete in flight, counted per overlapping call.
    pub(crate) deleting: DashMap<RecordId, usize>,
    pub(crate) banner: watch::Sender<Option<Banner>>,
    pub(crate) last_device_load: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (banner, _) = watch::channel(None);
        let (last_device_load, _) = watch::channel(None);

        Self {
            devices: EntityCollection::new(),
            wishlist: EntityCollection::new(),
            reviews: DashMap::new(),
            deleting: DashMap::new(),
            banner,
            last_device_load,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.devices.snapshot()
    }

    pub fn wishlist_snapshot(&self) -> Arc<Vec<Arc<WishlistEntry>>> {
        self.wishlist.snapshot()
    }

    /// Cached reviews for a device, if they have been fetched.
    pub fn reviews_for(&self, device_id: &RecordId) -> Option<Arc<Vec<Review>>> {
        self.reviews.get(device_id).map(|r| Arc::clone(r.value()))
    }

    // ── Single-record lookups ────────────────────────────────────────

    pub fn device(&self, id: &RecordId) -> Option<Arc<Device>> {
        self.devices.get(id)
    }

    pub fn wishlist_entry(&self, id: &RecordId) -> Option<Arc<WishlistEntry>> {
        self.wishlist.get(id)
    }

    /// First wishlist entry pointing at `device_id`, in store order.
    pub fn wishlist_entry_for(&self, device_id: &RecordId) -> Option<Arc<WishlistEntry>> {
        self.wishlist
            .snapshot()
            .iter()
            .find(|e| &e.mobile_id == device_id)
            .cloned()
    }

    pub fn is_wishlisted(&self, device_id: &RecordId) -> bool {
        self.wishlist_entry_for(device_id).is_some()
    }

    pub fn is_deleting(&self, device_id: &RecordId) -> bool {
        self.deleting.contains_key(device_id)
    }

    pub fn deleting_ids(&self) -> HashSet<RecordId> {
        self.deleting.iter().map(|r| r.key().clone()).collect()
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_devices(&self) -> EntityStream<Device> {
        EntityStream::new(self.devices.subscribe())
    }

    pub fn subscribe_wishlist(&self) -> EntityStream<WishlistEntry> {
        EntityStream::new(self.wishlist.subscribe())
    }

    pub fn subscribe_banner(&self) -> watch::Receiver<Option<Banner>> {
        self.banner.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn banner(&self) -> Option<Banner> {
        self.banner.borrow().clone()
    }

    /// Bumped on every applied device load or local patch.
    pub fn devices_version(&self) -> u64 {
        self.devices.version()
    }

    pub fn wishlist_version(&self) -> u64 {
        self.wishlist.version()
    }

    pub fn last_device_load(&self) -> Option<DateTime<Utc>> {
        *self.last_device_load.borrow()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

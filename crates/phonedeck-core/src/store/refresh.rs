// ── Load application and status banner ──
//
// Applies store responses to the DataStore. Stale responses (overtaken
// by a newer load or a local patch) are dropped here and logged.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::DataStore;
use super::collection::LoadTicket;
use crate::error::{Banner, CoreError};
use crate::model::{Device, RecordId, Review, WishlistEntry};

impl DataStore {
    pub(crate) fn begin_device_load(&self) -> LoadTicket {
        self.devices.begin_load()
    }

    pub(crate) fn begin_wishlist_load(&self) -> LoadTicket {
        self.wishlist.begin_load()
    }

    /// Apply a full device load. Returns `false` if the response was stale.
    pub(crate) fn apply_devices(&self, ticket: LoadTicket, devices: Vec<Device>) -> bool {
        let count = devices.len();
        if self.devices.apply_load(ticket, devices) {
            self.last_device_load.send_replace(Some(Utc::now()));
            debug!(count, "devices loaded");
            true
        } else {
            warn!(?ticket, "discarding stale device load");
            false
        }
    }

    pub(crate) fn apply_wishlist(&self, ticket: LoadTicket, entries: Vec<WishlistEntry>) -> bool {
        let count = entries.len();
        if self.wishlist.apply_load(ticket, entries) {
            debug!(count, "wishlist loaded");
            true
        } else {
            warn!(?ticket, "discarding stale wishlist load");
            false
        }
    }

    pub(crate) fn remove_device_local(&self, id: &RecordId) -> Option<Arc<Device>> {
        self.devices.remove_local(id)
    }

    pub(crate) fn mark_deleting(&self, id: &RecordId) {
        *self.deleting.entry(id.clone()).or_insert(0) += 1;
    }

    /// Undo one `mark_deleting`; the id stays marked while other deletes of
    /// it are still running.
    pub(crate) fn unmark_deleting(&self, id: &RecordId) {
        self.deleting.remove_if_mut(id, |_, count| {
            *count -= 1;
            *count == 0
        });
    }

    pub(crate) fn apply_reviews(&self, device_id: RecordId, reviews: Vec<Review>) {
        self.reviews.insert(device_id, Arc::new(reviews));
    }

    /// Drop every cached review list containing `review_id`.
    pub(crate) fn invalidate_review(&self, review_id: &RecordId) {
        self.reviews
            .retain(|_, reviews| !reviews.iter().any(|r| &r.id == review_id));
    }

    pub(crate) fn invalidate_reviews_for(&self, device_id: &RecordId) {
        self.reviews.remove(device_id);
    }

    // ── Banner ───────────────────────────────────────────────────────

    pub(crate) fn raise_banner(&self, err: &CoreError) {
        self.set_banner(err.banner());
    }

    pub(crate) fn set_banner(&self, banner: Banner) {
        self.banner.send_replace(Some(banner));
    }

    pub(crate) fn clear_banner(&self) {
        self.banner.send_if_modified(|b| b.take().is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::model::DeviceDraft;

    fn device(id: &str) -> Device {
        let now = Utc::now();
        Device::from_draft(RecordId::from(id), DeviceDraft::new("Pixel 9", "Google"), now, now)
    }

    #[test]
    fn applying_devices_records_load_time() {
        let store = DataStore::new();
        assert!(store.last_device_load().is_none());

        let t = store.begin_device_load();
        assert!(store.apply_devices(t, vec![device("1")]));
        assert!(store.last_device_load().is_some());
        assert_eq!(store.device_count(), 1);
    }

    #[test]
    fn stale_device_load_leaves_state_alone() {
        let store = DataStore::new();
        let older = store.begin_device_load();
        let newer = store.begin_device_load();
        store.apply_devices(newer, vec![device("1"), device("2")]);

        assert!(!store.apply_devices(older, Vec::new()));
        assert_eq!(store.device_count(), 2);
    }

    #[test]
    fn versions_move_only_with_applied_changes() {
        let store = DataStore::new();
        let stale = store.begin_device_load();
        let fresh = store.begin_device_load();
        store.apply_devices(fresh, vec![device("1")]);
        let after_load = store.devices_version();
        assert!(after_load > 0);

        store.apply_devices(stale, Vec::new());
        assert_eq!(store.devices_version(), after_load);

        store.remove_device_local(&RecordId::from("1"));
        assert!(store.devices_version() > after_load);
        assert_eq!(store.wishlist_version(), 0);

        let t = store.begin_wishlist_load();
        store.apply_wishlist(t, Vec::new());
        assert_eq!(store.wishlist_version(), 1);
    }

    #[test]
    fn banner_set_and_clear() {
        let store = DataStore::new();
        store.raise_banner(&CoreError::ValidationFailed {
            message: "Name and Brand are required fields".into(),
        });
        assert_eq!(
            store.banner().map(|b| b.kind),
            Some(FailureKind::ValidationFailed)
        );

        store.clear_banner();
        assert!(store.banner().is_none());
    }

    #[test]
    fn review_invalidation_drops_owning_list() {
        let store = DataStore::new();
        let review = Review {
            id: RecordId::from("r1"),
            mobile_id: RecordId::from("1"),
            reviewer: "asha".into(),
            rating: Some(5),
            comment: "great".into(),
            created_at: None,
        };
        store.apply_reviews(RecordId::from("1"), vec![review]);
        store.apply_reviews(RecordId::from("2"), Vec::new());

        store.invalidate_review(&RecordId::from("r1"));
        assert!(store.reviews_for(&RecordId::from("1")).is_none());
        assert!(store.reviews_for(&RecordId::from("2")).is_some());
    }
}

// ── Device collection manager ──

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{WishlistManager, bannered, require_id};
use crate::error::{Collection, CoreError};
use crate::model::{Device, DeviceDraft, IdSequence, RecordId};
use crate::reconcile::{RemovalReport, purge_references};
use crate::remote::RemoteStore;
use crate::store::DataStore;

/// Marks a device as "delete in flight" for as long as it lives.
struct DeletingGuard<'a> {
    store: &'a DataStore,
    id: RecordId,
}

impl<'a> DeletingGuard<'a> {
    fn new(store: &'a DataStore, id: &RecordId) -> Self {
        store.mark_deleting(id);
        Self {
            store,
            id: id.clone(),
        }
    }
}

impl Drop for DeletingGuard<'_> {
    fn drop(&mut self) {
        self.store.unmark_deleting(&self.id);
    }
}

/// Sole writer of the device collection.
pub struct DeviceManager<R: RemoteStore> {
    remote: Arc<R>,
    store: Arc<DataStore>,
    wishlist: WishlistManager<R>,
    ids: Arc<IdSequence>,
}

impl<R: RemoteStore> Clone for DeviceManager<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            store: Arc::clone(&self.store),
            wishlist: self.wishlist.clone(),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<R: RemoteStore> DeviceManager<R> {
    pub fn new(remote: Arc<R>, store: Arc<DataStore>, wishlist: WishlistManager<R>) -> Self {
        Self {
            remote,
            store,
            wishlist,
            ids: Arc::new(IdSequence::new()),
        }
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch every device and replace the local collection wholesale.
    ///
    /// On failure the previous collection stays as it was.
    pub async fn load_all(&self) -> Result<Arc<Vec<Arc<Device>>>, CoreError> {
        self.fetch().await?;
        Ok(self.store.devices_snapshot())
    }

    /// One load round trip. `Ok(false)` means the response arrived after a
    /// newer load or local patch and was dropped.
    async fn fetch(&self) -> Result<bool, CoreError> {
        let ticket = self.store.begin_device_load();
        match self.remote.list_devices().await {
            Ok(devices) => Ok(self.store.apply_devices(ticket, devices)),
            Err(source) => {
                let err = CoreError::LoadFailed {
                    collection: Collection::Devices,
                    source,
                };
                warn!(error = %err, "device load failed");
                Err(bannered(&self.store, err))
            }
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, id: &RecordId) -> Option<Arc<Device>> {
        self.store.device(id)
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.store.devices_snapshot()
    }

    pub fn subscribe(&self) -> crate::stream::EntityStream<Device> {
        self.store.subscribe_devices()
    }

    pub fn is_deleting(&self, id: &RecordId) -> bool {
        self.store.is_deleting(id)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Validate, persist with a fresh id, then resync from the store.
    ///
    /// Returns the record as the store echoed it back. A resync failure
    /// after a successful create is logged, not returned.
    pub async fn add(&self, draft: DeviceDraft) -> Result<Device, CoreError> {
        let draft = draft.normalized();
        draft.validate().map_err(|e| bannered(&self.store, e))?;

        let now = Utc::now();
        let device = Device::from_draft(self.ids.next(now), draft, now, now);
        let stored = self.remote.create_device(&device).await.map_err(|source| {
            bannered(
                &self.store,
                CoreError::PersistFailed {
                    collection: Collection::Devices,
                    source,
                },
            )
        })?;
        info!(id = %stored.id, name = %stored.name, "device added");

        self.resync_logged().await;
        Ok(stored)
    }

    /// Replace an existing record. `created_at` is carried over from the
    /// local copy when there is one.
    pub async fn update(&self, id: &RecordId, draft: DeviceDraft) -> Result<Device, CoreError> {
        require_id(id, "device").map_err(|e| bannered(&self.store, e))?;
        let draft = draft.normalized();
        draft.validate().map_err(|e| bannered(&self.store, e))?;

        let now = Utc::now();
        let created_at = self
            .store
            .device(id)
            .and_then(|d| d.created_at)
            .unwrap_or(now);
        let device = Device::from_draft(id.clone(), draft, created_at, now);
        let stored = self.remote.replace_device(&device).await.map_err(|source| {
            bannered(
                &self.store,
                CoreError::PersistFailed {
                    collection: Collection::Devices,
                    source,
                },
            )
        })?;
        info!(id = %stored.id, "device updated");

        self.resync_logged().await;
        Ok(stored)
    }

    /// Delete a device and the wishlist entries that reference it.
    ///
    /// References go first, sequentially and best-effort; the report says
    /// which of them could not be removed. If the device delete itself
    /// fails, both collections are reloaded before the error is returned.
    pub async fn remove(&self, id: &RecordId) -> Result<RemovalReport, CoreError> {
        require_id(id, "device").map_err(|e| bannered(&self.store, e))?;
        let _deleting = DeletingGuard::new(&self.store, id);

        let report = purge_references(&self.wishlist, id).await;
        if !report.is_clean() {
            warn!(
                device = %id,
                failed = report.failed.len(),
                "some wishlist entries still reference the device"
            );
        }

        match self.remote.delete_device(id).await {
            Ok(()) => {
                self.store.remove_device_local(id);
                self.store.invalidate_reviews_for(id);
                info!(id = %id, "device removed");
                self.wishlist.reload_logged().await;
                Ok(report)
            }
            Err(source) => {
                let err = CoreError::DeleteFailed {
                    collection: Collection::Devices,
                    source,
                };
                warn!(id = %id, error = %err, "device delete failed, resyncing");
                self.resync_logged().await;
                self.wishlist.reload_logged().await;
                Err(bannered(&self.store, err))
            }
        }
    }

    /// Reload after a write. A resync overtaken by a local patch is issued
    /// once more, so the write it follows still reaches the collection.
    async fn resync_logged(&self) {
        let result = match self.fetch().await {
            Ok(false) => {
                debug!("device resync was overtaken, reloading");
                self.fetch().await
            }
            other => other,
        };
        if let Err(e) = result {
            warn!(error = %e, "device resync failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleting_marker_lives_as_long_as_the_guard() {
        let store = DataStore::new();
        let id = RecordId::from("1");
        {
            let _guard = DeletingGuard::new(&store, &id);
            assert!(store.is_deleting(&id));
            assert_eq!(store.deleting_ids().len(), 1);
        }
        assert!(!store.is_deleting(&id));
    }

    #[test]
    fn overlapping_deletes_keep_the_marker_until_the_last_ends() {
        let store = DataStore::new();
        let id = RecordId::from("1");
        let first = DeletingGuard::new(&store, &id);
        let second = DeletingGuard::new(&store, &id);

        drop(first);
        assert!(store.is_deleting(&id));
        drop(second);
        assert!(!store.is_deleting(&id));
        assert!(store.deleting_ids().is_empty());
    }
}

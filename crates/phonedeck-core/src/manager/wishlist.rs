// ── Wishlist collection manager ──

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use futures_util::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{bannered, require_id};
use crate::error::{Collection, CoreError, StoreError};
use crate::model::{NewWishlistEntry, RecordId, WishlistEntry};
use crate::reconcile::RemovalReport;
use crate::remote::RemoteStore;
use crate::store::DataStore;

/// What a [`WishlistManager::toggle`] call did.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Added(WishlistEntry),
    /// The id of the entry that was deleted.
    Removed(RecordId),
    /// The device is not in the local collection; nothing was sent.
    DeviceMissing,
}

/// Sole writer of the wishlist collection.
pub struct WishlistManager<R: RemoteStore> {
    remote: Arc<R>,
    store: Arc<DataStore>,
    /// Per-device locks so overlapping toggles of one device run in order.
    toggles: Arc<DashMap<RecordId, Arc<Mutex<()>>>>,
}

impl<R: RemoteStore> Clone for WishlistManager<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            store: Arc::clone(&self.store),
            toggles: Arc::clone(&self.toggles),
        }
    }
}

impl<R: RemoteStore> WishlistManager<R> {
    pub fn new(remote: Arc<R>, store: Arc<DataStore>) -> Self {
        Self {
            remote,
            store,
            toggles: Arc::new(DashMap::new()),
        }
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch the whole wishlist and replace the local collection.
    pub async fn load_all(&self) -> Result<Arc<Vec<Arc<WishlistEntry>>>, CoreError> {
        self.fetch().await.map_err(|e| bannered(&self.store, e))
    }

    /// Reload for callers that treat the wishlist as best-effort: a failure
    /// is logged and leaves the banner alone. Returns whether it succeeded.
    pub async fn reload_logged(&self) -> bool {
        match self.fetch().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "wishlist reload failed");
                false
            }
        }
    }

    async fn fetch(&self) -> Result<Arc<Vec<Arc<WishlistEntry>>>, CoreError> {
        let ticket = self.store.begin_wishlist_load();
        let entries = self
            .remote
            .list_wishlist()
            .await
            .map_err(|source| CoreError::LoadFailed {
                collection: Collection::Wishlist,
                source,
            })?;
        self.store.apply_wishlist(ticket, entries);
        Ok(self.store.wishlist_snapshot())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn contains(&self, device_id: &RecordId) -> bool {
        self.store.is_wishlisted(device_id)
    }

    pub fn entry_for(&self, device_id: &RecordId) -> Option<Arc<WishlistEntry>> {
        self.store.wishlist_entry_for(device_id)
    }

    /// Ids of every device currently on the wishlist.
    pub fn device_ids(&self) -> HashSet<RecordId> {
        self.store
            .wishlist_snapshot()
            .iter()
            .map(|e| e.mobile_id.clone())
            .collect()
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<WishlistEntry>>> {
        self.store.wishlist_snapshot()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add the device if it is not on the wishlist, remove it if it is.
    ///
    /// Calls for the same device are serialized; each one decides against
    /// the wishlist as reloaded by the previous call.
    pub async fn toggle(&self, device_id: &RecordId) -> Result<ToggleOutcome, CoreError> {
        require_id(device_id, "device").map_err(|e| bannered(&self.store, e))?;

        let lock = self.toggle_lock(device_id);
        let result = {
            let _held = lock.lock().await;
            self.toggle_locked(device_id).await
        };
        drop(lock);
        self.toggles
            .remove_if(device_id, |_, m| Arc::strong_count(m) == 1);

        result.map_err(|e| bannered(&self.store, e))
    }

    /// `POST` one entry, then reload.
    pub async fn add(&self, entry: &NewWishlistEntry) -> Result<WishlistEntry, CoreError> {
        let stored = self
            .post_entry(entry)
            .await
            .map_err(|source| bannered(&self.store, CoreError::single_wishlist_failure(source)))?;
        self.reload_logged().await;
        Ok(stored)
    }

    /// `DELETE` one entry, then reload. A failure rolls nothing back.
    pub async fn remove(&self, entry_id: &RecordId) -> Result<(), CoreError> {
        require_id(entry_id, "wishlist entry").map_err(|e| bannered(&self.store, e))?;
        self.delete_entry(entry_id)
            .await
            .map_err(|source| bannered(&self.store, CoreError::single_wishlist_failure(source)))?;
        self.reload_logged().await;
        Ok(())
    }

    /// Delete every entry concurrently, then reload.
    ///
    /// Deletions that succeed stay deleted even when others fail; the
    /// error carries the first failure and the failed/attempted counts.
    pub async fn clear_all(&self) -> Result<RemovalReport, CoreError> {
        let entries = self.store.wishlist_snapshot();
        let attempted = entries.len();

        let results = join_all(entries.iter().map(|entry| async move {
            (entry.id.clone(), self.delete_entry(&entry.id).await)
        }))
        .await;

        let mut report = RemovalReport::default();
        let mut first_error = None;
        for (id, result) in results {
            match result {
                Ok(()) => report.removed.push(id),
                Err(e) => {
                    warn!(entry = %id, error = %e, "failed to clear wishlist entry");
                    report.failed.push(id);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        info!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "wishlist cleared"
        );

        self.reload_logged().await;

        match first_error {
            None => Ok(report),
            Some(source) => Err(bannered(
                &self.store,
                CoreError::WishlistUpdateFailed {
                    failed: report.failed.len(),
                    attempted,
                    source,
                },
            )),
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn toggle_locked(&self, device_id: &RecordId) -> Result<ToggleOutcome, CoreError> {
        let outcome = if let Some(entry) = self.store.wishlist_entry_for(device_id) {
            self.delete_entry(&entry.id)
                .await
                .map_err(CoreError::single_wishlist_failure)?;
            ToggleOutcome::Removed(entry.id.clone())
        } else if let Some(device) = self.store.device(device_id) {
            let stored = self
                .post_entry(&NewWishlistEntry::snapshot(&device, Utc::now()))
                .await
                .map_err(CoreError::single_wishlist_failure)?;
            ToggleOutcome::Added(stored)
        } else {
            debug!(device = %device_id, "toggle for unknown device");
            ToggleOutcome::DeviceMissing
        };

        self.reload_logged().await;
        Ok(outcome)
    }

    fn toggle_lock(&self, device_id: &RecordId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.toggles
                .entry(device_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    async fn post_entry(&self, entry: &NewWishlistEntry) -> Result<WishlistEntry, StoreError> {
        let stored = self.remote.add_wishlist_entry(entry).await?;
        debug!(entry = %stored.id, device = %stored.mobile_id, "wishlist entry added");
        Ok(stored)
    }

    /// Raw delete: no reload, no banner.
    pub(crate) async fn delete_entry(&self, entry_id: &RecordId) -> Result<(), StoreError> {
        self.remote.delete_wishlist_entry(entry_id).await?;
        debug!(entry = %entry_id, "wishlist entry removed");
        Ok(())
    }
}

// ── Catalog facade ──
//
// Entry point for consumers. Owns the DataStore and the three managers,
// tracks whether the record store is reachable, and gates mutations on it.

use std::future::Future;
use std::sync::Arc;

use phonedeck_api::{StoreClient, TransportConfig};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::error::{Banner, CoreError};
use crate::manager::{DeviceManager, ReviewManager, ToggleOutcome, WishlistManager};
use crate::model::{Device, DeviceDraft, RecordId, Review, ReviewDraft};
use crate::reconcile::{RemovalReport, dangling_entries, purge_entries};
use crate::remote::RemoteStore;
use crate::store::DataStore;
use crate::view::DeviceView;

// ── ConnectionState ──────────────────────────────────────────────────

/// Reachability of the record store, observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ConnectionState {
    /// Not checked yet, or the last check failed.
    Disconnected,
    Checking,
    Connected,
}

// ── Catalog ──────────────────────────────────────────────────────────

/// Cheaply cloneable handle over the whole client-side catalog.
pub struct Catalog<R: RemoteStore = StoreClient> {
    inner: Arc<CatalogInner<R>>,
}

impl<R: RemoteStore> Clone for Catalog<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CatalogInner<R: RemoteStore> {
    remote: Arc<R>,
    store: Arc<DataStore>,
    connection_state: watch::Sender<ConnectionState>,
    devices: DeviceManager<R>,
    wishlist: WishlistManager<R>,
    reviews: ReviewManager<R>,
}

impl Catalog<StoreClient> {
    /// Build an HTTP-backed catalog. Does NOT connect; call
    /// [`connect()`](Self::connect) first.
    pub fn new(config: &StoreConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client =
            StoreClient::new(config.url.clone(), &transport).map_err(|e| CoreError::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self::with_remote(client))
    }
}

impl<R: RemoteStore> Catalog<R> {
    pub fn with_remote(remote: R) -> Self {
        let remote = Arc::new(remote);
        let store = Arc::new(DataStore::new());
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let wishlist = WishlistManager::new(Arc::clone(&remote), Arc::clone(&store));
        let devices =
            DeviceManager::new(Arc::clone(&remote), Arc::clone(&store), wishlist.clone());
        let reviews = ReviewManager::new(Arc::clone(&remote), Arc::clone(&store));

        Self {
            inner: Arc::new(CatalogInner {
                remote,
                store,
                connection_state,
                devices,
                wishlist,
                reviews,
            }),
        }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn devices(&self) -> &DeviceManager<R> {
        &self.inner.devices
    }

    pub fn wishlist(&self) -> &WishlistManager<R> {
        &self.inner.wishlist
    }

    pub fn reviews(&self) -> &ReviewManager<R> {
        &self.inner.reviews
    }

    pub fn location(&self) -> String {
        self.inner.remote.location()
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    pub fn connection_state(&self) -> ConnectionState {
        *self.inner.connection_state.borrow()
    }

    pub fn subscribe_connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    pub fn server_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Check the store, then load devices and the wishlist.
    ///
    /// A device load failure is returned; a wishlist load failure is only
    /// logged. When the check fails the state becomes `Disconnected`.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.inner
            .connection_state
            .send_replace(ConnectionState::Checking);
        self.inner.store.clear_banner();

        if let Err(source) = self.inner.remote.ping().await {
            self.inner
                .connection_state
                .send_replace(ConnectionState::Disconnected);
            let err = CoreError::ServerUnavailable {
                url: self.location(),
                source: Some(source),
            };
            warn!(error = %err, "record store unreachable");
            self.inner.store.raise_banner(&err);
            return Err(err);
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Connected);
        info!(url = %self.location(), "connected to record store");

        self.inner.devices.load_all().await?;
        self.inner.wishlist.reload_logged().await;
        Ok(())
    }

    /// Manual retry after a failed connect.
    pub async fn retry(&self) -> Result<(), CoreError> {
        self.connect().await
    }

    /// Reload both collections without re-checking the connection.
    pub async fn reload(&self) -> Result<(), CoreError> {
        self.track(async {
            self.inner.devices.load_all().await?;
            self.inner.wishlist.reload_logged().await;
            Ok(())
        })
        .await
    }

    // ── Status banner ────────────────────────────────────────────────

    pub fn banner(&self) -> Option<Banner> {
        self.inner.store.banner()
    }

    pub fn subscribe_banner(&self) -> watch::Receiver<Option<Banner>> {
        self.inner.store.subscribe_banner()
    }

    pub fn dismiss_banner(&self) {
        self.inner.store.clear_banner();
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn view(&self, query: &str) -> DeviceView {
        DeviceView::build(&self.inner.store, query)
    }

    // ── Device operations ────────────────────────────────────────────

    pub async fn add_device(&self, draft: DeviceDraft) -> Result<Device, CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.devices.add(draft)).await
    }

    pub async fn update_device(&self, id: &RecordId, draft: DeviceDraft) -> Result<Device, CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.devices.update(id, draft)).await
    }

    pub async fn remove_device(&self, id: &RecordId) -> Result<RemovalReport, CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.devices.remove(id)).await
    }

    // ── Wishlist operations ──────────────────────────────────────────

    pub async fn toggle_wishlist(&self, device_id: &RecordId) -> Result<ToggleOutcome, CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.wishlist.toggle(device_id)).await
    }

    pub async fn remove_wishlist_entry(&self, entry_id: &RecordId) -> Result<(), CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.wishlist.remove(entry_id)).await
    }

    pub async fn clear_wishlist(&self) -> Result<RemovalReport, CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.wishlist.clear_all()).await
    }

    /// Reload both collections, delete wishlist entries whose device is
    /// gone, then reload the wishlist again.
    ///
    /// Both loads must succeed first: judging references against a stale
    /// or empty device list would delete valid entries.
    pub async fn repair_wishlist(&self) -> Result<RemovalReport, CoreError> {
        self.ensure_connected()?;
        self.track(async {
            let devices = self.inner.devices.load_all().await?;
            let wishlist = self.inner.wishlist.load_all().await?;

            let dangling = dangling_entries(&wishlist, &devices);
            if dangling.is_empty() {
                return Ok(RemovalReport::default());
            }
            info!(count = dangling.len(), "removing dangling wishlist entries");
            let report = purge_entries(&self.inner.wishlist, &dangling).await;
            self.inner.wishlist.reload_logged().await;
            Ok(report)
        })
        .await
    }

    // ── Review operations ────────────────────────────────────────────

    pub async fn reviews_for(&self, device_id: &RecordId) -> Result<Arc<Vec<Review>>, CoreError> {
        self.track(self.inner.reviews.for_device(device_id)).await
    }

    pub async fn add_review(&self, device_id: &RecordId, draft: ReviewDraft) -> Result<Review, CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.reviews.add(device_id, draft)).await
    }

    pub async fn update_review(&self, id: &RecordId, draft: ReviewDraft) -> Result<Review, CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.reviews.update(id, draft)).await
    }

    pub async fn remove_review(&self, id: &RecordId) -> Result<(), CoreError> {
        self.ensure_connected()?;
        self.track(self.inner.reviews.remove(id)).await
    }

    // ── Internals ────────────────────────────────────────────────────

    fn ensure_connected(&self) -> Result<(), CoreError> {
        if self.server_connected() {
            return Ok(());
        }
        let err = CoreError::ServerUnavailable {
            url: self.location(),
            source: None,
        };
        self.inner.store.raise_banner(&err);
        Err(err)
    }

    /// Run one user-initiated operation: the previous banner is cleared
    /// up front, failures raise their own.
    async fn track<T, F>(&self, op: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        self.inner.store.clear_banner();
        let result = op.await;
        if let Err(e) = &result {
            self.inner.store.raise_banner(e);
        }
        result
    }
}

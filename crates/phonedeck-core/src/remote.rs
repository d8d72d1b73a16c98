// ── Record store seam ──
//
// Typed operations the managers need from the remote store. `StoreClient`
// is the production implementation; tests substitute an in-memory one.

use std::future::Future;

use phonedeck_api::StoreClient;

use crate::error::StoreError;
use crate::model::{Device, NewReview, NewWishlistEntry, RecordId, Review, WishlistEntry};

/// The remote record store, source of truth for every collection.
pub trait RemoteStore: Send + Sync + 'static {
    /// Human-readable location, used in connection errors.
    fn location(&self) -> String;

    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    // ── Devices ──────────────────────────────────────────────────────

    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, StoreError>> + Send;

    fn create_device(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<Device, StoreError>> + Send;

    /// Replace the record stored under `device.id`.
    fn replace_device(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<Device, StoreError>> + Send;

    fn delete_device(&self, id: &RecordId) -> impl Future<Output = Result<(), StoreError>> + Send;

    // ── Wishlist ─────────────────────────────────────────────────────

    fn list_wishlist(&self)
    -> impl Future<Output = Result<Vec<WishlistEntry>, StoreError>> + Send;

    fn add_wishlist_entry(
        &self,
        entry: &NewWishlistEntry,
    ) -> impl Future<Output = Result<WishlistEntry, StoreError>> + Send;

    fn delete_wishlist_entry(
        &self,
        id: &RecordId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // ── Reviews ──────────────────────────────────────────────────────

    fn reviews_for_device(
        &self,
        device_id: &RecordId,
    ) -> impl Future<Output = Result<Vec<Review>, StoreError>> + Send;

    fn add_review(
        &self,
        review: &NewReview,
    ) -> impl Future<Output = Result<Review, StoreError>> + Send;

    fn update_review(
        &self,
        id: &RecordId,
        review: &NewReview,
    ) -> impl Future<Output = Result<Review, StoreError>> + Send;

    fn delete_review(&self, id: &RecordId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl RemoteStore for StoreClient {
    fn location(&self) -> String {
        self.base_url().to_string()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        StoreClient::ping(self).await
    }

    async fn list_devices(&self) -> Result<Vec<Device>, StoreError> {
        self.list_mobiles().await
    }

    async fn create_device(&self, device: &Device) -> Result<Device, StoreError> {
        self.create_mobile(device).await
    }

    async fn replace_device(&self, device: &Device) -> Result<Device, StoreError> {
        self.update_mobile(device.id.as_str(), device).await
    }

    async fn delete_device(&self, id: &RecordId) -> Result<(), StoreError> {
        self.delete_mobile(id.as_str()).await
    }

    async fn list_wishlist(&self) -> Result<Vec<WishlistEntry>, StoreError> {
        StoreClient::list_wishlist(self).await
    }

    async fn add_wishlist_entry(&self, entry: &NewWishlistEntry) -> Result<WishlistEntry, StoreError> {
        StoreClient::add_wishlist_entry(self, entry).await
    }

    async fn delete_wishlist_entry(&self, id: &RecordId) -> Result<(), StoreError> {
        StoreClient::delete_wishlist_entry(self, id.as_str()).await
    }

    async fn reviews_for_device(&self, device_id: &RecordId) -> Result<Vec<Review>, StoreError> {
        self.reviews_for_mobile(device_id.as_str()).await
    }

    async fn add_review(&self, review: &NewReview) -> Result<Review, StoreError> {
        StoreClient::add_review(self, review).await
    }

    async fn update_review(&self, id: &RecordId, review: &NewReview) -> Result<Review, StoreError> {
        StoreClient::update_review(self, id.as_str(), review).await
    }

    async fn delete_review(&self, id: &RecordId) -> Result<(), StoreError> {
        StoreClient::delete_review(self, id.as_str()).await
    }
}

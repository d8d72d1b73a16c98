// ── Review manager ──
//
// Reviews are fetched per device and cached in the DataStore. They are not
// removed when their device is deleted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::{bannered, require_id};
use crate::error::{Collection, CoreError};
use crate::model::{NewReview, RecordId, Review, ReviewDraft};
use crate::remote::RemoteStore;
use crate::store::DataStore;

pub struct ReviewManager<R: RemoteStore> {
    remote: Arc<R>,
    store: Arc<DataStore>,
}

impl<R: RemoteStore> Clone for ReviewManager<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: RemoteStore> ReviewManager<R> {
    pub fn new(remote: Arc<R>, store: Arc<DataStore>) -> Self {
        Self { remote, store }
    }

    /// Fetch the reviews for one device and refresh its cache entry.
    pub async fn for_device(&self, device_id: &RecordId) -> Result<Arc<Vec<Review>>, CoreError> {
        require_id(device_id, "device").map_err(|e| bannered(&self.store, e))?;
        let reviews = self
            .remote
            .reviews_for_device(device_id)
            .await
            .map_err(|source| {
                bannered(
                    &self.store,
                    CoreError::LoadFailed {
                        collection: Collection::Reviews,
                        source,
                    },
                )
            })?;
        debug!(device = %device_id, count = reviews.len(), "reviews loaded");
        self.store.apply_reviews(device_id.clone(), reviews);
        Ok(self.cached(device_id))
    }

    /// The cached list, or an empty one if it was never fetched.
    pub fn cached(&self, device_id: &RecordId) -> Arc<Vec<Review>> {
        self.store.reviews_for(device_id).unwrap_or_default()
    }

    pub async fn add(&self, device_id: &RecordId, draft: ReviewDraft) -> Result<Review, CoreError> {
        require_id(device_id, "device").map_err(|e| bannered(&self.store, e))?;
        draft.validate().map_err(|e| bannered(&self.store, e))?;

        let review = NewReview::from_draft(device_id.clone(), draft, Utc::now());
        let stored = self.remote.add_review(&review).await.map_err(|source| {
            bannered(
                &self.store,
                CoreError::PersistFailed {
                    collection: Collection::Reviews,
                    source,
                },
            )
        })?;
        info!(review = %stored.id, device = %device_id, "review added");
        self.store.invalidate_reviews_for(device_id);
        Ok(stored)
    }

    /// Replace a review. The device link comes from the cached copy.
    pub async fn update(&self, id: &RecordId, draft: ReviewDraft) -> Result<Review, CoreError> {
        require_id(id, "review").map_err(|e| bannered(&self.store, e))?;
        draft.validate().map_err(|e| bannered(&self.store, e))?;

        let existing = self.find_cached(id).ok_or_else(|| {
            bannered(
                &self.store,
                CoreError::NotFound {
                    collection: Collection::Reviews,
                    id: id.to_string(),
                },
            )
        })?;
        let created_at = existing.created_at.unwrap_or_else(Utc::now);
        let review = NewReview::from_draft(existing.mobile_id.clone(), draft, created_at);
        let stored = self
            .remote
            .update_review(id, &review)
            .await
            .map_err(|source| {
                bannered(
                    &self.store,
                    CoreError::PersistFailed {
                        collection: Collection::Reviews,
                        source,
                    },
                )
            })?;
        self.store.invalidate_review(id);
        Ok(stored)
    }

    pub async fn remove(&self, id: &RecordId) -> Result<(), CoreError> {
        require_id(id, "review").map_err(|e| bannered(&self.store, e))?;
        self.remote.delete_review(id).await.map_err(|source| {
            bannered(
                &self.store,
                CoreError::DeleteFailed {
                    collection: Collection::Reviews,
                    source,
                },
            )
        })?;
        info!(review = %id, "review removed");
        self.store.invalidate_review(id);
        Ok(())
    }

    fn find_cached(&self, id: &RecordId) -> Option<Review> {
        self.store
            .reviews
            .iter()
            .find_map(|entry| entry.value().iter().find(|r| &r.id == id).cloned())
    }
}

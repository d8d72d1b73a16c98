// Review endpoints
//
// The `reviews` collection, filterable by device through `?mobileId=`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::StoreClient;
use crate::error::Error;

const REVIEWS: &str = "reviews";

impl StoreClient {
    /// `GET /reviews`
    pub async fn list_reviews<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let url = self.collection_url(REVIEWS)?;
        self.get(url).await
    }

    /// `GET /reviews?mobileId={mobile_id}`
    pub async fn reviews_for_mobile<T: DeserializeOwned>(
        &self,
        mobile_id: &str,
    ) -> Result<Vec<T>, Error> {
        let url = self.collection_url(REVIEWS)?;
        debug!(mobile_id, "listing reviews");
        self.get_query(url, &[("mobileId", mobile_id)]).await
    }

    /// `POST /reviews`
    pub async fn add_review<T: DeserializeOwned>(&self, review: &impl Serialize) -> Result<T, Error> {
        let url = self.collection_url(REVIEWS)?;
        self.post(url, review).await
    }

    /// `PUT /reviews/{id}`
    pub async fn update_review<T: DeserializeOwned>(
        &self,
        id: &str,
        review: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.record_url(REVIEWS, id)?;
        self.put(url, review).await
    }

    /// `DELETE /reviews/{id}`
    pub async fn delete_review(&self, id: &str) -> Result<(), Error> {
        let url = self.record_url(REVIEWS, id)?;
        debug!(id, "deleting review");
        self.delete(url).await
    }
}

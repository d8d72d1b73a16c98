// Wishlist endpoints
//
// The `wishlist` collection. Entry ids are assigned by the store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::StoreClient;
use crate::error::Error;

const WISHLIST: &str = "wishlist";

impl StoreClient {
    /// `GET /wishlist`
    pub async fn list_wishlist<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let url = self.collection_url(WISHLIST)?;
        debug!("listing wishlist");
        self.get(url).await
    }

    /// `POST /wishlist`, returning the stored entry (with its new id).
    pub async fn add_wishlist_entry<T: DeserializeOwned>(
        &self,
        entry: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.collection_url(WISHLIST)?;
        self.post(url, entry).await
    }

    /// `DELETE /wishlist/{id}`
    pub async fn delete_wishlist_entry(&self, id: &str) -> Result<(), Error> {
        let url = self.record_url(WISHLIST, id)?;
        debug!(id, "removing wishlist entry");
        self.delete(url).await
    }
}

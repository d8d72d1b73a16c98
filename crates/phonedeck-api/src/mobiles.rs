// Device endpoints
//
// The `mobiles` collection. Records are passed through as generic serde
// types so this crate stays independent of the domain model.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::StoreClient;
use crate::error::Error;

const MOBILES: &str = "mobiles";

impl StoreClient {
    /// List every device record.
    ///
    /// `GET /mobiles`
    pub async fn list_mobiles<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let url = self.collection_url(MOBILES)?;
        debug!("listing mobiles");
        self.get(url).await
    }

    /// Create a device record. The client supplies the id.
    ///
    /// `POST /mobiles`
    pub async fn create_mobile<T: DeserializeOwned>(
        &self,
        record: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.collection_url(MOBILES)?;
        self.post(url, record).await
    }

    /// Replace a device record wholesale.
    ///
    /// `PUT /mobiles/{id}`
    pub async fn update_mobile<T: DeserializeOwned>(
        &self,
        id: &str,
        record: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.record_url(MOBILES, id)?;
        debug!(id, "replacing mobile");
        self.put(url, record).await
    }

    /// Delete a device record.
    ///
    /// `DELETE /mobiles/{id}`
    pub async fn delete_mobile(&self, id: &str) -> Result<(), Error> {
        let url = self.record_url(MOBILES, id)?;
        debug!(id, "deleting mobile");
        self.delete(url).await
    }

    /// Reachability probe: a successful `GET /mobiles` means the store is up.
    pub async fn ping(&self) -> Result<(), Error> {
        let url = self.collection_url(MOBILES)?;
        let _: serde_json::Value = self.get(url).await?;
        Ok(())
    }
}

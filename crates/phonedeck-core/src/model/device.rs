// ── Device domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{lenient_opt_text, lenient_price, lenient_rating, lenient_text, lenient_timestamp};
use super::record_id::RecordId;
use super::Record;
use crate::error::CoreError;

/// One catalog entry for a phone, as stored in the `mobiles` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub storage: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ram: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub screen_size: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub camera: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub battery: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<u8>,
    /// URL or embedded `data:` URL; opaque to this crate.
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Device {
    /// Materialize a draft into a storable record.
    pub fn from_draft(
        id: RecordId,
        draft: DeviceDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: draft.name,
            brand: draft.brand,
            model: draft.model,
            storage: draft.storage,
            ram: draft.ram,
            screen_size: draft.screen_size,
            camera: draft.camera,
            battery: draft.battery,
            description: draft.description,
            price: draft.price,
            rating: draft.rating,
            image: draft.image,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }

    /// The editable part of this record, e.g. to pre-fill an edit form.
    pub fn to_draft(&self) -> DeviceDraft {
        DeviceDraft {
            name: self.name.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            storage: self.storage.clone(),
            ram: self.ram.clone(),
            screen_size: self.screen_size.clone(),
            camera: self.camera.clone(),
            battery: self.battery.clone(),
            description: self.description.clone(),
            price: self.price,
            rating: self.rating,
            image: self.image.clone(),
        }
    }

    /// The nine text fields the search box matches against.
    pub fn searchable_fields(&self) -> [&str; 9] {
        [
            &self.name,
            &self.brand,
            &self.model,
            &self.description,
            &self.storage,
            &self.ram,
            &self.screen_size,
            &self.battery,
            &self.camera,
        ]
    }

    /// "Brand Name", or just the name when the brand is already part of it.
    pub fn display_name(&self) -> String {
        if self.brand.is_empty()
            || self
                .name
                .to_lowercase()
                .starts_with(&self.brand.to_lowercase())
        {
            self.name.clone()
        } else {
            format!("{} {}", self.brand, self.name)
        }
    }
}

impl Record for Device {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// User-editable device fields (everything but identity and timestamps).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceDraft {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub storage: String,
    pub ram: String,
    pub screen_size: String,
    pub camera: String,
    pub battery: String,
    pub description: String,
    pub price: Option<f64>,
    pub rating: Option<u8>,
    pub image: Option<String>,
}

impl DeviceDraft {
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            ..Self::default()
        }
    }

    /// Trim the required fields and drop an empty image.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_owned();
        self.brand = self.brand.trim().to_owned();
        self.image = self.image.filter(|i| !i.trim().is_empty());
        self
    }

    /// Presence checks only; the store enforces nothing.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() || self.brand.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "Name and Brand are required fields".into(),
            });
        }
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(CoreError::ValidationFailed {
                    message: format!("rating must be between 1 and 5, got {rating}"),
                });
            }
        }
        if let Some(price) = self.price {
            if !price.is_finite() {
                return Err(CoreError::ValidationFailed {
                    message: "price must be a finite number".into(),
                });
            }
        }
        Ok(())
    }
}

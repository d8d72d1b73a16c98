// ── Wishlist domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{lenient_opt_text, lenient_price, lenient_text, lenient_timestamp};
use super::device::Device;
use super::record_id::RecordId;
use super::Record;

/// A wishlist entry as stored in the `wishlist` collection.
///
/// `mobile_id` points at a [`Device`], but nothing on the store side
/// enforces it. The name/brand/price/image fields are a snapshot taken when
/// the entry was added and go stale when the device is edited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: RecordId,
    pub mobile_id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub added_at: Option<DateTime<Utc>>,
}

impl Record for WishlistEntry {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Body of a `POST /wishlist`; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWishlistEntry {
    pub mobile_id: RecordId,
    pub name: String,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl NewWishlistEntry {
    /// Capture the denormalized fields of `device` as of `now`.
    pub fn snapshot(device: &Device, now: DateTime<Utc>) -> Self {
        Self {
            mobile_id: device.id.clone(),
            name: device.name.clone(),
            brand: device.brand.clone(),
            price: device.price,
            image: device.image.clone(),
            added_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::DeviceDraft;

    #[test]
    fn snapshot_copies_denormalized_fields() {
        let now = Utc::now();
        let mut draft = DeviceDraft::new("Pixel 9", "Google");
        draft.price = Some(79_999.0);
        let device = Device::from_draft(RecordId::from("1"), draft, now, now);

        let entry = NewWishlistEntry::snapshot(&device, now);
        let body = serde_json::to_value(&entry).unwrap();

        assert_eq!(body["mobileId"], "1");
        assert_eq!(body["name"], "Pixel 9");
        assert_eq!(body["price"], 79_999.0);
        assert!(body.get("image").is_none());
        assert!(body.get("id").is_none());
    }

    #[test]
    fn decodes_store_entry_with_numeric_id() {
        let entry: WishlistEntry = serde_json::from_value(json!({
            "id": 3,
            "mobileId": "1717171717171",
            "name": "Pixel 9",
            "brand": "Google",
            "price": "",
            "addedAt": "2024-06-01T12:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(entry.id.as_str(), "3");
        assert_eq!(entry.mobile_id.as_str(), "1717171717171");
        assert_eq!(entry.price, None);
        assert!(entry.added_at.is_some());
    }
}

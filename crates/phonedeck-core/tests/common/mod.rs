// In-memory record store with failure injection, shared by the scenario tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use phonedeck_core::{
    Catalog, Device, DeviceDraft, NewReview, NewWishlistEntry, RecordId, RemoteStore, Review,
    StoreError, WishlistEntry,
};
use tokio::sync::Notify;

#[derive(Default)]
pub struct State {
    pub devices: Vec<Device>,
    pub wishlist: Vec<WishlistEntry>,
    pub reviews: Vec<Review>,
    next_id: u64,
    /// Every call, in order, by operation name.
    pub calls: Vec<&'static str>,
    pub offline: bool,
    pub fail_device_writes: bool,
    pub fail_device_delete: bool,
    pub fail_wishlist_list: bool,
    pub fail_wishlist_deletes: HashSet<RecordId>,
    /// Make `list_devices` wait on `list_gate` after reading its data.
    pub stall_device_list: bool,
}

#[derive(Default)]
pub struct Shared {
    state: Mutex<State>,
    /// Held by a test while `stall_device_list` is set.
    pub list_gate: tokio::sync::Mutex<()>,
    pub list_started: Notify,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    pub shared: Arc<Shared>,
}

impl FakeStore {
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.shared.state.lock().unwrap()
    }

    pub fn with_devices(devices: Vec<Device>) -> Self {
        let store = Self::default();
        store.state().devices = devices;
        store
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Record a call and fail it if the store is offline.
    fn enter(&self, call: &'static str) -> Result<MutexGuard<'_, State>, StoreError> {
        let mut state = self.state();
        state.calls.push(call);
        if state.offline {
            return Err(offline());
        }
        Ok(state)
    }
}

pub fn offline() -> StoreError {
    StoreError::NetworkUnavailable {
        url: "http://fake.invalid/".into(),
        reason: "connection refused".into(),
        timed_out: false,
    }
}

pub fn server_error(status: u16) -> StoreError {
    StoreError::Server {
        status,
        status_text: (if status == 404 { "Not Found" } else { "Internal Server Error" }).into(),
        body: String::new(),
    }
}

pub fn device(id: &str, name: &str, brand: &str) -> Device {
    let now = chrono::Utc::now();
    Device::from_draft(RecordId::from(id), DeviceDraft::new(name, brand), now, now)
}

pub fn entry(id: &str, mobile_id: &str) -> WishlistEntry {
    WishlistEntry {
        id: RecordId::from(id),
        mobile_id: RecordId::from(mobile_id),
        name: String::new(),
        brand: String::new(),
        price: None,
        image: None,
        added_at: None,
    }
}

/// A connected catalog over `fake`, with the connect calls forgotten.
pub async fn connected(fake: &FakeStore) -> Catalog<FakeStore> {
    let catalog = Catalog::with_remote(fake.clone());
    catalog.connect().await.unwrap();
    fake.clear_calls();
    catalog
}

impl RemoteStore for FakeStore {
    fn location(&self) -> String {
        "http://fake.invalid/".into()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter("ping").map(drop)
    }

    async fn list_devices(&self) -> Result<Vec<Device>, StoreError> {
        let (devices, stall) = {
            let state = self.enter("list_devices")?;
            (state.devices.clone(), state.stall_device_list)
        };
        if stall {
            self.shared.list_started.notify_one();
            let _gate = self.shared.list_gate.lock().await;
        }
        Ok(devices)
    }

    async fn create_device(&self, device: &Device) -> Result<Device, StoreError> {
        let mut state = self.enter("create_device")?;
        if state.fail_device_writes {
            return Err(server_error(500));
        }
        state.devices.push(device.clone());
        Ok(device.clone())
    }

    async fn replace_device(&self, device: &Device) -> Result<Device, StoreError> {
        let mut state = self.enter("replace_device")?;
        if state.fail_device_writes {
            return Err(server_error(500));
        }
        let slot = state
            .devices
            .iter_mut()
            .find(|d| d.id == device.id)
            .ok_or_else(|| server_error(404))?;
        *slot = device.clone();
        Ok(device.clone())
    }

    async fn delete_device(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut state = self.enter("delete_device")?;
        if state.fail_device_delete {
            return Err(server_error(500));
        }
        let before = state.devices.len();
        state.devices.retain(|d| &d.id != id);
        if state.devices.len() == before {
            return Err(server_error(404));
        }
        Ok(())
    }

    async fn list_wishlist(&self) -> Result<Vec<WishlistEntry>, StoreError> {
        let state = self.enter("list_wishlist")?;
        if state.fail_wishlist_list {
            return Err(server_error(500));
        }
        Ok(state.wishlist.clone())
    }

    async fn add_wishlist_entry(&self, entry: &NewWishlistEntry) -> Result<WishlistEntry, StoreError> {
        let mut state = self.enter("add_wishlist_entry")?;
        state.next_id += 1;
        let stored = WishlistEntry {
            id: RecordId::new(format!("w{}", state.next_id)),
            mobile_id: entry.mobile_id.clone(),
            name: entry.name.clone(),
            brand: entry.brand.clone(),
            price: entry.price,
            image: entry.image.clone(),
            added_at: Some(entry.added_at),
        };
        state.wishlist.push(stored.clone());
        Ok(stored)
    }

    async fn delete_wishlist_entry(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut state = self.enter("delete_wishlist_entry")?;
        if state.fail_wishlist_deletes.contains(id) {
            return Err(server_error(500));
        }
        let before = state.wishlist.len();
        state.wishlist.retain(|e| &e.id != id);
        if state.wishlist.len() == before {
            return Err(server_error(404));
        }
        Ok(())
    }

    async fn reviews_for_device(&self, device_id: &RecordId) -> Result<Vec<Review>, StoreError> {
        let state = self.enter("reviews_for_device")?;
        Ok(state
            .reviews
            .iter()
            .filter(|r| &r.mobile_id == device_id)
            .cloned()
            .collect())
    }

    async fn add_review(&self, review: &NewReview) -> Result<Review, StoreError> {
        let mut state = self.enter("add_review")?;
        state.next_id += 1;
        let stored = Review {
            id: RecordId::new(format!("r{}", state.next_id)),
            mobile_id: review.mobile_id.clone(),
            reviewer: review.reviewer.clone(),
            rating: Some(review.rating),
            comment: review.comment.clone(),
            created_at: Some(review.created_at),
        };
        state.reviews.push(stored.clone());
        Ok(stored)
    }

    async fn update_review(&self, id: &RecordId, review: &NewReview) -> Result<Review, StoreError> {
        let mut state = self.enter("update_review")?;
        let slot = state
            .reviews
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| server_error(404))?;
        slot.reviewer.clone_from(&review.reviewer);
        slot.rating = Some(review.rating);
        slot.comment.clone_from(&review.comment);
        Ok(slot.clone())
    }

    async fn delete_review(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut state = self.enter("delete_review")?;
        let before = state.reviews.len();
        state.reviews.retain(|r| &r.id != id);
        if state.reviews.len() == before {
            return Err(server_error(404));
        }
        Ok(())
    }
}

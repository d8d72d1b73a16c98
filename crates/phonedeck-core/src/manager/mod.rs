// ── Collection managers ──
//
// One manager per collection, each the only writer of its collection in
// the DataStore. Every mutation goes to the remote store first and then
// resyncs from it; local state is never patched ahead of the store except
// for the device removal in `DeviceManager::remove`.

mod devices;
mod reviews;
mod wishlist;

pub use devices::DeviceManager;
pub use reviews::ReviewManager;
pub use wishlist::{ToggleOutcome, WishlistManager};

use crate::error::CoreError;
use crate::model::RecordId;
use crate::store::DataStore;

/// Raise `err` on the status banner and hand it back for `?`.
pub(crate) fn bannered(store: &DataStore, err: CoreError) -> CoreError {
    store.raise_banner(&err);
    err
}

pub(crate) fn require_id(id: &RecordId, what: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::ValidationFailed {
            message: format!("{what} id is required"),
        });
    }
    Ok(())
}

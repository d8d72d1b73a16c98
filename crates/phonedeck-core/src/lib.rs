// phonedeck-core: Client-side sync and view-state layer between phonedeck-api and the CLI.

pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod reconcile;
pub mod remote;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, ConnectionState};
pub use config::{DEFAULT_STORE_URL, StoreConfig};
pub use error::{Banner, Collection, CoreError, FailureKind, StoreError};
pub use manager::{DeviceManager, ReviewManager, ToggleOutcome, WishlistManager};
pub use reconcile::RemovalReport;
pub use remote::RemoteStore;
pub use store::DataStore;
pub use stream::{DeviceFilter, EntityStream, filter_devices};
pub use view::{DeviceRow, DeviceView, format_price};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Device, DeviceDraft, IdSequence, NewReview, NewWishlistEntry, Record, RecordId, Review,
    ReviewDraft, WishlistEntry,
};

pub use phonedeck_api::ErrorKind;

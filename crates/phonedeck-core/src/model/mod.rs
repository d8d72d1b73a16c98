// ── Domain model ──
//
// Typed views of the plain field maps kept by the record store.

mod common;
pub mod device;
pub mod record_id;
pub mod review;
pub mod wishlist;

pub use device::{Device, DeviceDraft};
pub use record_id::{IdSequence, RecordId};
pub use review::{NewReview, Review, ReviewDraft};
pub use wishlist::{NewWishlistEntry, WishlistEntry};

/// Anything kept in an [`EntityCollection`](crate::store) keyed by its id.
pub trait Record: Clone + Send + Sync + 'static {
    fn record_id(&self) -> &RecordId;
}

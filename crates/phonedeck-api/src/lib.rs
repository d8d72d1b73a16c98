// phonedeck-api: Async client for the json-server style record store.

pub mod client;
pub mod error;
pub mod mobiles;
pub mod reviews;
pub mod transport;
pub mod wishlist;

pub use client::StoreClient;
pub use error::{Error, ErrorKind};
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};

// Re-exported so callers of `StoreClient::request` don't need a direct reqwest dependency.
pub use reqwest::Method;

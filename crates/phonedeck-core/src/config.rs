// ── Runtime connection configuration ──
//
// Describes *where* the record store lives and how long to wait for it.
// Never touches disk: the CLI builds a `StoreConfig` and hands it in.

use std::time::Duration;

use url::Url;

pub use phonedeck_api::DEFAULT_TIMEOUT;

/// Base URL of the json-server style store used during development.
pub const DEFAULT_STORE_URL: &str = "http://localhost:3001";

/// Configuration for talking to one record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store base URL (e.g., `http://localhost:3001`).
    pub url: Url,
    /// Per-request timeout. Bounds every await on the network.
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let url = DEFAULT_STORE_URL
            .parse()
            .expect("default store URL is valid");
        Self::new(url)
    }
}

// ── Core error types ──
//
// Operation-level failures surfaced to the UI. Store failures are wrapped,
// not exposed raw: each variant says which operation failed and carries
// the `phonedeck_api::Error` as its source for the kind and details.

use phonedeck_api::ErrorKind;
use strum::{AsRefStr, Display};
use thiserror::Error;

pub use phonedeck_api::Error as StoreError;

/// Which collection an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
    Devices,
    Wishlist,
    Reviews,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local errors (never reach the network) ──────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Record store at {url} is not connected")]
    ServerUnavailable {
        url: String,
        #[source]
        source: Option<StoreError>,
    },

    // ── Store-backed operation errors ────────────────────────────────
    #[error("Failed to load {collection}: {source}")]
    LoadFailed {
        collection: Collection,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save {collection}: {source}")]
    PersistFailed {
        collection: Collection,
        #[source]
        source: StoreError,
    },

    #[error("Failed to delete from {collection}: {source}")]
    DeleteFailed {
        collection: Collection,
        #[source]
        source: StoreError,
    },

    #[error("Failed to update wishlist ({failed} of {attempted} operations failed): {source}")]
    WishlistUpdateFailed {
        failed: usize,
        attempted: usize,
        #[source]
        source: StoreError,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// What kind of failure a banner is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum FailureKind {
    ValidationFailed,
    NotFound,
    Disconnected,
    NetworkUnavailable,
    ServerError,
    RequestError,
    InvalidResponse,
    Config,
}

impl From<ErrorKind> for FailureKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NetworkUnavailable => Self::NetworkUnavailable,
            ErrorKind::ServerError => Self::ServerError,
            ErrorKind::RequestError => Self::RequestError,
            ErrorKind::InvalidResponse => Self::InvalidResponse,
        }
    }
}

/// A user-visible status line: kind plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: FailureKind,
    pub message: String,
}

impl CoreError {
    pub(crate) fn single_wishlist_failure(source: StoreError) -> Self {
        Self::WishlistUpdateFailed {
            failed: 1,
            attempted: 1,
            source,
        }
    }

    /// The underlying store error, if this failure came from the network.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::LoadFailed { source, .. }
            | Self::PersistFailed { source, .. }
            | Self::DeleteFailed { source, .. }
            | Self::WishlistUpdateFailed { source, .. } => Some(source),
            Self::ServerUnavailable { source, .. } => source.as_ref(),
            Self::ValidationFailed { .. } | Self::NotFound { .. } | Self::Config { .. } => None,
        }
    }

    pub fn store_kind(&self) -> Option<ErrorKind> {
        self.store_error().map(StoreError::kind)
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ValidationFailed { .. } => FailureKind::ValidationFailed,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::ServerUnavailable { .. } => FailureKind::Disconnected,
            Self::Config { .. } => FailureKind::Config,
            Self::LoadFailed { source, .. }
            | Self::PersistFailed { source, .. }
            | Self::DeleteFailed { source, .. }
            | Self::WishlistUpdateFailed { source, .. } => source.kind().into(),
        }
    }

    /// Whether a manual retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ServerUnavailable { .. } => true,
            _ => self.store_error().is_some_and(StoreError::is_transient),
        }
    }

    pub fn banner(&self) -> Banner {
        Banner {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> StoreError {
        StoreError::NetworkUnavailable {
            url: "http://localhost:3001/mobiles".into(),
            reason: "connection refused".into(),
            timed_out: false,
        }
    }

    #[test]
    fn store_backed_errors_expose_the_network_kind() {
        let err = CoreError::LoadFailed {
            collection: Collection::Devices,
            source: offline(),
        };
        assert_eq!(err.kind(), FailureKind::NetworkUnavailable);
        assert_eq!(err.store_kind(), Some(ErrorKind::NetworkUnavailable));
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("Failed to load devices: Network error"));
    }

    #[test]
    fn validation_errors_have_no_store_kind() {
        let err = CoreError::ValidationFailed {
            message: "Name and Brand are required fields".into(),
        };
        assert_eq!(err.store_kind(), None);
        assert!(!err.is_retryable());
        assert_eq!(
            err.banner(),
            Banner {
                kind: FailureKind::ValidationFailed,
                message: "Validation failed: Name and Brand are required fields".into(),
            }
        );
    }

    #[test]
    fn wishlist_failures_report_counts() {
        let err = CoreError::WishlistUpdateFailed {
            failed: 1,
            attempted: 3,
            source: StoreError::Server {
                status: 500,
                status_text: "Internal Server Error".into(),
                body: String::new(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Failed to update wishlist (1 of 3 operations failed): Server error: 500 - Internal Server Error"
        );
        assert_eq!(err.kind(), FailureKind::ServerError);
    }
}

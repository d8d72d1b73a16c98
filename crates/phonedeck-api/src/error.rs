use strum::{AsRefStr, Display};
use thiserror::Error;

/// Coarse classification of a store failure, surfaced to status banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum ErrorKind {
    /// No response reached the client.
    NetworkUnavailable,
    /// The store answered with a non-2xx status.
    ServerError,
    /// The request could not be built locally.
    RequestError,
    /// A 2xx response whose body did not match the expected shape.
    InvalidResponse,
}

/// Top-level error type for the `phonedeck-api` crate.
///
/// Every request against the record store resolves to one of these.
/// `phonedeck-core` wraps them into operation-level failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response was received (connection refused, DNS failure, timeout).
    #[error("Network error: unable to reach the record store at {url} ({reason})")]
    NetworkUnavailable {
        url: String,
        reason: String,
        timed_out: bool,
    },

    // ── HTTP ────────────────────────────────────────────────────────
    /// The store responded with a non-success status code.
    #[error("Server error: {status} - {status_text}")]
    Server {
        status: u16,
        status_text: String,
        body: String,
    },

    // ── Local ───────────────────────────────────────────────────────
    /// The request could not be constructed (bad body, bad header, ...).
    #[error("Request error: {message}")]
    Request { message: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Translate a `reqwest` failure for `url` into the store error taxonomy.
    pub(crate) fn from_reqwest(err: &reqwest::Error, url: &url::Url) -> Self {
        if err.is_builder() {
            return Self::Request {
                message: err.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return Self::Server {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                body: String::new(),
            };
        }
        Self::NetworkUnavailable {
            url: url.to_string(),
            reason: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkUnavailable { .. } => ErrorKind::NetworkUnavailable,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Request { .. } | Self::InvalidUrl(_) => ErrorKind::RequestError,
            Self::Deserialization { .. } => ErrorKind::InvalidResponse,
        }
    }

    /// HTTP status, when the store produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if a manual retry might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkUnavailable { .. } => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }
}

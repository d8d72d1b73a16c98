//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use phonedeck_config::ConfigError;
use phonedeck_core::{Collection, CoreError, StoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the record store at {url}")]
    #[diagnostic(
        code(phonedeck::connection_failed),
        help(
            "Check that the store is running, e.g.\n\
             json-server --watch db.json --port 3001\n\
             Then try: phonedeck status --server {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(phonedeck::timeout),
        help("Increase the timeout with --timeout or check the store's responsiveness.")
    )]
    Timeout { url: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(phonedeck::not_found),
        help("Run: phonedeck {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Store ────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(phonedeck::store_error), help("Failure kind: {kind}"))]
    StoreFailed {
        /// `FailureKind` name, e.g. "ServerError".
        kind: String,
        message: String,
        status: Option<u16>,
    },

    #[error("{removed} removed, {failed} could not be removed")]
    #[diagnostic(
        code(phonedeck::partial_failure),
        help("Run the command again to retry the remaining entries.")
    )]
    PartialFailure { removed: usize, failed: usize },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(phonedeck::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(phonedeck::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: phonedeck config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(phonedeck::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(phonedeck::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(phonedeck::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. }
            | Self::StoreFailed {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(collection: Collection, identifier: impl Into<String>) -> Self {
        let (resource_type, list_command) = match collection {
            Collection::Devices => ("device", "devices list"),
            Collection::Wishlist => ("wishlist entry", "wishlist list"),
            Collection::Reviews => ("review", "reviews list <DEVICE>"),
        };
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        // Unreachable store, whether found by the ping or by a later request.
        let unreachable = match (&err, err.store_error()) {
            (CoreError::ServerUnavailable { url, .. }, _) => Some((url.clone(), false)),
            (
                _,
                Some(StoreError::NetworkUnavailable {
                    url, timed_out, ..
                }),
            ) => Some((url.clone(), *timed_out)),
            _ => None,
        };
        if let Some((url, timed_out)) = unreachable {
            return if timed_out {
                Self::Timeout { url }
            } else {
                Self::ConnectionFailed {
                    url,
                    source: Box::new(err),
                }
            };
        }

        match err {
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::NotFound { collection, id } => Self::not_found(collection, id),
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            other => Self::StoreFailed {
                kind: other.kind().to_string(),
                status: other.store_error().and_then(StoreError::status),
                message: other.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            other => Self::Config(other),
        }
    }
}

//! CLI configuration -- thin wrapper around `phonedeck_config`.
//!
//! Re-exports the shared types and adds resolution that respects the
//! `--profile`, `--server` and `--timeout` flag overrides.

use std::time::Duration;

use phonedeck_core::StoreConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use phonedeck_config::{
    Config, Profile, config_path, load_config_or_default, parse_server_url, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config
        .active_profile_name(global.profile.as_deref())
        .unwrap_or("default")
        .to_owned()
}

/// Build the `StoreConfig` for this invocation.
///
/// Precedence: flag/env > profile > `[defaults]` > built-in default.
pub fn resolve_store_config(global: &GlobalOpts, config: &Config) -> Result<StoreConfig, CliError> {
    let mut store = config
        .store_config(global.profile.as_deref())
        .map_err(|e| match e {
            phonedeck_config::ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            },
            other => other.into(),
        })?;

    if let Some(ref server) = global.server {
        store.url = parse_server_url(server)?;
    }
    if let Some(secs) = global.timeout {
        store.timeout = Duration::from_secs(secs);
    }
    Ok(store)
}

fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

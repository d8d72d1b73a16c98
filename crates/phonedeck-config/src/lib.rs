//! Shared configuration for the phonedeck CLI.
//!
//! TOML profiles merged with `PHONEDECK_` environment variables, and
//! translation to `phonedeck_core::StoreConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use phonedeck_core::{DEFAULT_STORE_URL, StoreConfig};

pub const ENV_PREFIX: &str = "PHONEDECK_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named record store profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named record store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Store base URL (e.g., "http://localhost:3001").
    pub server: String,

    /// Override the default timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: DEFAULT_STORE_URL.into(),
            timeout: None,
        }
    }
}

impl Config {
    /// The profile name to use: an explicit one, else `default_profile`.
    pub fn active_profile_name<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested.or(self.default_profile.as_deref())
    }

    /// Resolve the store configuration for `requested` (or the default
    /// profile). An explicitly requested profile must exist; a missing
    /// default profile falls back to the local development store.
    pub fn store_config(&self, requested: Option<&str>) -> Result<StoreConfig, ConfigError> {
        let name = self.active_profile_name(requested);
        match name.and_then(|n| self.profiles.get(n)) {
            Some(profile) => profile_to_store_config(profile, self.defaults.timeout),
            None => match requested {
                Some(name) => Err(ConfigError::UnknownProfile { name: name.into() }),
                None => Ok(StoreConfig::default()
                    .with_timeout(Duration::from_secs(self.defaults.timeout))),
            },
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "phonedeck", "phonedeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("phonedeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing file is fine) merged with `PHONEDECK_*`
/// variables. Nested keys use a double underscore:
/// `PHONEDECK_DEFAULTS__TIMEOUT=30`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `StoreConfig` from a profile, using `default_timeout` (seconds)
/// when the profile does not set one.
pub fn profile_to_store_config(
    profile: &Profile,
    default_timeout: u64,
) -> Result<StoreConfig, ConfigError> {
    let url = parse_server_url(&profile.server)?;
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(default_timeout));
    Ok(StoreConfig::new(url).with_timeout(timeout))
}

/// Parse a store base URL; only http(s) is accepted.
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.trim().parse().map_err(|e| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.defaults.timeout, 10);
        assert_eq!(config.default_profile.as_deref(), Some("default"));

        let store = config.store_config(None).unwrap();
        assert_eq!(store.url.as_str(), "http://localhost:3001/");
        assert_eq!(store.timeout, Duration::from_secs(10));
    }

    #[test]
    fn profiles_resolve_with_timeout_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
default_profile = "lab"

[defaults]
timeout = 20

[profiles.lab]
server = "http://10.0.0.5:3001"

[profiles.slow]
server = "https://catalog.example.com"
timeout = 60
"#,
        );
        let config = load_config_from(&path).unwrap();

        let lab = config.store_config(None).unwrap();
        assert_eq!(lab.url.as_str(), "http://10.0.0.5:3001/");
        assert_eq!(lab.timeout, Duration::from_secs(20));

        let slow = config.store_config(Some("slow")).unwrap();
        assert_eq!(slow.timeout, Duration::from_secs(60));
    }

    #[test]
    fn unknown_requested_profile_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.store_config(Some("nope")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn rejects_non_http_servers() {
        assert!(parse_server_url("ftp://example.com").is_err());
        assert!(parse_server_url("not a url").is_err());
        assert!(parse_server_url(" http://localhost:3001 ").is_ok());
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert("default".into(), Profile::default());
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, config.profiles);
    }
}

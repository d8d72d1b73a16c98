//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use phonedeck_core::{Catalog, Collection, Device, RecordId};

use crate::error::CliError;

/// Connect and load the catalog; every store-bound handler starts here.
pub async fn connect(catalog: &Catalog) -> Result<(), CliError> {
    catalog.connect().await?;
    Ok(())
}

/// Parse a positional id argument, rejecting blanks before any request.
pub fn record_id(raw: &str, field: &str) -> Result<RecordId, CliError> {
    let id = RecordId::from(raw.trim());
    if id.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "id cannot be empty".into(),
        });
    }
    Ok(id)
}

/// Look a device up in the loaded snapshot.
pub fn resolve_device(catalog: &Catalog, id: &RecordId) -> Result<Arc<Device>, CliError> {
    catalog
        .store()
        .device(id)
        .ok_or_else(|| CliError::not_found(Collection::Devices, id.as_str()))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

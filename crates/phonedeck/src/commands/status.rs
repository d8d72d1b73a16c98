//! `phonedeck status`: check the store and summarize what it holds.

use serde::Serialize;

use phonedeck_core::view::wishlist_label;
use phonedeck_core::{Catalog, ConnectionState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusReport {
    server: String,
    state: String,
    devices: usize,
    wishlist: usize,
    loaded_at: Option<String>,
}

fn detail(s: &StatusReport, color: bool) -> String {
    let connected = s.state == ConnectionState::Connected.to_string();
    [
        format!("Server:    {}", s.server),
        format!("State:     {}", output::accent(&s.state, connected, color)),
        format!("Devices:   {}", s.devices),
        format!("Wishlist:  {}", wishlist_label(s.wishlist)),
        format!("Loaded at: {}", s.loaded_at.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub async fn handle(catalog: &Catalog, global: &GlobalOpts) -> Result<(), CliError> {
    catalog.connect().await?;

    let store = catalog.store();
    let report = StatusReport {
        server: catalog.location(),
        state: catalog.connection_state().to_string(),
        devices: store.device_count(),
        wishlist: store.wishlist_count(),
        loaded_at: store.last_device_load().map(|t| t.to_rfc3339()),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |s| detail(s, color),
        |s| s.state.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

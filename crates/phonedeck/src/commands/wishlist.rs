//! Wishlist command handlers.

use std::sync::Arc;

use tabled::Tabled;

use phonedeck_core::view::wishlist_label;
use phonedeck_core::{Catalog, Collection, ToggleOutcome, WishlistEntry, format_price};

use crate::cli::{GlobalOpts, WishlistArgs, WishlistCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Added")]
    added: String,
}

impl From<&Arc<WishlistEntry>> for EntryRow {
    fn from(e: &Arc<WishlistEntry>) -> Self {
        Self {
            id: e.id.to_string(),
            device: e.mobile_id.to_string(),
            name: e.name.clone(),
            brand: e.brand.clone(),
            price: format_price(e.price),
            added: e
                .added_at
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d").to_string()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(catalog: &Catalog, args: WishlistArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        WishlistCommand::List => {
            util::connect(catalog).await?;
            // Connecting only logs a wishlist failure; a listing must report it.
            let entries = catalog.wishlist().load_all().await?;

            if entries.is_empty() && output::is_human(&global.output) {
                output::print_status("Your wishlist is empty", global.quiet);
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                entries.as_slice(),
                |e| EntryRow::from(e),
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            if output::is_human(&global.output) {
                output::print_status(&wishlist_label(entries.len()), global.quiet);
            }
            Ok(())
        }

        WishlistCommand::Toggle { device } => {
            let id = util::record_id(&device, "device")?;
            util::connect(catalog).await?;
            match catalog.toggle_wishlist(&id).await? {
                ToggleOutcome::Added(entry) => {
                    output::print_status(
                        &output::accent(&format!("Added {} to the wishlist", entry.name), true, color),
                        global.quiet,
                    );
                    let out = output::render_single(
                        &global.output,
                        &entry,
                        |e| format!("Entry {} -> device {}", e.id, e.mobile_id),
                        |e| e.id.to_string(),
                    );
                    output::print_output(&out, global.quiet);
                }
                ToggleOutcome::Removed(entry_id) => {
                    output::print_status(
                        &format!("Removed wishlist entry {entry_id}"),
                        global.quiet,
                    );
                }
                ToggleOutcome::DeviceMissing => {
                    return Err(CliError::not_found(Collection::Devices, id.as_str()));
                }
            }
            Ok(())
        }

        WishlistCommand::Remove { entry } => {
            let id = util::record_id(&entry, "entry")?;
            util::connect(catalog).await?;
            catalog.remove_wishlist_entry(&id).await?;
            output::print_status("Wishlist entry removed", global.quiet);
            Ok(())
        }

        WishlistCommand::Clear => {
            util::connect(catalog).await?;
            let count = catalog.store().wishlist_count();
            if count == 0 {
                output::print_status("Your wishlist is already empty", global.quiet);
                return Ok(());
            }
            if !util::confirm(
                &format!("Remove all {}?", wishlist_label(count)),
                "wishlist clear",
                global.yes,
            )? {
                return Ok(());
            }
            let report = catalog.clear_wishlist().await?;
            output::print_status(
                &output::accent(&format!("Removed {}", wishlist_label(report.removed.len())), true, color),
                global.quiet,
            );
            Ok(())
        }

        WishlistCommand::Repair => {
            util::connect(catalog).await?;
            let report = catalog.repair_wishlist().await?;
            if !report.is_clean() {
                return Err(CliError::PartialFailure {
                    removed: report.removed.len(),
                    failed: report.failed.len(),
                });
            }
            let message = if report.removed.is_empty() {
                "No dangling wishlist entries".to_owned()
            } else {
                format!("Removed {} pointing at deleted devices", wishlist_label(report.removed.len()))
            };
            output::print_status(&message, global.quiet);
            Ok(())
        }
    }
}

//! Device command handlers.

use std::sync::Arc;

use tabled::Tabled;

use phonedeck_core::{Catalog, Device, DeviceDraft, DeviceFilter, DeviceView, format_price};

use crate::cli::{DeviceFieldArgs, DeviceListArgs, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "RAM")]
    ram: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "♥")]
    wishlisted: String,
}

fn to_row(d: &Arc<Device>, wishlisted: bool, color: bool) -> DeviceRow {
    DeviceRow {
        id: d.id.to_string(),
        name: d.name.clone(),
        brand: d.brand.clone(),
        storage: d.storage.clone(),
        ram: d.ram.clone(),
        price: format_price(d.price),
        rating: output::stars(d.rating, color),
        wishlisted: output::wishlist_marker(wishlisted, color),
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn detail(d: &Arc<Device>, wishlisted: bool) -> String {
    let timestamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string())
    };
    let mut lines = vec![
        format!("ID:          {}", d.id),
        format!("Name:        {}", d.name),
        format!("Brand:       {}", d.brand),
        format!("Model:       {}", or_dash(&d.model)),
        format!("Storage:     {}", or_dash(&d.storage)),
        format!("RAM:         {}", or_dash(&d.ram)),
        format!("Screen:      {}", or_dash(&d.screen_size)),
        format!("Camera:      {}", or_dash(&d.camera)),
        format!("Battery:     {}", or_dash(&d.battery)),
        format!("Price:       {}", format_price(d.price)),
        format!("Rating:      {}", output::stars(d.rating, false)),
        format!("Wishlisted:  {}", if wishlisted { "yes" } else { "no" }),
        format!("Created:     {}", timestamp(d.created_at)),
        format!("Updated:     {}", timestamp(d.updated_at)),
    ];
    if !d.description.is_empty() {
        lines.push(String::new());
        lines.push(d.description.clone());
    }
    lines.join("\n")
}

// ── Draft assembly ──────────────────────────────────────────────────

/// Overlay the given flags on `base` (or on the `--from-file` draft).
fn apply_fields(fields: DeviceFieldArgs, base: DeviceDraft) -> Result<DeviceDraft, CliError> {
    let mut draft = match fields.from_file {
        Some(ref path) => util::read_json_file::<DeviceDraft>(path)?,
        None => base,
    };

    let text = [
        (fields.name, &mut draft.name),
        (fields.brand, &mut draft.brand),
        (fields.model, &mut draft.model),
        (fields.storage, &mut draft.storage),
        (fields.ram, &mut draft.ram),
        (fields.screen_size, &mut draft.screen_size),
        (fields.camera, &mut draft.camera),
        (fields.battery, &mut draft.battery),
        (fields.description, &mut draft.description),
    ];
    for (value, slot) in text {
        if let Some(value) = value {
            *slot = value;
        }
    }
    if fields.price.is_some() {
        draft.price = fields.price;
    }
    if fields.rating.is_some() {
        draft.rating = fields.rating;
    }
    if fields.image.is_some() {
        draft.image = fields.image;
    }
    Ok(draft)
}

fn filters(list: &DeviceListArgs) -> Vec<DeviceFilter> {
    let mut filters = Vec::new();
    if let Some(ref brand) = list.brand {
        filters.push(DeviceFilter::Brand(brand.clone()));
    }
    if let Some(min) = list.min_rating {
        filters.push(DeviceFilter::MinRating(min));
    }
    filters
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(catalog: &Catalog, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        DevicesCommand::List(list) => {
            util::connect(catalog).await?;
            let store = catalog.store();
            let snapshot = store.devices_snapshot();
            let devices = DeviceFilter::apply_all(&filters(&list), snapshot.as_slice());
            let view = DeviceView::from_parts(
                &devices,
                &store.wishlist_snapshot(),
                &store.deleting_ids(),
                list.search.as_deref().unwrap_or(""),
            );

            if view.is_empty() && output::is_human(&global.output) {
                output::print_status(view.empty_message(), global.quiet);
                return Ok(());
            }

            let listed: Vec<Arc<Device>> = view.rows.iter().map(|r| Arc::clone(&r.device)).collect();
            let out = output::render_list(
                &global.output,
                &listed,
                |d| to_row(d, store.is_wishlisted(&d.id), color),
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            if output::is_human(&global.output) {
                output::print_status(&view.count_label(), global.quiet);
            }
            Ok(())
        }

        DevicesCommand::Show { device } => {
            let id = util::record_id(&device, "device")?;
            util::connect(catalog).await?;
            let found = util::resolve_device(catalog, &id)?;
            let wishlisted = catalog.store().is_wishlisted(&id);
            let out = output::render_single(
                &global.output,
                &found,
                |d| detail(d, wishlisted),
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add(fields) => {
            let draft = apply_fields(fields, DeviceDraft::default())?.normalized();
            draft.validate()?;
            util::connect(catalog).await?;

            let added = Arc::new(catalog.add_device(draft).await?);
            let out = output::render_single(
                &global.output,
                &added,
                |d| detail(d, false),
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            output::print_status(
                &output::accent(&format!("Added {}", added.display_name()), true, color),
                global.quiet,
            );
            Ok(())
        }

        DevicesCommand::Update { device, fields } => {
            let id = util::record_id(&device, "device")?;
            util::connect(catalog).await?;
            let existing = util::resolve_device(catalog, &id)?;
            let draft = apply_fields(fields, existing.to_draft())?;

            let updated = Arc::new(catalog.update_device(&id, draft).await?);
            let wishlisted = catalog.store().is_wishlisted(&id);
            let out = output::render_single(
                &global.output,
                &updated,
                |d| detail(d, wishlisted),
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            output::print_status("Device updated", global.quiet);
            Ok(())
        }

        DevicesCommand::Remove { device } => {
            let id = util::record_id(&device, "device")?;
            util::connect(catalog).await?;
            let found = util::resolve_device(catalog, &id)?;
            if !util::confirm(
                &format!("Remove {}?", found.display_name()),
                "devices remove",
                global.yes,
            )? {
                return Ok(());
            }

            let report = catalog.remove_device(&id).await?;
            output::print_status(
                &output::accent(&format!("Removed {}", found.display_name()), true, color),
                global.quiet,
            );
            if !report.removed.is_empty() {
                output::print_status(
                    &format!("Also removed {} wishlist entries", report.removed.len()),
                    global.quiet,
                );
            }
            if !report.is_clean() {
                output::print_status(
                    &output::accent(
                        &format!(
                            "{} wishlist entries could not be removed; run `phonedeck wishlist repair`",
                            report.failed.len()
                        ),
                        false,
                        color,
                    ),
                    global.quiet,
                );
            }
            Ok(())
        }
    }
}

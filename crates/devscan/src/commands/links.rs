//! Links command handler.

use serde::Serialize;
use tabled::Tabled;

use devscan_core::{Exclusion, InterfaceInventory, NetworkLink};

use crate::cli::{GlobalOpts, LinksArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct LinkEntry<'a> {
    #[serde(flatten)]
    link: &'a NetworkLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    excluded: Option<Exclusion>,
}

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Index")]
    index: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Multicast")]
    multicast: String,
    #[tabled(rename = "Addresses")]
    addresses: String,
    #[tabled(rename = "Selection")]
    selection: String,
}

fn row(entry: &LinkEntry<'_>, color: bool) -> LinkRow {
    let link = entry.link;
    let selection = entry.excluded.map_or_else(
        || "eligible".to_string(),
        |reason| output::muted(&format!("excluded ({reason})"), color),
    );
    LinkRow {
        name: link.name.clone(),
        index: if link.index == 0 {
            "-".into()
        } else {
            link.index.to_string()
        },
        state: output::link_state(link.is_up, color),
        multicast: if link.supports_multicast { "yes" } else { "no" }.into(),
        addresses: link
            .addresses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        selection,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: &LinksArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let state = util::load_state(global, settings).await?;
    let inventory = InterfaceInventory::scan(&state, &settings.datapath.reserved_prefix)?;

    let mut entries: Vec<LinkEntry<'_>> = inventory
        .links()
        .iter()
        .map(|link| LinkEntry {
            link,
            excluded: None,
        })
        .collect();
    if args.all {
        entries.extend(inventory.excluded().iter().map(|(link, reason)| LinkEntry {
            link,
            excluded: Some(*reason),
        }));
        entries.sort_by(|a, b| a.link.name.cmp(&b.link.name));
    }

    let color = output::should_color(settings.color);
    let out = output::render_list(
        settings.output,
        &entries,
        |e| row(e, color),
        |e| e.link.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

//! Routes command handler.

use serde::Serialize;
use tabled::Tabled;

use devscan_core::{AddressFamily, InterfaceInventory, RouteInventory};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct RouteEntry {
    family: AddressFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gateway: Option<String>,
    /// This route decides the family's egress link.
    authoritative: bool,
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Egress")]
    egress: String,
}

impl From<&RouteEntry> for RouteRow {
    fn from(r: &RouteEntry) -> Self {
        Self {
            family: r.family.label().into(),
            interface: util::or_dash(r.out_interface.as_deref()),
            gateway: util::or_dash(r.gateway.as_deref()),
            egress: if r.authoritative { "✓" } else { "" }.into(),
        }
    }
}

pub async fn handle(settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let families = settings.datapath.request(false, false, false).families();
    let state = util::load_state(global, settings).await?;
    let links = InterfaceInventory::scan(&state, &settings.datapath.reserved_prefix)?;
    let routes = RouteInventory::scan(&state, &families, &links)?;

    let mut entries = Vec::new();
    for &family in &families {
        let mut egress_seen = false;
        for route in routes.routes(family) {
            let authoritative = !egress_seen
                && route
                    .out_interface
                    .as_deref()
                    .is_some_and(|name| routes.covers(name, family));
            egress_seen |= authoritative;
            entries.push(RouteEntry {
                family,
                out_interface: route.out_interface.clone(),
                gateway: route.gateway.map(|gw| gw.to_string()),
                authoritative,
            });
        }
    }

    let out = output::render_list(
        settings.output,
        &entries,
        |r| RouteRow::from(r),
        |r| format!("{} {}", r.family, util::or_dash(r.out_interface.as_deref())),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

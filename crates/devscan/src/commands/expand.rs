//! Expand command handler.

use tabled::Tabled;

use crate::cli::{ExpandArgs, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Device")]
    name: String,
}

pub async fn handle(
    args: ExpandArgs,
    settings: &mut Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !args.patterns.is_empty() {
        settings.datapath.devices = args.patterns;
    }

    // Nothing configured: nothing to expand, and no reason to read state.
    if !settings.datapath.devices.is_empty() {
        let state = util::load_state(global, settings).await?;
        settings.datapath.expand_devices(&state)?;
    }

    let out = output::render_list(
        settings.output,
        &settings.datapath.devices,
        |name| DeviceRow { name: name.clone() },
        String::clone,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

//! Detect command handler.

use devscan_core::DetectionResult;
use tracing::info;

use crate::cli::{DetectArgs, GlobalOpts};
use crate::config::{self, Settings};
use crate::error::CliError;
use crate::output;

use super::util;

/// Requested outputs as `(devices, direct_routing, ipv6_mcast)`. No
/// selector flag means everything.
fn wanted(args: &DetectArgs) -> (bool, bool, bool) {
    if args.all || !(args.devices || args.direct_routing || args.ipv6_mcast) {
        (true, true, true)
    } else {
        (args.devices, args.direct_routing, args.ipv6_mcast)
    }
}

fn detail(r: &DetectionResult) -> String {
    [
        format!(
            "Devices:         {}",
            if r.devices.is_empty() {
                "-".into()
            } else {
                r.devices.join(", ")
            }
        ),
        format!(
            "Direct routing:  {}",
            util::or_dash(r.direct_routing_device.as_deref())
        ),
        format!(
            "IPv6 multicast:  {}",
            util::or_dash(r.ipv6_mcast_device.as_deref())
        ),
    ]
    .join("\n")
}

fn plain(r: &DetectionResult) -> String {
    [
        format!("devices={}", r.devices.join(",")),
        format!(
            "direct_routing_device={}",
            r.direct_routing_device.as_deref().unwrap_or_default()
        ),
        format!(
            "ipv6_mcast_device={}",
            r.ipv6_mcast_device.as_deref().unwrap_or_default()
        ),
    ]
    .join("\n")
}

pub async fn handle(
    args: &DetectArgs,
    settings: &mut Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (devices, direct, mcast) = wanted(args);
    let request = settings.datapath.request(devices, direct, mcast);
    settings.datapath.validate()?;

    let state = util::load_state(global, settings).await?;
    let result = devscan_core::detect_devices(
        &request,
        &state,
        &settings.identity,
        &settings.datapath.reserved_prefix,
    )?;

    if args.save {
        settings
            .datapath
            .detect_devices(devices, direct, mcast, &state, &settings.identity)?;
        let cfg = config::saved_config(settings)?;
        config::save_config_to(&cfg, &settings.path)?;
        info!(path = %settings.path.display(), "detection results saved");
    }

    let out = output::render_single(settings.output, &result, detail, plain);
    output::print_output(&out, global.quiet);
    Ok(())
}

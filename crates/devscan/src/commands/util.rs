//! Shared helpers for command handlers.

use devscan_core::StateSnapshot;
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::CliError;

/// Host state for this invocation: the `--state` replay if given, a live
/// rtnetlink capture otherwise.
pub async fn load_state(global: &GlobalOpts, settings: &Settings) -> Result<StateSnapshot, CliError> {
    if let Some(ref path) = global.state {
        debug!(path = %path.display(), "replaying state snapshot");
        return Ok(StateSnapshot::load(path)?);
    }

    debug!(timeout_secs = settings.timeout.as_secs(), "capturing kernel state");
    Ok(StateSnapshot::capture(settings.timeout).await?)
}

/// `-` for an absent value in table and detail views.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

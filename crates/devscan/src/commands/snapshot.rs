//! Snapshot command handler.
//!
//! Emits the captured host state in a form `--state` can replay. Table and
//! plain output fall back to pretty JSON.

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let state = util::load_state(global, settings).await?;

    let format = match settings.output {
        OutputFormat::Table | OutputFormat::Plain => OutputFormat::Json,
        other => other,
    };
    let out = output::render_single(format, &state, |_| String::new(), |_| String::new());
    output::print_output(&out, global.quiet);
    Ok(())
}

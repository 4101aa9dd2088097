//! Command dispatch: bridges CLI args -> core selection -> output formatting.

pub mod completions;
pub mod config_cmd;
pub mod detect;
pub mod expand;
pub mod links;
pub mod routes;
pub mod snapshot;
pub mod util;

use crate::cli::{Cli, Command};
use crate::config::resolve;
use crate::error::CliError;

/// Run one parsed invocation.
///
/// `config` and `completions` never resolve settings, so they still work
/// when the config file is broken.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    tracing::debug!(command = ?cli.command, "dispatching command");
    let global = &cli.global;

    match cli.command {
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            completions::handle(&args);
            Ok(())
        }
        Command::Detect(args) => detect::handle(&args, &mut resolve(global)?, global).await,
        Command::Expand(args) => expand::handle(args, &mut resolve(global)?, global).await,
        Command::Links(args) => links::handle(&args, &resolve(global)?, global).await,
        Command::Routes => routes::handle(&resolve(global)?, global).await,
        Command::Snapshot => snapshot::handle(&resolve(global)?, global).await,
    }
}

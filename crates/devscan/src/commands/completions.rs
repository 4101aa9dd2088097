//! Shell completion scripts.

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};

pub fn handle(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, bin, &mut std::io::stdout());
}

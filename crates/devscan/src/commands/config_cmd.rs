//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Settings};
use crate::error::CliError;
use crate::output;

/// The file layers with every CLI override folded in.
fn effective(settings: Settings) -> Config {
    let mut cfg = settings.file;
    cfg.update_datapath(&settings.datapath);
    cfg.set_node(settings.identity.ipv4, settings.identity.ipv6);
    cfg.defaults.timeout = settings.timeout.as_secs();
    cfg
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = config::active_path(global);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::active_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            if !global.quiet {
                eprintln!("Wrote default configuration to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let settings = config::resolve(global)?;
            let format = settings.output;
            let cfg = effective(settings);
            let toml_text = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                format,
                &cfg,
                |_| toml_text.clone(),
                |_| toml_text.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

//! CLI configuration: thin wrapper around `devscan_config`.
//!
//! Loads the file + environment layers and applies `GlobalOpts` flag
//! overrides on top (--ipv4, --node-ip, --output, ...).

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use devscan_core::{DatapathConfig, StaticNodeIdentity};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use devscan_config::{Config, config_path, load_config_from, load_file_config, save_config_to};

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Config file in use (may not exist yet).
    pub path: PathBuf,
    /// File + environment layers, before flag overrides. Never written back
    /// as-is; see [`saved_config`].
    pub file: Config,
    pub datapath: DatapathConfig,
    pub identity: StaticNodeIdentity,
    pub output: OutputFormat,
    pub color: ColorMode,
    pub timeout: Duration,
}

/// Config path from `--config`, falling back to the platform location.
pub fn active_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the config and apply CLI flag overrides. Flags win over the
/// environment, which wins over the file.
pub fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let path = active_path(global);
    let file = load_config_from(&path)?;

    let mut datapath = file.to_datapath_config()?;
    if let Some(v4) = global.ipv4 {
        datapath.enable_ipv4 = v4;
    }
    if let Some(v6) = global.ipv6 {
        datapath.enable_ipv6 = v6;
    }
    if let Some(ref prefix) = global.reserved_prefix {
        if prefix.trim().is_empty() {
            return Err(CliError::Validation {
                field: "--reserved-prefix".into(),
                reason: "must not be empty".into(),
            });
        }
        datapath.reserved_prefix.clone_from(prefix);
    }

    let mut identity = file.node_identity()?;
    for ip in &global.node_ip {
        identity.set(*ip);
    }

    let output = match global.output {
        Some(format) => format,
        None => parse_choice::<OutputFormat>("defaults.output", &file.defaults.output)?,
    };
    let color = match global.color {
        Some(mode) => mode,
        None => parse_choice::<ColorMode>("defaults.color", &file.defaults.color)?,
    };
    let timeout = Duration::from_secs(global.timeout.unwrap_or(file.defaults.timeout));

    Ok(Settings {
        path,
        file,
        datapath,
        identity,
        output,
        color,
        timeout,
    })
}

/// The on-disk file with the effective datapath inputs and results of this
/// invocation folded in. Environment-only values not reflected in
/// `settings` stay out of the file.
pub fn saved_config(settings: &Settings) -> Result<Config, CliError> {
    let mut cfg = load_file_config(&settings.path)?;
    cfg.update_datapath(&settings.datapath);
    cfg.set_node(settings.identity.ipv4, settings.identity.ipv6);
    Ok(cfg)
}

fn parse_choice<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("unknown value '{raw}'"),
    })
}

//! On-disk configuration for devscan.
//!
//! A TOML file in the platform config directory, overlaid with
//! `DEVSCAN_`-prefixed environment variables, translated into
//! `devscan_core::DatapathConfig` and a static node identity. The CLI layers
//! its global flags on top.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use devscan_core::{DEFAULT_RESERVED_PREFIX, DatapathConfig, StaticNodeIdentity};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub datapath: DatapathSection,

    #[serde(default)]
    pub node: NodeSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Kernel capture deadline, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// `[datapath]`: families, exclusions and pinned devices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatapathSection {
    #[serde(default = "default_true")]
    pub enable_ipv4: bool,

    #[serde(default)]
    pub enable_ipv6: bool,

    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,

    /// Device names or `prefix+` patterns.
    #[serde(default)]
    pub devices: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_routing_device: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_mcast_device: Option<String>,
}

impl Default for DatapathSection {
    fn default() -> Self {
        Self {
            enable_ipv4: true,
            enable_ipv6: false,
            reserved_prefix: default_reserved_prefix(),
            devices: Vec::new(),
            direct_routing_device: None,
            ipv6_mcast_device: None,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_reserved_prefix() -> String {
    DEFAULT_RESERVED_PREFIX.into()
}

/// `[node]`: the addresses this node advertises to the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
}

// ── Translation into core types ─────────────────────────────────────

impl Config {
    /// Build the datapath settings, rejecting an empty reserved prefix.
    pub fn to_datapath_config(&self) -> Result<DatapathConfig, ConfigError> {
        let section = &self.datapath;
        if section.reserved_prefix.trim().is_empty() {
            return Err(ConfigError::validation(
                "datapath.reserved_prefix",
                "must not be empty",
            ));
        }

        Ok(DatapathConfig {
            enable_ipv4: section.enable_ipv4,
            enable_ipv6: section.enable_ipv6,
            reserved_prefix: section.reserved_prefix.clone(),
            devices: section.devices.clone(),
            direct_routing_device: section.direct_routing_device.clone(),
            ipv6_mcast_device: section.ipv6_mcast_device.clone(),
        })
    }

    /// Parse `[node]` addresses, checking each sits in the right family.
    pub fn node_identity(&self) -> Result<StaticNodeIdentity, ConfigError> {
        Ok(StaticNodeIdentity {
            ipv4: parse_node_addr(self.node.ipv4.as_deref(), "node.ipv4")?
                .map(|ip| match ip {
                    IpAddr::V4(v4) => Ok(v4),
                    IpAddr::V6(_) => Err(ConfigError::validation("node.ipv4", "not an IPv4 address")),
                })
                .transpose()?,
            ipv6: parse_node_addr(self.node.ipv6.as_deref(), "node.ipv6")?
                .map(|ip| match ip {
                    IpAddr::V6(v6) => Ok(v6),
                    IpAddr::V4(_) => Err(ConfigError::validation("node.ipv6", "not an IPv6 address")),
                })
                .transpose()?,
        })
    }

    /// Copy datapath settings back into the file section: the families and
    /// prefix that drove detection along with its results.
    pub fn update_datapath(&mut self, datapath: &DatapathConfig) {
        self.datapath.enable_ipv4 = datapath.enable_ipv4;
        self.datapath.enable_ipv6 = datapath.enable_ipv6;
        self.datapath
            .reserved_prefix
            .clone_from(&datapath.reserved_prefix);
        self.datapath.devices.clone_from(&datapath.devices);
        self.datapath
            .direct_routing_device
            .clone_from(&datapath.direct_routing_device);
        self.datapath
            .ipv6_mcast_device
            .clone_from(&datapath.ipv6_mcast_device);
    }

    /// Record node addresses from typed values.
    pub fn set_node(&mut self, ipv4: Option<Ipv4Addr>, ipv6: Option<Ipv6Addr>) {
        self.node.ipv4 = ipv4.map(|a| a.to_string());
        self.node.ipv6 = ipv6.map(|a| a.to_string());
    }
}

fn parse_node_addr(raw: Option<&str>, field: &str) -> Result<Option<IpAddr>, ConfigError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<IpAddr>()
                .map_err(|_| ConfigError::validation(field, format!("'{s}' is not an IP address")))
        })
        .transpose()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "devscan", "devscan").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("devscan");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load from an explicit path + environment. A missing file yields the
/// defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = file_figment(path)
        .merge(Env::prefixed("DEVSCAN_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load the file layer alone, ignoring `DEVSCAN_` variables. This is the
/// base for anything written back to disk.
pub fn load_file_config(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = file_figment(path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent
/// directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use devscan_config::ConfigError;
use devscan_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const DETECTION_IMPOSSIBLE: u8 = 3;
    pub const AMBIGUOUS: u8 = 4;
    pub const STATE_UNAVAILABLE: u8 = 5;
    pub const CONFIG: u8 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Detection ────────────────────────────────────────────────────

    #[error("Impossible to detect {what}: {reason}")]
    #[diagnostic(
        code(devscan::detection_impossible),
        help(
            "Pass the node address with --node-ip, add a default route,\n\
             or pin the device under [datapath] in the config file.\n\
             Inspect candidates with: devscan links --all"
        )
    )]
    DetectionImpossible { what: String, reason: String },

    #[error("Node address {address} is carried by more than one interface: {links}")]
    #[diagnostic(
        code(devscan::ambiguous_node_address),
        help(
            "Remove the duplicate address, move the extra interface under the\n\
             reserved prefix, or pin direct_routing_device in the config file."
        )
    )]
    AmbiguousNodeAddress { address: String, links: String },

    // ── Host state ───────────────────────────────────────────────────

    #[error("Network state unavailable: {message}")]
    #[diagnostic(
        code(devscan::state_unavailable),
        help(
            "Reading links and routes needs access to the host network namespace.\n\
             Replay a capture instead with: devscan --state FILE ..."
        )
    )]
    StateUnavailable { message: String },

    #[error("Invalid state snapshot: {message}")]
    #[diagnostic(
        code(devscan::snapshot),
        help("Produce a valid file with: devscan snapshot -o yaml > state.yaml")
    )]
    InvalidSnapshot { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(devscan::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(devscan::config),
        help("Check the file shown by: devscan config path")
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file already exists: {path}")]
    #[diagnostic(
        code(devscan::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to render TOML: {0}")]
    #[diagnostic(code(devscan::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::DetectionImpossible { .. } => exit_code::DETECTION_IMPOSSIBLE,
            Self::AmbiguousNodeAddress { .. } => exit_code::AMBIGUOUS,
            Self::StateUnavailable { .. } | Self::InvalidSnapshot { .. } => {
                exit_code::STATE_UNAVAILABLE
            }
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) | Self::ConfigExists { .. } => exit_code::CONFIG,
            Self::Io(_) | Self::Toml(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DetectionImpossible { what, reason } => CliError::DetectionImpossible {
                what: what.into(),
                reason,
            },

            CoreError::AmbiguousPriorityMatch {
                family: _,
                address,
                links,
            } => CliError::AmbiguousNodeAddress {
                address: address.to_string(),
                links: links.join(", "),
            },

            CoreError::StateUnavailable { message } => CliError::StateUnavailable { message },

            CoreError::Snapshot { message } => CliError::InvalidSnapshot { message },

            CoreError::Config { message } => CliError::Config(ConfigError::Validation {
                field: "datapath".into(),
                reason: message,
            }),
        }
    }
}

//! Clap derive structures for the `devscan` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// devscan -- datapath device detection for Linux hosts
#[derive(Debug, Parser)]
#[command(
    name = "devscan",
    version,
    about = "Detect datapath devices from host links and default routes",
    long_about = "Inspects the host's network links and default routes and picks the\n\
        interfaces a packet datapath should attach to: the datapath device set,\n\
        the direct routing device and the IPv6 multicast device.\n\n\
        Reads the live kernel state over rtnetlink, or replays a snapshot\n\
        captured earlier with `devscan snapshot` (see --state).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "DEVSCAN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Replay a JSON/YAML state snapshot instead of reading the kernel
    #[arg(long, value_name = "FILE", env = "DEVSCAN_STATE", global = true)]
    pub state: Option<PathBuf>,

    /// Enable or disable IPv4 (overrides config)
    #[arg(long, value_name = "BOOL", global = true)]
    pub ipv4: Option<bool>,

    /// Enable or disable IPv6 (overrides config)
    #[arg(long, value_name = "BOOL", global = true)]
    pub ipv6: Option<bool>,

    /// Node address advertised to the cluster (repeat for dual-stack)
    #[arg(long = "node-ip", value_name = "IP", global = true)]
    pub node_ip: Vec<IpAddr>,

    /// Name prefix of datapath-owned interfaces to ignore
    #[arg(long, value_name = "PREFIX", global = true)]
    pub reserved_prefix: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "DEVSCAN_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Kernel capture timeout in seconds
    #[arg(long, env = "DEVSCAN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Detect datapath devices
    #[command(alias = "d")]
    Detect(DetectArgs),

    /// Expand device patterns (`eth+`) into interface names
    #[command(alias = "x")]
    Expand(ExpandArgs),

    /// List interfaces eligible for selection
    #[command(alias = "l")]
    Links(LinksArgs),

    /// List default routes per enabled family
    #[command(alias = "r")]
    Routes,

    /// Capture kernel state for offline replay with --state
    Snapshot,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Detect ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Detect the datapath device set
    #[arg(long)]
    pub devices: bool,

    /// Detect the direct routing device
    #[arg(long)]
    pub direct_routing: bool,

    /// Detect the IPv6 multicast device
    #[arg(long)]
    pub ipv6_mcast: bool,

    /// Detect everything (the default when no selector flag is given)
    #[arg(long, short = 'a', conflicts_with_all = ["devices", "direct_routing", "ipv6_mcast"])]
    pub all: bool,

    /// Write the results into the configuration file
    #[arg(long)]
    pub save: bool,
}

// ── Expand ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Device names or prefix patterns; defaults to `datapath.devices`
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,
}

// ── Links ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LinksArgs {
    /// Include loopback and reserved-prefix links
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

//! Datapath device selection on top of `devscan-sys` kernel snapshots.
//!
//! This crate owns the domain model and the selection policy:
//!
//! - **[`InterfaceInventory`] / [`RouteInventory`]**: Read-only views over a
//!   [`NetworkState`] provider. Loopback and reserved-prefix links are
//!   excluded up front and never become eligible for auto-selection.
//!
//! - **[`detect_devices`]**: The device selector. Given a
//!   [`DetectionRequest`] and a [`NodeIdentity`], picks the datapath device
//!   set, the direct routing device and the IPv6 multicast device. The
//!   node's advertised address always outranks default-route heuristics.
//!
//! - **[`expand_devices`]**: Resolves configured [`DevicePattern`]s
//!   (`eth0`, `eth+`) against live interface names.
//!
//! - **[`DatapathConfig`]**: Caller-owned configuration sink. Its
//!   `detect_devices` / `expand_devices` methods run the pure functions above
//!   and write results back only on success.
//!
//! - **[`StateSnapshot`]**: Immutable in-memory provider, captured from the
//!   kernel with [`StateSnapshot::capture`] or loaded from JSON/YAML.

pub mod config;
pub mod convert;
pub mod error;
pub mod expand;
pub mod inventory;
pub mod model;
pub mod selector;
pub mod state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_RESERVED_PREFIX, DatapathConfig};
pub use error::CoreError;
pub use expand::expand_devices;
pub use inventory::{Exclusion, InterfaceInventory, RouteInventory};
pub use model::{
    AddressFamily, DefaultRoute, DetectionRequest, DetectionResult, DevicePattern, NetworkLink,
};
pub use selector::{detect_devices, select};
pub use state::{NetworkState, NodeIdentity, StateSnapshot, StaticNodeIdentity};

// ── Core error types ──
//
// User-facing errors from devscan-core. Netlink failures never surface
// raw: the `From<devscan_sys::Error>` impl folds them into
// `StateUnavailable`. An empty detection request is not an error at all.

use std::net::IpAddr;

use thiserror::Error;

use crate::model::AddressFamily;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Selection errors ─────────────────────────────────────────────
    /// A requested output has no qualifying interface. Callers must not
    /// fall back to an unverified interface.
    #[error("Impossible to detect {what}: {reason}")]
    DetectionImpossible { what: &'static str, reason: String },

    /// More than one eligible interface carries the node address.
    #[error(
        "Node {family} address {address} is carried by more than one interface: {}",
        .links.join(", ")
    )]
    AmbiguousPriorityMatch {
        family: AddressFamily,
        address: IpAddr,
        links: Vec<String>,
    },

    // ── Provider errors ──────────────────────────────────────────────
    /// The network state provider could not be queried. Not retried.
    #[error("Network state unavailable: {message}")]
    StateUnavailable { message: String },

    /// A stored snapshot could not be read or parsed.
    #[error("Invalid state snapshot: {message}")]
    Snapshot { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn impossible(what: &'static str, reason: impl Into<String>) -> Self {
        Self::DetectionImpossible {
            what,
            reason: reason.into(),
        }
    }
}

// ── Conversion from capture-layer errors ─────────────────────────────

impl From<devscan_sys::Error> for CoreError {
    fn from(err: devscan_sys::Error) -> Self {
        CoreError::StateUnavailable {
            message: err.to_string(),
        }
    }
}

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// IP address family. Ordering is significant: IPv4 is consulted first
/// wherever the selector has to break a tie between families.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Family of a concrete address.
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::Ipv4,
            IpAddr::V6(_) => Self::Ipv6,
        }
    }

    /// Human label used in log lines and diagnostics ("IPv4" / "IPv6").
    pub fn label(self) -> &'static str {
        match self {
            Self::Ipv4 => "IPv4",
            Self::Ipv6 => "IPv6",
        }
    }
}

impl From<devscan_sys::RouteFamily> for AddressFamily {
    fn from(family: devscan_sys::RouteFamily) -> Self {
        match family {
            devscan_sys::RouteFamily::V4 => Self::Ipv4,
            devscan_sys::RouteFamily::V6 => Self::Ipv6,
        }
    }
}

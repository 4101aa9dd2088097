// ── Link and route domain types ──

use std::net::IpAddr;

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use super::family::AddressFamily;

/// A network link as seen at scan time. The name is unique per scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLink {
    pub name: String,
    /// Kernel interface index. Zero when unknown (hand-written snapshots).
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub is_up: bool,
    #[serde(default)]
    pub supports_multicast: bool,
    #[serde(default)]
    pub is_loopback: bool,
    /// Assigned addresses with their prefix length; the family is implied.
    #[serde(default)]
    pub addresses: Vec<IpNetwork>,
}

impl NetworkLink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: 0,
            is_up: false,
            supports_multicast: false,
            is_loopback: false,
            addresses: Vec::new(),
        }
    }

    pub fn up(mut self) -> Self {
        self.is_up = true;
        self
    }

    pub fn multicast(mut self) -> Self {
        self.supports_multicast = true;
        self
    }

    pub fn loopback(mut self) -> Self {
        self.is_loopback = true;
        self
    }

    /// Add an address. Duplicates are ignored.
    pub fn with_address(mut self, network: IpNetwork) -> Self {
        if !self.addresses.contains(&network) {
            self.addresses.push(network);
        }
        self
    }

    /// Addresses of one family, in assignment order.
    pub fn addresses_of(&self, family: AddressFamily) -> impl Iterator<Item = &IpNetwork> {
        self.addresses
            .iter()
            .filter(move |n| AddressFamily::of(&n.ip()) == family)
    }

    pub fn has_family(&self, family: AddressFamily) -> bool {
        self.addresses_of(family).next().is_some()
    }

    /// `true` if the link carries exactly this address (prefix length ignored).
    pub fn has_address(&self, addr: IpAddr) -> bool {
        self.addresses.iter().any(|n| n.ip() == addr)
    }

    /// `true` if `addr` falls inside one of the link's on-link prefixes.
    pub fn is_on_link(&self, addr: IpAddr) -> bool {
        self.addresses.iter().any(|n| n.contains(addr))
    }
}

/// A route whose destination covers the whole address space of `family`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRoute {
    pub family: AddressFamily,
    /// Egress link name. Absent for gateway-only routes; the route
    /// inventory then resolves the egress from the gateway's prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
}

impl DefaultRoute {
    pub fn via(family: AddressFamily, out_interface: impl Into<String>) -> Self {
        Self {
            family,
            out_interface: Some(out_interface.into()),
            gateway: None,
        }
    }
}

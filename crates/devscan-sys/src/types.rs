// ── Raw kernel records ──
//
// Thin, owned mirrors of the netlink messages we care about. No policy
// lives here: loopback/reserved-prefix filtering and default-route
// selection belong to `devscan-core`.

use std::net::IpAddr;

use ipnetwork::IpNetwork;

/// Address family of a route dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteFamily {
    V4,
    V6,
}

/// One entry of the link dump (`RTM_GETLINK`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub index: u32,
    pub name: String,
    pub up: bool,
    pub multicast: bool,
    pub loopback: bool,
}

/// One entry of the address dump (`RTM_GETADDR`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAddress {
    /// Index of the link carrying the address.
    pub index: u32,
    pub network: IpNetwork,
}

/// One entry of a route dump (`RTM_GETROUTE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRoute {
    pub family: RouteFamily,
    pub destination_prefix_len: u8,
    /// Routing table id (the 32-bit attribute wins over the header byte).
    pub table: u32,
    /// Plain unicast route (not local/broadcast/unreachable/...).
    pub unicast: bool,
    pub oif: Option<u32>,
    pub gateway: Option<IpAddr>,
}

impl RawRoute {
    /// Kernel id of the main routing table.
    pub const MAIN_TABLE: u32 = 254;

    /// `true` for a unicast route in the main table whose destination
    /// covers the whole address space.
    pub fn is_default(&self) -> bool {
        self.unicast && self.destination_prefix_len == 0 && self.table == Self::MAIN_TABLE
    }
}

/// Everything captured over one netlink connection, in dump order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSnapshot {
    pub links: Vec<RawLink>,
    pub addresses: Vec<RawAddress>,
    pub routes: Vec<RawRoute>,
}

impl HostSnapshot {
    /// Resolve a link index to its name.
    pub fn link_name(&self, index: u32) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.index == index)
            .map(|l| l.name.as_str())
    }
}

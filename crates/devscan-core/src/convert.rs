// ── Capture-to-domain conversions ──
//
// Bridges raw `devscan_sys` records into `StateSnapshot`. Addresses are
// folded into their links by index, route egress indices are resolved
// to names, and everything that is not a default route is dropped.

use std::collections::HashMap;

use devscan_sys::{HostSnapshot, RawLink, RawRoute};
use ipnetwork::IpNetwork;

use crate::model::{AddressFamily, DefaultRoute, NetworkLink};
use crate::state::StateSnapshot;

impl From<&HostSnapshot> for StateSnapshot {
    fn from(host: &HostSnapshot) -> Self {
        let mut by_index: HashMap<u32, Vec<IpNetwork>> = HashMap::new();
        for addr in &host.addresses {
            by_index.entry(addr.index).or_default().push(addr.network);
        }

        let links = host
            .links
            .iter()
            .map(|raw| link_from_raw(raw, by_index.remove(&raw.index).unwrap_or_default()))
            .collect();

        let routes = host
            .routes
            .iter()
            .filter(|r| r.is_default())
            .map(|r| route_from_raw(r, host))
            .collect();

        Self { links, routes }
    }
}

fn link_from_raw(raw: &RawLink, addresses: Vec<IpNetwork>) -> NetworkLink {
    addresses.into_iter().fold(
        NetworkLink {
            name: raw.name.clone(),
            index: raw.index,
            is_up: raw.up,
            supports_multicast: raw.multicast,
            is_loopback: raw.loopback,
            addresses: Vec::new(),
        },
        NetworkLink::with_address,
    )
}

/// An egress index with no matching link (raced with a link deletion)
/// leaves the route gateway-only.
fn route_from_raw(raw: &RawRoute, host: &HostSnapshot) -> DefaultRoute {
    DefaultRoute {
        family: AddressFamily::from(raw.family),
        out_interface: raw
            .oif
            .and_then(|index| host.link_name(index))
            .map(str::to_string),
        gateway: raw.gateway,
    }
}

// ── rtnetlink capture ──
//
// Opens a single route-netlink connection, dumps links, addresses and
// both route families, then tears the connection down. The dumps are
// bounded by the host's interface/route counts, so everything is
// collected eagerly.

use std::net::IpAddr;
use std::time::Duration;

use futures_util::TryStreamExt;
use ipnetwork::IpNetwork;
use netlink_packet_route::{
    AddressFamily,
    address::{AddressAttribute, AddressMessage},
    link::{LinkAttribute, LinkFlag, LinkMessage},
    route::{RouteAddress, RouteAttribute, RouteMessage, RouteType},
};
use rtnetlink::{Handle, IpVersion};
use tracing::debug;

use crate::error::Error;
use crate::types::{HostSnapshot, RawAddress, RawLink, RawRoute, RouteFamily};

/// Capture links, addresses and routes from the current network namespace.
///
/// Must be called from within a tokio runtime; the netlink connection task
/// is spawned on it and aborted once the dumps complete.
pub async fn capture() -> Result<HostSnapshot, Error> {
    let (connection, handle, _) = rtnetlink::new_connection().map_err(Error::Connect)?;
    let connection_task = tokio::spawn(connection);

    let result = capture_with(&handle).await;
    connection_task.abort();

    if let Ok(ref snap) = result {
        debug!(
            links = snap.links.len(),
            addresses = snap.addresses.len(),
            routes = snap.routes.len(),
            "captured host network state"
        );
    }
    result
}

/// [`capture`] bounded by a deadline. On expiry the partial dump is
/// discarded and the connection task is dropped with the future.
pub async fn capture_with_timeout(timeout: Duration) -> Result<HostSnapshot, Error> {
    tokio::time::timeout(timeout, capture())
        .await
        .map_err(|_| Error::Timeout {
            timeout_secs: timeout.as_secs(),
        })?
}

async fn capture_with(handle: &Handle) -> Result<HostSnapshot, Error> {
    let links: Vec<LinkMessage> = handle
        .link()
        .get()
        .execute()
        .try_collect()
        .await
        .map_err(|source| Error::Request {
            what: "link",
            source,
        })?;

    let addresses: Vec<AddressMessage> = handle
        .address()
        .get()
        .execute()
        .try_collect()
        .await
        .map_err(|source| Error::Request {
            what: "address",
            source,
        })?;

    let mut routes = Vec::new();
    for version in [IpVersion::V4, IpVersion::V6] {
        let msgs: Vec<RouteMessage> = handle
            .route()
            .get(version)
            .execute()
            .try_collect()
            .await
            .map_err(|source| Error::Request {
                what: "route",
                source,
            })?;
        routes.extend(msgs.iter().filter_map(parse_route));
    }

    Ok(HostSnapshot {
        links: links.iter().filter_map(parse_link).collect(),
        addresses: addresses.iter().filter_map(parse_address).collect(),
        routes,
    })
}

// ── Message parsing ──────────────────────────────────────────────────

/// Links without a name attribute are skipped.
pub(crate) fn parse_link(msg: &LinkMessage) -> Option<RawLink> {
    let name = msg.attributes.iter().find_map(|attr| match attr {
        LinkAttribute::IfName(name) => Some(name.clone()),
        _ => None,
    })?;

    let flags = &msg.header.flags;
    Some(RawLink {
        index: msg.header.index,
        name,
        up: flags.contains(&LinkFlag::Up),
        multicast: flags.contains(&LinkFlag::Multicast),
        loopback: flags.contains(&LinkFlag::Loopback),
    })
}

/// On point-to-point IPv4 links `IFA_ADDRESS` is the peer, so `IFA_LOCAL`
/// takes precedence when present.
pub(crate) fn parse_address(msg: &AddressMessage) -> Option<RawAddress> {
    let mut address = None;
    let mut local = None;
    for attr in &msg.attributes {
        match attr {
            AddressAttribute::Address(ip) => address = Some(*ip),
            AddressAttribute::Local(ip) => local = Some(*ip),
            _ => {}
        }
    }

    let ip = local.or(address)?;
    let network = IpNetwork::new(ip, msg.header.prefix_len).ok()?;
    Some(RawAddress {
        index: msg.header.index,
        network,
    })
}

pub(crate) fn parse_route(msg: &RouteMessage) -> Option<RawRoute> {
    let family = match msg.header.address_family {
        AddressFamily::Inet => RouteFamily::V4,
        AddressFamily::Inet6 => RouteFamily::V6,
        _ => return None,
    };

    let mut table = u32::from(msg.header.table);
    let mut oif = None;
    let mut gateway = None;

    for attr in &msg.attributes {
        match attr {
            RouteAttribute::Table(id) => table = *id,
            RouteAttribute::Oif(index) => oif = Some(*index),
            RouteAttribute::Gateway(addr) => gateway = route_address(addr),
            RouteAttribute::MultiPath(hops) => {
                // First hop stands in for the route; no ECMP weighting.
                if let Some(hop) = hops.first() {
                    oif = oif.or(Some(hop.interface_index));
                    gateway = gateway.or_else(|| {
                        hop.attributes.iter().find_map(|a| match a {
                            RouteAttribute::Gateway(addr) => route_address(addr),
                            _ => None,
                        })
                    });
                }
            }
            _ => {}
        }
    }

    Some(RawRoute {
        family,
        destination_prefix_len: msg.header.destination_prefix_length,
        table,
        unicast: msg.header.kind == RouteType::Unicast,
        oif,
        gateway,
    })
}

fn route_address(addr: &RouteAddress) -> Option<IpAddr> {
    match addr {
        RouteAddress::Inet(v4) => Some(IpAddr::V4(*v4)),
        RouteAddress::Inet6(v6) => Some(IpAddr::V6(*v6)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn parse_link_reads_name_and_flags() {
        let mut msg = LinkMessage::default();
        msg.header.index = 3;
        msg.header.flags = vec![LinkFlag::Up, LinkFlag::Multicast];
        msg.attributes.push(LinkAttribute::IfName("eth0".into()));

        let link = parse_link(&msg).unwrap();
        assert_eq!(link.index, 3);
        assert_eq!(link.name, "eth0");
        assert!(link.up);
        assert!(link.multicast);
        assert!(!link.loopback);
    }

    #[test]
    fn parse_link_without_name_is_skipped() {
        let msg = LinkMessage::default();
        assert!(parse_link(&msg).is_none());
    }

    #[test]
    fn parse_address_prefers_local() {
        let mut msg = AddressMessage::default();
        msg.header.index = 4;
        msg.header.prefix_len = 32;
        msg.attributes.push(AddressAttribute::Address(IpAddr::V4(Ipv4Addr::new(
            10, 0, 0, 2,
        ))));
        msg.attributes.push(AddressAttribute::Local(IpAddr::V4(Ipv4Addr::new(
            10, 0, 0, 1,
        ))));

        let addr = parse_address(&msg).unwrap();
        assert_eq!(addr.index, 4);
        assert_eq!(addr.network.to_string(), "10.0.0.1/32");
    }

    #[test]
    fn parse_route_extracts_gateway_and_oif() {
        let mut msg = RouteMessage::default();
        msg.header.address_family = AddressFamily::Inet;
        msg.header.table = 254;
        msg.header.kind = RouteType::Unicast;
        msg.attributes.push(RouteAttribute::Oif(5));
        msg.attributes
            .push(RouteAttribute::Gateway(RouteAddress::Inet(Ipv4Addr::new(
                10, 0, 1, 254,
            ))));

        let route = parse_route(&msg).unwrap();
        assert_eq!(route.family, RouteFamily::V4);
        assert!(route.is_default());
        assert_eq!(route.oif, Some(5));
        assert_eq!(
            route.gateway,
            Some(IpAddr::V4(Ipv4Addr::new(10, 0, 1, 254)))
        );
    }

    #[test]
    fn parse_route_skips_unknown_family() {
        let msg = RouteMessage::default();
        assert!(parse_route(&msg).is_none());
    }
}

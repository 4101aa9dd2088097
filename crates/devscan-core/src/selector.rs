// ── Device selector ──
//
// Layered policy, evaluated per enabled family with IPv4 first:
//   1. the link carrying the node's advertised address (priority match),
//   2. the egress link of the family's default route.
// The datapath device set is the priority matches plus any link that is
// the default-route egress for *every* enabled family.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::CoreError;
use crate::inventory::{InterfaceInventory, RouteInventory};
use crate::model::{AddressFamily, DetectionRequest, DetectionResult, NetworkLink};
use crate::state::{NetworkState, NodeIdentity};

type PriorityMatches<'a> = BTreeMap<AddressFamily, &'a NetworkLink>;

/// Scan `state` and run [`select`].
///
/// A request with every flag cleared returns an empty result without
/// reading `state` at all.
pub fn detect_devices<S, I>(
    request: &DetectionRequest,
    state: &S,
    identity: &I,
    reserved_prefix: &str,
) -> Result<DetectionResult, CoreError>
where
    S: NetworkState + ?Sized,
    I: NodeIdentity + ?Sized,
{
    if request.is_noop() {
        debug!("no device detection required");
        return Ok(DetectionResult::default());
    }

    let links = InterfaceInventory::scan(state, reserved_prefix)?;
    let routes = RouteInventory::scan(state, &request.families(), &links)?;
    select(request, &links, &routes, identity)
}

/// Pick devices from already-scanned inventories. Pure: the same request
/// over the same inventories always yields the same result.
pub fn select<I>(
    request: &DetectionRequest,
    links: &InterfaceInventory,
    routes: &RouteInventory,
    identity: &I,
) -> Result<DetectionResult, CoreError>
where
    I: NodeIdentity + ?Sized,
{
    if request.is_noop() {
        return Ok(DetectionResult::default());
    }

    let families = request.families();
    let mut priority = PriorityMatches::new();
    for &family in &families {
        if let Some(link) = priority_match(links, identity, family)? {
            debug!(family = %family, link = %link.name, "node address priority match");
            priority.insert(family, link);
        }
    }

    let mut result = DetectionResult::default();

    if request.need_devices {
        result.devices = select_devices(&families, links, routes, &priority);
        if result.devices.is_empty() {
            return Err(CoreError::impossible(
                "datapath devices",
                "no interface carries the node address or is the default route egress for every enabled family",
            ));
        }
    }

    if request.need_direct_routing_device {
        result.direct_routing_device =
            Some(select_direct_routing_device(&families, routes, &priority)?);
    }

    if request.need_ipv6_mcast_device {
        if request.enable_ipv6 {
            result.ipv6_mcast_device = Some(select_ipv6_mcast_device(
                links,
                priority.get(&AddressFamily::Ipv6).copied(),
            )?);
        } else {
            debug!("IPv6 disabled, skipping IPv6 multicast device detection");
        }
    }

    info!(
        devices = ?result.devices,
        direct_routing_device = ?result.direct_routing_device,
        ipv6_mcast_device = ?result.ipv6_mcast_device,
        "device detection complete"
    );

    Ok(result)
}

/// A link is a candidate for `family` if it carries an address of that
/// family or is the family's default-route egress.
fn is_candidate(link: &NetworkLink, family: AddressFamily, routes: &RouteInventory) -> bool {
    link.has_family(family) || routes.covers(&link.name, family)
}

// ── Selection steps ──────────────────────────────────────────────────

fn priority_match<'a, I>(
    links: &'a InterfaceInventory,
    identity: &I,
    family: AddressFamily,
) -> Result<Option<&'a NetworkLink>, CoreError>
where
    I: NodeIdentity + ?Sized,
{
    let Some(address) = identity.node_address(family) else {
        return Ok(None);
    };
    if AddressFamily::of(&address) != family {
        debug!(family = %family, %address, "node address has the wrong family, ignoring");
        return Ok(None);
    }

    let matches: Vec<&NetworkLink> = links
        .links()
        .iter()
        .filter(|l| l.has_address(address))
        .collect();

    match matches.as_slice() {
        [] => Ok(None),
        [link] => Ok(Some(*link)),
        many => Err(CoreError::AmbiguousPriorityMatch {
            family,
            address,
            links: many.iter().map(|l| l.name.clone()).collect(),
        }),
    }
}

fn select_devices(
    families: &[AddressFamily],
    links: &InterfaceInventory,
    routes: &RouteInventory,
    priority: &PriorityMatches<'_>,
) -> Vec<String> {
    let mut devices: BTreeSet<&str> = priority.values().map(|l| l.name.as_str()).collect();

    if !families.is_empty() {
        for link in links.links() {
            if !families.iter().any(|&f| is_candidate(link, f, routes)) {
                continue;
            }
            if families.iter().all(|&f| routes.covers(&link.name, f)) {
                devices.insert(&link.name);
            } else {
                debug!(link = %link.name, "candidate does not cover every enabled family, skipping");
            }
        }
    }

    devices.into_iter().map(str::to_string).collect()
}

fn select_direct_routing_device(
    families: &[AddressFamily],
    routes: &RouteInventory,
    priority: &PriorityMatches<'_>,
) -> Result<String, CoreError> {
    if let Some(link) = families.iter().find_map(|f| priority.get(f)) {
        return Ok(link.name.clone());
    }
    if let Some(name) = families.iter().find_map(|&f| routes.egress(f)) {
        return Ok(name.to_string());
    }
    Err(CoreError::impossible(
        "direct routing device",
        "no interface carries the node address and no default route leaves through an eligible interface",
    ))
}

fn select_ipv6_mcast_device(
    links: &InterfaceInventory,
    priority: Option<&NetworkLink>,
) -> Result<String, CoreError> {
    if let Some(link) = priority {
        if link.supports_multicast {
            return Ok(link.name.clone());
        }
        debug!(link = %link.name, "IPv6 node address link is not multicast capable");
    }

    links
        .links()
        .iter()
        .find(|l| l.supports_multicast && l.has_family(AddressFamily::Ipv6))
        .map(|l| l.name.clone())
        .ok_or_else(|| {
            CoreError::impossible(
                "IPv6 multicast device",
                "no multicast-capable interface carries an IPv6 address",
            )
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::DefaultRoute;
    use crate::state::{StateSnapshot, StaticNodeIdentity};

    fn link(name: &str, cidr: &str) -> NetworkLink {
        NetworkLink::new(name).up().with_address(cidr.parse().unwrap())
    }

    fn node(addr: &str) -> StaticNodeIdentity {
        StaticNodeIdentity::from_addrs([addr.parse().unwrap()])
    }

    fn run(
        request: DetectionRequest,
        state: &StateSnapshot,
        identity: &StaticNodeIdentity,
    ) -> Result<DetectionResult, CoreError> {
        detect_devices(&request, state, identity, "dp_")
    }

    #[test]
    fn ambiguous_node_address_is_an_error() {
        let state = StateSnapshot::default()
            .with_link(link("eth0", "10.0.0.1/24"))
            .with_link(link("eth1", "10.0.0.1/32"));

        let err = run(DetectionRequest::new(true, false, false), &state, &node("10.0.0.1"))
            .unwrap_err();
        match err {
            CoreError::AmbiguousPriorityMatch { family, links, .. } => {
                assert_eq!(family, AddressFamily::Ipv4);
                assert_eq!(links, vec!["eth0".to_string(), "eth1".to_string()]);
            }
            other => panic!("expected AmbiguousPriorityMatch, got {other:?}"),
        }
    }

    #[test]
    fn reserved_duplicate_of_node_address_is_not_ambiguous() {
        let state = StateSnapshot::default()
            .with_link(link("eth0", "10.0.0.1/24"))
            .with_link(link("dp_host", "10.0.0.1/32"));

        let result = run(DetectionRequest::new(true, true, false), &state, &node("10.0.0.1"))
            .unwrap();
        assert_eq!(result.devices, vec!["eth0"]);
        assert_eq!(result.direct_routing_device.as_deref(), Some("eth0"));
    }

    #[test]
    fn direct_routing_falls_back_to_default_route() {
        let state = StateSnapshot::default()
            .with_link(link("eth0", "10.0.0.1/24"))
            .with_link(link("eth1", "10.0.1.1/24"))
            .with_route(DefaultRoute::via(AddressFamily::Ipv4, "eth1"));

        let result = run(
            DetectionRequest::new(false, true, false),
            &state,
            &StaticNodeIdentity::default(),
        )
        .unwrap();
        assert_eq!(result.direct_routing_device.as_deref(), Some("eth1"));
        assert!(result.devices.is_empty());
    }

    #[test]
    fn ipv4_priority_match_wins_over_ipv6() {
        let state = StateSnapshot::default()
            .with_link(link("eth0", "10.0.0.1/24"))
            .with_link(link("eth1", "2001:db8::1/64"));
        let identity = StaticNodeIdentity::from_addrs([
            "2001:db8::1".parse().unwrap(),
            "10.0.0.1".parse().unwrap(),
        ]);

        let result = run(
            DetectionRequest::new(true, true, false).with_families(true, true),
            &state,
            &identity,
        )
        .unwrap();
        assert_eq!(result.direct_routing_device.as_deref(), Some("eth0"));
        assert_eq!(result.devices, vec!["eth0", "eth1"]);
    }

    #[test]
    fn mcast_falls_back_when_priority_link_lacks_multicast() {
        let state = StateSnapshot::default()
            .with_link(link("eth0", "2001:db8::1/64"))
            .with_link(link("eth2", "2001:db8:2::1/64").multicast())
            .with_link(link("eth1", "2001:db8:1::1/64").multicast());

        let result = run(
            DetectionRequest::new(false, false, true).with_families(false, true),
            &state,
            &node("2001:db8::1"),
        )
        .unwrap();
        assert_eq!(result.ipv6_mcast_device.as_deref(), Some("eth1"));
    }

    #[test]
    fn mcast_without_candidates_is_impossible() {
        let state = StateSnapshot::default().with_link(link("eth0", "2001:db8::1/64"));
        let err = run(
            DetectionRequest::new(false, false, true).with_families(false, true),
            &state,
            &StaticNodeIdentity::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::DetectionImpossible {
                what: "IPv6 multicast device",
                ..
            }
        ));
    }

    #[test]
    fn mcast_is_skipped_when_ipv6_disabled() {
        let state = StateSnapshot::default().with_link(link("eth0", "10.0.0.1/24").multicast());
        let result = run(
            DetectionRequest::new(false, false, true),
            &state,
            &StaticNodeIdentity::default(),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn no_enabled_family_cannot_detect_devices() {
        let state = StateSnapshot::default()
            .with_link(link("eth0", "10.0.0.1/24"))
            .with_route(DefaultRoute::via(AddressFamily::Ipv4, "eth0"));
        let err = run(
            DetectionRequest::new(true, false, false).with_families(false, false),
            &state,
            &node("10.0.0.1"),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::DetectionImpossible { .. }));
    }

    #[test]
    fn candidate_by_address_or_route() {
        let state = StateSnapshot::default()
            .with_link(link("eth0", "10.0.0.1/24"))
            .with_link(NetworkLink::new("ppp0").up())
            .with_route(DefaultRoute::via(AddressFamily::Ipv4, "ppp0"));
        let links = InterfaceInventory::scan(&state, "dp_").unwrap();
        let routes = RouteInventory::scan(&state, &[AddressFamily::Ipv4], &links).unwrap();

        let eth0 = links.get("eth0").unwrap();
        let ppp0 = links.get("ppp0").unwrap();
        assert!(is_candidate(eth0, AddressFamily::Ipv4, &routes));
        assert!(is_candidate(ppp0, AddressFamily::Ipv4, &routes));
        assert!(!is_candidate(eth0, AddressFamily::Ipv6, &routes));

        // eth0 is a candidate by address only and covers no default route.
        let result = select(
            &DetectionRequest::new(true, false, false),
            &links,
            &routes,
            &StaticNodeIdentity::default(),
        )
        .unwrap();
        assert_eq!(result.devices, vec!["ppp0"]);
    }
}

// ── Interface and route inventories ──
//
// Per-call snapshots built from a `NetworkState`. The interface inventory
// applies the eligibility exclusions once, so nothing downstream can pick
// a loopback or dataplane-owned link by accident.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{AddressFamily, DefaultRoute, NetworkLink};
use crate::state::NetworkState;

/// Why a present link is not eligible for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exclusion {
    Loopback,
    ReservedPrefix,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loopback => "loopback",
            Self::ReservedPrefix => "reserved prefix",
        })
    }
}

// ── Interface inventory ──────────────────────────────────────────────

/// Eligible links sorted by name, plus the links that were set aside.
#[derive(Debug, Clone, Default)]
pub struct InterfaceInventory {
    links: Vec<NetworkLink>,
    excluded: Vec<(NetworkLink, Exclusion)>,
}

impl InterfaceInventory {
    /// Read the link list from `state` and apply the exclusions.
    pub fn scan<S>(state: &S, reserved_prefix: &str) -> Result<Self, CoreError>
    where
        S: NetworkState + ?Sized,
    {
        let links = state.list_links()?;
        Ok(Self::from_links(links, reserved_prefix))
    }

    /// Build from an already-read link list. A repeated name keeps its
    /// first occurrence.
    pub fn from_links(links: Vec<NetworkLink>, reserved_prefix: &str) -> Self {
        let mut eligible: BTreeMap<String, NetworkLink> = BTreeMap::new();
        let mut excluded = Vec::new();

        for link in links {
            if let Some(reason) = exclusion(&link, reserved_prefix) {
                debug!(link = %link.name, %reason, "link not eligible");
                excluded.push((link, reason));
            } else if eligible.contains_key(&link.name) {
                debug!(link = %link.name, "duplicate link name, keeping first");
            } else {
                eligible.insert(link.name.clone(), link);
            }
        }

        excluded.sort_by(|a, b| a.0.name.cmp(&b.0.name));

        Self {
            links: eligible.into_values().collect(),
            excluded,
        }
    }

    /// Eligible links, sorted by name.
    pub fn links(&self) -> &[NetworkLink] {
        &self.links
    }

    pub fn excluded(&self) -> &[(NetworkLink, Exclusion)] {
        &self.excluded
    }

    pub fn get(&self, name: &str) -> Option<&NetworkLink> {
        self.links
            .binary_search_by(|l| l.name.as_str().cmp(name))
            .ok()
            .and_then(|i| self.links.get(i))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|l| l.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

fn exclusion(link: &NetworkLink, reserved_prefix: &str) -> Option<Exclusion> {
    if link.is_loopback || link.name == "lo" {
        Some(Exclusion::Loopback)
    } else if !reserved_prefix.is_empty() && link.name.starts_with(reserved_prefix) {
        Some(Exclusion::ReservedPrefix)
    } else {
        None
    }
}

fn is_link_local(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_link_local(),
        IpAddr::V6(v6) => v6.is_unicast_link_local(),
    }
}

// ── Route inventory ──────────────────────────────────────────────────

/// Default routes per family with their egress resolved to a link name.
#[derive(Debug, Clone, Default)]
pub struct RouteInventory {
    routes: BTreeMap<AddressFamily, Vec<DefaultRoute>>,
    egress: BTreeMap<AddressFamily, String>,
}

impl RouteInventory {
    /// Read default routes for each requested family.
    ///
    /// Gateway-only routes get their egress from the first eligible link
    /// whose prefix contains the gateway. Link-local gateways sit on every
    /// link's prefix and stay unresolved. The authoritative egress of a
    /// family is the first route, in discovery order, that lands on an
    /// eligible link; metrics are not consulted.
    pub fn scan<S>(
        state: &S,
        families: &[AddressFamily],
        links: &InterfaceInventory,
    ) -> Result<Self, CoreError>
    where
        S: NetworkState + ?Sized,
    {
        let mut inventory = Self::default();

        for &family in families {
            let mut resolved = Vec::new();
            for mut route in state.list_default_routes(family)? {
                if route.family != family {
                    continue;
                }
                if route.out_interface.is_none() {
                    route.out_interface = route
                        .gateway
                        .filter(|gw| !is_link_local(*gw))
                        .and_then(|gw| {
                            links
                                .links()
                                .iter()
                                .find(|l| l.is_on_link(gw))
                                .map(|l| l.name.clone())
                        });
                }
                resolved.push(route);
            }

            let egress = resolved
                .iter()
                .filter_map(|r| r.out_interface.as_deref())
                .find(|name| links.get(name).is_some());

            match egress {
                Some(name) => {
                    debug!(family = %family, link = %name, "default route egress");
                    inventory.egress.insert(family, name.to_string());
                }
                None => debug!(
                    family = %family,
                    routes = resolved.len(),
                    "no default route through an eligible link"
                ),
            }

            inventory.routes.insert(family, resolved);
        }

        Ok(inventory)
    }

    /// All default routes of a family, in discovery order.
    pub fn routes(&self, family: AddressFamily) -> &[DefaultRoute] {
        self.routes.get(&family).map(Vec::as_slice).unwrap_or_default()
    }

    /// Egress link of the family's authoritative default route.
    pub fn egress(&self, family: AddressFamily) -> Option<&str> {
        self.egress.get(&family).map(String::as_str)
    }

    /// `true` if `name` is the authoritative egress for `family`.
    pub fn covers(&self, name: &str, family: AddressFamily) -> bool {
        self.egress(family) == Some(name)
    }
}

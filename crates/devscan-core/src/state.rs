// ── Network state and node identity providers ──
//
// The selector never talks to the kernel. It reads through these two
// traits, which lets tests and `--state` replays feed it in-memory
// snapshots instead of real network namespaces.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{AddressFamily, DefaultRoute, NetworkLink};

/// Read-only view of host links and default routes.
pub trait NetworkState {
    /// Every present link, unfiltered. Fails as a whole; no partial lists.
    fn list_links(&self) -> Result<Vec<NetworkLink>, CoreError>;

    /// Default routes of one family, in discovery order. An empty list is
    /// a normal answer.
    fn list_default_routes(&self, family: AddressFamily) -> Result<Vec<DefaultRoute>, CoreError>;
}

/// Source of the node's externally advertised address per family.
pub trait NodeIdentity {
    fn node_address(&self, family: AddressFamily) -> Option<IpAddr>;
}

// ── Static node identity ─────────────────────────────────────────────

/// Node addresses supplied up front (configuration or CLI flags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticNodeIdentity {
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
}

impl StaticNodeIdentity {
    /// Build from a list of addresses; a later address of the same family
    /// replaces an earlier one.
    pub fn from_addrs(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        let mut identity = Self::default();
        for addr in addrs {
            identity.set(addr);
        }
        identity
    }

    pub fn set(&mut self, addr: IpAddr) {
        match addr {
            IpAddr::V4(v4) => self.ipv4 = Some(v4),
            IpAddr::V6(v6) => self.ipv6 = Some(v6),
        }
    }
}

impl NodeIdentity for StaticNodeIdentity {
    fn node_address(&self, family: AddressFamily) -> Option<IpAddr> {
        match family {
            AddressFamily::Ipv4 => self.ipv4.map(IpAddr::V4),
            AddressFamily::Ipv6 => self.ipv6.map(IpAddr::V6),
        }
    }
}

// ── In-memory snapshot ───────────────────────────────────────────────

/// Immutable capture of host links and default routes.
///
/// Serializes to a stable JSON/YAML document so a capture taken on one
/// machine can be replayed elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub links: Vec<NetworkLink>,
    #[serde(default)]
    pub routes: Vec<DefaultRoute>,
}

impl StateSnapshot {
    /// Capture the current network namespace over rtnetlink.
    pub async fn capture(timeout: Duration) -> Result<Self, CoreError> {
        let host = devscan_sys::capture_with_timeout(timeout).await?;
        Ok(Self::from(&host))
    }

    pub fn with_link(mut self, link: NetworkLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_route(mut self, route: DefaultRoute) -> Self {
        self.routes.push(route);
        self
    }

    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        serde_json::from_str(text).map_err(|e| CoreError::Snapshot {
            message: format!("invalid JSON: {e}"),
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, CoreError> {
        serde_yaml::from_str(text).map_err(|e| CoreError::Snapshot {
            message: format!("invalid YAML: {e}"),
        })
    }

    /// Load a snapshot file. `.yaml`/`.yml` parse as YAML, anything else
    /// as JSON.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::Snapshot {
            message: format!("cannot read {}: {e}", path.display()),
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }
}

impl NetworkState for StateSnapshot {
    fn list_links(&self) -> Result<Vec<NetworkLink>, CoreError> {
        Ok(self.links.clone())
    }

    fn list_default_routes(&self, family: AddressFamily) -> Result<Vec<DefaultRoute>, CoreError> {
        Ok(self
            .routes
            .iter()
            .filter(|r| r.family == family)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn identity_keeps_one_address_per_family() {
        let identity = StaticNodeIdentity::from_addrs([
            "10.0.0.1".parse().unwrap(),
            "2001:db8::1".parse().unwrap(),
            "10.0.0.2".parse().unwrap(),
        ]);
        assert_eq!(
            identity.node_address(AddressFamily::Ipv4),
            Some("10.0.0.2".parse().unwrap())
        );
        assert_eq!(
            identity.node_address(AddressFamily::Ipv6),
            Some("2001:db8::1".parse().unwrap())
        );
    }

    #[test]
    fn routes_are_filtered_by_family() {
        let snap = StateSnapshot::default()
            .with_route(DefaultRoute::via(AddressFamily::Ipv4, "eth0"))
            .with_route(DefaultRoute::via(AddressFamily::Ipv6, "eth1"));

        let v6 = snap.list_default_routes(AddressFamily::Ipv6).unwrap();
        assert_eq!(v6.len(), 1);
        assert_eq!(v6[0].out_interface.as_deref(), Some("eth1"));
    }

    #[test]
    fn load_yaml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "links:\n  - name: eth0\n    is_up: true\n    addresses: [\"10.0.0.1/24\"]\nroutes:\n  - family: ipv4\n    out_interface: eth0\n"
        )
        .unwrap();

        let snap = StateSnapshot::load(file.path()).unwrap();
        assert_eq!(snap.links.len(), 1);
        assert!(snap.links[0].is_up);
        assert_eq!(snap.routes[0].out_interface.as_deref(), Some("eth0"));
    }

    #[test]
    fn bad_json_is_snapshot_error() {
        let err = StateSnapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Snapshot { .. }));
    }
}

// ── Datapath configuration sink ──
//
// Caller-owned settings the selector reads from and writes into. Writers
// go through `&mut self`; a failed pass leaves every field untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::expand;
use crate::inventory::InterfaceInventory;
use crate::model::{DetectionRequest, DetectionResult};
use crate::selector;
use crate::state::{NetworkState, NodeIdentity};

/// Name prefix of interfaces owned by the datapath itself.
pub const DEFAULT_RESERVED_PREFIX: &str = "dp_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatapathConfig {
    pub enable_ipv4: bool,
    pub enable_ipv6: bool,
    pub reserved_prefix: String,
    /// Device names or patterns (`eth+`). Replaced by concrete names after
    /// detection or expansion.
    pub devices: Vec<String>,
    pub direct_routing_device: Option<String>,
    pub ipv6_mcast_device: Option<String>,
}

impl Default for DatapathConfig {
    fn default() -> Self {
        Self {
            enable_ipv4: true,
            enable_ipv6: false,
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
            devices: Vec::new(),
            direct_routing_device: None,
            ipv6_mcast_device: None,
        }
    }
}

impl DatapathConfig {
    /// Detection request for the configured families.
    pub fn request(
        &self,
        need_devices: bool,
        need_direct_routing_device: bool,
        need_ipv6_mcast_device: bool,
    ) -> DetectionRequest {
        DetectionRequest::new(
            need_devices,
            need_direct_routing_device,
            need_ipv6_mcast_device,
        )
        .with_families(self.enable_ipv4, self.enable_ipv6)
    }

    /// Run detection and store the requested outputs.
    ///
    /// Only fields whose flag is set are written, and only when the whole
    /// pass succeeds.
    pub fn detect_devices<S, I>(
        &mut self,
        need_devices: bool,
        need_direct_routing_device: bool,
        need_ipv6_mcast_device: bool,
        state: &S,
        identity: &I,
    ) -> Result<(), CoreError>
    where
        S: NetworkState + ?Sized,
        I: NodeIdentity + ?Sized,
    {
        let request = self.request(
            need_devices,
            need_direct_routing_device,
            need_ipv6_mcast_device,
        );
        if !request.is_noop() {
            self.validate()?;
        }
        let result = selector::detect_devices(&request, state, identity, &self.reserved_prefix)?;
        self.apply(&request, result);
        Ok(())
    }

    /// Replace the configured device patterns with the concrete names they
    /// match. An empty list is left alone without reading `state`.
    pub fn expand_devices<S>(&mut self, state: &S) -> Result<(), CoreError>
    where
        S: NetworkState + ?Sized,
    {
        if self.devices.is_empty() {
            return Ok(());
        }

        self.validate()?;
        let links = InterfaceInventory::scan(state, &self.reserved_prefix)?;
        let expanded = expand::expand_devices(&self.devices, &links);
        debug!(patterns = ?self.devices, devices = ?expanded, "expanded device patterns");
        self.devices = expanded;
        Ok(())
    }

    /// A blank reserved prefix would let datapath-owned interfaces be
    /// selected.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.reserved_prefix.trim().is_empty() {
            return Err(CoreError::Config {
                message: "reserved interface prefix must not be empty".into(),
            });
        }
        Ok(())
    }

    fn apply(&mut self, request: &DetectionRequest, result: DetectionResult) {
        if request.need_devices {
            info!(devices = ?result.devices, "datapath devices");
            self.devices = result.devices;
        }
        if request.need_direct_routing_device {
            info!(device = ?result.direct_routing_device, "direct routing device");
            self.direct_routing_device = result.direct_routing_device;
        }
        if request.need_ipv6_mcast_device && request.enable_ipv6 {
            info!(device = ?result.ipv6_mcast_device, "IPv6 multicast device");
            self.ipv6_mcast_device = result.ipv6_mcast_device;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AddressFamily, DefaultRoute, NetworkLink};
    use crate::state::{StateSnapshot, StaticNodeIdentity};

    fn state() -> StateSnapshot {
        StateSnapshot::default()
            .with_link(NetworkLink::new("eth0").up().with_address("10.0.0.1/24".parse().unwrap()))
            .with_link(NetworkLink::new("eth1").up().with_address("10.0.1.1/24".parse().unwrap()))
            .with_route(DefaultRoute::via(AddressFamily::Ipv4, "eth1"))
    }

    #[test]
    fn detection_writes_only_requested_fields() {
        let mut config = DatapathConfig {
            devices: vec!["keep".into()],
            ..DatapathConfig::default()
        };
        config
            .detect_devices(false, true, false, &state(), &StaticNodeIdentity::default())
            .unwrap();

        assert_eq!(config.devices, vec!["keep"]);
        assert_eq!(config.direct_routing_device.as_deref(), Some("eth1"));
    }

    #[test]
    fn failed_detection_leaves_config_untouched() {
        let mut config = DatapathConfig {
            direct_routing_device: Some("old".into()),
            ..DatapathConfig::default()
        };
        let before = config.clone();
        let empty = StateSnapshot::default();

        let err = config
            .detect_devices(true, true, false, &empty, &StaticNodeIdentity::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::DetectionImpossible { .. }));
        assert_eq!(config, before);
    }

    #[test]
    fn expansion_rewrites_patterns() {
        let mut config = DatapathConfig {
            devices: vec!["eth+".into()],
            ..DatapathConfig::default()
        };
        config.expand_devices(&state()).unwrap();
        assert_eq!(config.devices, vec!["eth0", "eth1"]);
    }

    #[test]
    fn blank_reserved_prefix_is_rejected() {
        for prefix in ["", " ", "\t"] {
            let mut config = DatapathConfig {
                reserved_prefix: prefix.into(),
                ..DatapathConfig::default()
            };
            let err = config
                .detect_devices(true, false, false, &state(), &StaticNodeIdentity::default())
                .unwrap_err();
            assert!(matches!(err, CoreError::Config { .. }), "prefix {prefix:?}");
        }
    }

    #[test]
    fn request_carries_configured_families() {
        let config = DatapathConfig {
            enable_ipv6: true,
            ..DatapathConfig::default()
        };
        let request = config.request(true, false, false);
        assert!(request.enable_ipv4 && request.enable_ipv6);
    }
}

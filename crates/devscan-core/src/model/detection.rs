use serde::{Deserialize, Serialize};

use super::family::AddressFamily;

/// What the caller wants detected, and which families are in play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRequest {
    pub need_devices: bool,
    pub need_direct_routing_device: bool,
    pub need_ipv6_mcast_device: bool,
    pub enable_ipv4: bool,
    pub enable_ipv6: bool,
}

impl DetectionRequest {
    /// IPv4-only request; adjust families with [`with_families`](Self::with_families).
    pub fn new(
        need_devices: bool,
        need_direct_routing_device: bool,
        need_ipv6_mcast_device: bool,
    ) -> Self {
        Self {
            need_devices,
            need_direct_routing_device,
            need_ipv6_mcast_device,
            enable_ipv4: true,
            enable_ipv6: false,
        }
    }

    pub fn with_families(mut self, enable_ipv4: bool, enable_ipv6: bool) -> Self {
        self.enable_ipv4 = enable_ipv4;
        self.enable_ipv6 = enable_ipv6;
        self
    }

    /// Nothing requested: detection is a no-op.
    pub fn is_noop(&self) -> bool {
        !(self.need_devices || self.need_direct_routing_device || self.need_ipv6_mcast_device)
    }

    pub fn is_enabled(&self, family: AddressFamily) -> bool {
        match family {
            AddressFamily::Ipv4 => self.enable_ipv4,
            AddressFamily::Ipv6 => self.enable_ipv6,
        }
    }

    /// Enabled families, IPv4 first.
    pub fn families(&self) -> Vec<AddressFamily> {
        [AddressFamily::Ipv4, AddressFamily::Ipv6]
            .into_iter()
            .filter(|f| self.is_enabled(*f))
            .collect()
    }
}

/// Outcome of one detection pass. Only requested fields are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Sorted, deduplicated link names.
    pub devices: Vec<String>,
    pub direct_routing_device: Option<String>,
    pub ipv6_mcast_device: Option<String>,
}

impl DetectionResult {
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
            && self.direct_routing_device.is_none()
            && self.ipv6_mcast_device.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_flags_false_is_noop() {
        assert!(DetectionRequest::new(false, false, false).is_noop());
        assert!(!DetectionRequest::new(false, false, true).is_noop());
    }

    #[test]
    fn families_are_ordered() {
        let req = DetectionRequest::new(true, false, false).with_families(true, true);
        assert_eq!(
            req.families(),
            vec![AddressFamily::Ipv4, AddressFamily::Ipv6]
        );
        let req = req.with_families(false, true);
        assert_eq!(req.families(), vec![AddressFamily::Ipv6]);
        assert!(req.with_families(false, false).families().is_empty());
    }

    #[test]
    fn default_result_is_empty() {
        assert!(DetectionResult::default().is_empty());
    }
}

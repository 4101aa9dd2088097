use std::fmt;

use serde::{Deserialize, Serialize};

/// Trailing marker turning a device token into a prefix match.
pub const WILDCARD: char = '+';

/// A configured device token: an exact interface name or a name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DevicePattern {
    Exact(String),
    Prefix(String),
}

impl DevicePattern {
    /// Parse a raw token. Every trailing wildcard is stripped, so `eth++`
    /// behaves like `eth+`, and a lone `+` matches every name.
    pub fn parse(token: &str) -> Self {
        if token.ends_with(WILDCARD) {
            Self::Prefix(token.trim_end_matches(WILDCARD).to_string())
        } else {
            Self::Exact(token.to_string())
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
        }
    }
}

impl From<&str> for DevicePattern {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl From<String> for DevicePattern {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<DevicePattern> for String {
    fn from(pattern: DevicePattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for DevicePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Prefix(prefix) => write!(f, "{prefix}{WILDCARD}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exact_and_prefix() {
        assert_eq!(DevicePattern::parse("eth0"), DevicePattern::Exact("eth0".into()));
        assert_eq!(DevicePattern::parse("eth+"), DevicePattern::Prefix("eth".into()));
        assert_eq!(DevicePattern::parse("eth++"), DevicePattern::Prefix("eth".into()));
        assert_eq!(DevicePattern::parse("+"), DevicePattern::Prefix(String::new()));
    }

    #[test]
    fn prefix_matches_by_start() {
        let p = DevicePattern::parse("dum+");
        assert!(p.matches("dummy0"));
        assert!(p.matches("dum"));
        assert!(!p.matches("eth0"));
        assert!(DevicePattern::parse("+").matches("anything"));
    }

    #[test]
    fn exact_requires_full_name() {
        let p = DevicePattern::parse("other0");
        assert!(p.matches("other0"));
        assert!(!p.matches("other01"));
    }

    #[test]
    fn display_round_trips_token() {
        assert_eq!(DevicePattern::parse("eth+").to_string(), "eth+");
        assert_eq!(DevicePattern::parse("eth0").to_string(), "eth0");
    }
}

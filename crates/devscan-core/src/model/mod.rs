// ── Domain model ──
//
// Plain data recomputed on every scan. Nothing here talks to the kernel.

mod detection;
mod family;
mod link;
mod pattern;

pub use detection::{DetectionRequest, DetectionResult};
pub use family::AddressFamily;
pub use link::{DefaultRoute, NetworkLink};
pub use pattern::{DevicePattern, WILDCARD};

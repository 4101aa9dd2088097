// devscan-sys: raw Linux network state capture over rtnetlink

pub mod error;
pub mod netlink;
pub mod types;

pub use error::Error;
pub use netlink::{capture, capture_with_timeout};
pub use types::{HostSnapshot, RawAddress, RawLink, RawRoute, RouteFamily};

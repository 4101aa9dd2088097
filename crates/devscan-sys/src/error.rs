use thiserror::Error;

/// Top-level error type for the `devscan-sys` crate.
///
/// `devscan-core` folds every variant into `StateUnavailable`; the
/// distinction here is kept for logs and diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// The netlink socket could not be opened (missing capability,
    /// unsupported platform, exhausted descriptors).
    #[error("Failed to open netlink connection: {0}")]
    Connect(#[source] std::io::Error),

    /// A dump request was rejected or the reply stream broke.
    #[error("Netlink {what} dump failed: {source}")]
    Request {
        what: &'static str,
        #[source]
        source: rtnetlink::Error,
    },

    /// The capture did not finish within the caller's deadline.
    #[error("Netlink capture timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

// ── Device pattern expansion ──

use std::collections::BTreeSet;

use tracing::debug;

use crate::inventory::InterfaceInventory;
use crate::model::DevicePattern;

/// Resolve configured device tokens against eligible links.
///
/// Exact tokens survive only if a link of that name exists; prefix tokens
/// (`eth+`) expand to every link whose name starts with the prefix. The
/// output is sorted and deduplicated. Tokens that match nothing are
/// dropped.
pub fn expand_devices<T: AsRef<str>>(patterns: &[T], links: &InterfaceInventory) -> Vec<String> {
    let mut expanded = BTreeSet::new();

    for token in patterns {
        let pattern = DevicePattern::parse(token.as_ref());
        let mut matched = 0usize;
        for name in links.names().filter(|name| pattern.matches(name)) {
            matched += 1;
            expanded.insert(name.to_string());
        }
        if matched == 0 {
            debug!(pattern = %pattern, "device pattern matched no interface");
        }
    }

    expanded.into_iter().collect()
}

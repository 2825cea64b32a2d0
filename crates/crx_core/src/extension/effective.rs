//! Effective host access.
//!
//! # Responsibility
//! - Merge host permissions and content-script matches into one pattern set.
//! - Decide whether that access amounts to every host.
//! - List distinct hosts, collapsed by registered domain.
//!
//! # Invariants
//! - Results are derived once when a descriptor is sealed and never change.
//! - A pattern without a host (file access) counts as the host `<scheme>://`
//!   so gaining it is visible to host diffs and messages.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use super::content_script::ContentScript;
use super::domain::{registered_domain_key, DomainRegistry};
use super::permissions::grants_all_hosts;
use super::url_pattern::{UrlPattern, UrlPatternSet};

/// Union of explicit host permissions and every content-script match.
pub fn derive_effective_hosts(
    host_permissions: &[UrlPattern],
    content_scripts: &[ContentScript],
) -> UrlPatternSet {
    host_permissions
        .iter()
        .chain(content_scripts.iter().flat_map(|script| script.url_patterns.iter()))
        .cloned()
        .collect()
}

/// True when an API permission implies every host, or any host permission
/// or content-script match covers every host.
pub fn has_effective_access_to_all_hosts(
    api_permissions: &BTreeSet<String>,
    host_permissions: &[UrlPattern],
    content_scripts: &[ContentScript],
) -> bool {
    if grants_all_hosts(api_permissions) {
        return true;
    }
    host_permissions
        .iter()
        .chain(content_scripts.iter().flat_map(|script| script.url_patterns.iter()))
        .any(UrlPattern::matches_all_hosts)
}

/// Host shown for `pattern`; hostless patterns use `<scheme>://`.
fn display_host(pattern: &UrlPattern) -> Cow<'_, str> {
    match pattern.host() {
        "" => Cow::Owned(format!("{}://", pattern.scheme())),
        host => Cow::Borrowed(host),
    }
}

fn host_key(pattern: &UrlPattern, registry: &dyn DomainRegistry) -> String {
    match pattern.host() {
        "" => display_host(pattern).into_owned(),
        host => registered_domain_key(host, registry),
    }
}

/// Hosts named by `patterns`, one per registered domain, in first-seen
/// order.
pub fn distinct_hosts(patterns: &[UrlPattern], registry: &dyn DomainRegistry) -> Vec<String> {
    let mut seen_domains = HashSet::new();
    let mut hosts = Vec::new();
    for pattern in patterns {
        if seen_domains.insert(host_key(pattern, registry)) {
            hosts.push(display_host(pattern).into_owned());
        }
    }
    hosts
}

/// Registered-domain keys of `patterns`, for set comparisons.
pub fn distinct_host_keys(
    patterns: &[UrlPattern],
    registry: &dyn DomainRegistry,
) -> BTreeSet<String> {
    patterns
        .iter()
        .map(|pattern| host_key(pattern, registry))
        .collect()
}

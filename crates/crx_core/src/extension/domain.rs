//! Registered-domain lookup used to collapse hosts.
//!
//! # Responsibility
//! - Define the `DomainRegistry` seam for public-suffix style lookups.
//! - Ship a small static suffix list good enough for host summaries.
//!
//! # Invariants
//! - `registered_domain_length` returns 0 when the host has no registered
//!   domain (IP literals, single labels, bare public suffixes).
//! - A non-zero length always lands on a label boundary.

use std::collections::BTreeSet;
use std::net::IpAddr;

use once_cell::sync::Lazy;

/// Public-suffix oracle.
pub trait DomainRegistry {
    /// Length in bytes of the registered domain (public suffix plus one
    /// label) at the end of `host`, or 0 if there is none.
    fn registered_domain_length(&self, host: &str) -> usize;
}

/// Multi-label public suffixes known to the built-in list. Any other host
/// is treated as having a single-label suffix.
const DEFAULT_MULTI_LABEL_SUFFIXES: &[&str] = &[
    "ac.uk",
    "appspot.com",
    "blogspot.com",
    "co.in",
    "co.jp",
    "co.kr",
    "co.nz",
    "co.uk",
    "co.za",
    "com.au",
    "com.br",
    "com.cn",
    "com.mx",
    "com.tw",
    "github.io",
    "gov.uk",
    "ne.jp",
    "net.au",
    "or.jp",
    "org.au",
    "org.uk",
];

static STANDARD_SUFFIXES: Lazy<StaticSuffixList> = Lazy::new(StaticSuffixList::default);

/// Suffix list backed by a fixed set of multi-label suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSuffixList {
    multi_label_suffixes: BTreeSet<String>,
}

impl Default for StaticSuffixList {
    fn default() -> Self {
        Self::new(DEFAULT_MULTI_LABEL_SUFFIXES.iter().copied())
    }
}

impl StaticSuffixList {
    /// Shared instance of the built-in list.
    pub fn standard() -> &'static StaticSuffixList {
        &STANDARD_SUFFIXES
    }

    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            multi_label_suffixes: suffixes
                .into_iter()
                .map(|suffix| suffix.as_ref().trim_matches('.').to_ascii_lowercase())
                .filter(|suffix| !suffix.is_empty())
                .collect(),
        }
    }

    fn suffix_label_count(&self, labels: &[&str]) -> usize {
        // Longest known suffix wins.
        for start in 0..labels.len() {
            let candidate = labels[start..].join(".");
            if self.multi_label_suffixes.contains(&candidate) {
                return labels.len() - start;
            }
        }
        1
    }
}

impl DomainRegistry for StaticSuffixList {
    fn registered_domain_length(&self, host: &str) -> usize {
        let host = host.trim_end_matches('.');
        if host.is_empty() || is_ip_literal(host) {
            return 0;
        }
        let lowered = host.to_ascii_lowercase();
        let labels: Vec<&str> = lowered.split('.').collect();
        if labels.iter().any(|label| label.is_empty()) {
            return 0;
        }
        let suffix_labels = self.suffix_label_count(&labels);
        if labels.len() <= suffix_labels {
            return 0;
        }
        let kept = &labels[labels.len() - suffix_labels - 1..];
        kept.iter().map(|label| label.len()).sum::<usize>() + kept.len() - 1
    }
}

fn is_ip_literal(host: &str) -> bool {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<IpAddr>().is_ok()
}

/// Key under which `host` is collapsed: its registered domain, or the host
/// itself when it has none.
pub fn registered_domain_key(host: &str, registry: &dyn DomainRegistry) -> String {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let length = registry.registered_domain_length(&host);
    if length == 0 || length > host.len() {
        return host;
    }
    host[host.len() - length..].to_string()
}

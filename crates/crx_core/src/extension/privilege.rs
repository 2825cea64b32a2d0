//! Privilege-increase detection between two versions of an extension.
//!
//! # Responsibility
//! - Decide whether an update asks for more than the installed version had.
//! - Report which rule decided it.
//!
//! # Invariants
//! - Only increases are reported. Dropping hosts or permissions never is.
//! - An installed version with plugins already has full access, so nothing
//!   the update does counts as an increase.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use log::info;

use super::descriptor::Extension;
use super::domain::{DomainRegistry, StaticSuffixList};
use super::messages::MessageId;

/// First rule that found an increase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegeIncrease {
    NewPlugins,
    NewAllHosts,
    /// Registered domains the update reaches that the installed version did
    /// not.
    NewHosts(BTreeSet<String>),
    NewWarnings(BTreeSet<MessageId>),
}

impl PrivilegeIncrease {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NewPlugins => "new_plugins",
            Self::NewAllHosts => "new_all_hosts",
            Self::NewHosts(_) => "new_hosts",
            Self::NewWarnings(_) => "new_warnings",
        }
    }
}

impl Display for PrivilegeIncrease {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewPlugins => write!(f, "update adds plugins"),
            Self::NewAllHosts => write!(f, "update adds access to all hosts"),
            Self::NewHosts(hosts) => {
                let hosts: Vec<&str> = hosts.iter().map(String::as_str).collect();
                write!(f, "update adds hosts: {}", hosts.join(", "))
            }
            Self::NewWarnings(ids) => {
                let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
                write!(f, "update adds permissions: {}", ids.join(", "))
            }
        }
    }
}

/// True when `new` requests privileges `old` did not have.
pub fn is_privilege_increase(old: &Extension, new: &Extension) -> bool {
    privilege_increase_reason(old, new).is_some()
}

pub fn is_privilege_increase_with(
    old: &Extension,
    new: &Extension,
    registry: &dyn DomainRegistry,
) -> bool {
    privilege_increase_reason_with(old, new, registry).is_some()
}

/// Like [`is_privilege_increase`], returning the deciding rule.
pub fn privilege_increase_reason(old: &Extension, new: &Extension) -> Option<PrivilegeIncrease> {
    privilege_increase_reason_with(old, new, StaticSuffixList::standard())
}

/// # Side effects
/// - Emits a `privilege_check` logging event.
pub fn privilege_increase_reason_with(
    old: &Extension,
    new: &Extension,
    registry: &dyn DomainRegistry,
) -> Option<PrivilegeIncrease> {
    let (rule, reason) = evaluate(old, new, registry);
    info!(
        "event=privilege_check module=privilege status=ok extension_id={} rule={} increase={}",
        new.id(),
        rule,
        reason.is_some()
    );
    reason
}

fn evaluate(
    old: &Extension,
    new: &Extension,
    registry: &dyn DomainRegistry,
) -> (&'static str, Option<PrivilegeIncrease>) {
    if !old.plugins().is_empty() {
        return ("old_has_plugins", None);
    }
    if !new.plugins().is_empty() {
        return ("new_plugins", Some(PrivilegeIncrease::NewPlugins));
    }

    if !old.has_effective_access_to_all_hosts() {
        if new.has_effective_access_to_all_hosts() {
            return ("new_all_hosts", Some(PrivilegeIncrease::NewAllHosts));
        }
        let old_hosts = old.distinct_host_keys_with(registry);
        let added: BTreeSet<String> = new
            .distinct_host_keys_with(registry)
            .difference(&old_hosts)
            .cloned()
            .collect();
        if !added.is_empty() {
            return ("new_hosts", Some(PrivilegeIncrease::NewHosts(added)));
        }
    }

    let old_warnings = old.simple_permission_messages();
    let added: BTreeSet<MessageId> = new
        .simple_permission_messages()
        .difference(&old_warnings)
        .copied()
        .collect();
    if !added.is_empty() {
        return ("new_warnings", Some(PrivilegeIncrease::NewWarnings(added)));
    }
    ("no_increase", None)
}

#[cfg(test)]
mod tests {
    use super::{privilege_increase_reason, PrivilegeIncrease};
    use crate::config::LoaderConfig;
    use crate::extension::descriptor::Extension;
    use crate::extension::loader::{load_extension, LoadRequest};
    use crate::extension::location::Location;
    use crate::extension::messages::MessageId;
    use serde_json::{json, Value};

    fn load(manifest: Value) -> Extension {
        load_extension(
            &manifest,
            &LoadRequest::new("/ext/privilege", Location::Internal),
            &LoaderConfig::default(),
        )
        .expect("manifest loads")
    }

    #[test]
    fn reason_names_the_added_domains() {
        let old = load(json!({"name": "A", "version": "1", "permissions": ["http://a.example.com/*"]}));
        let new = load(json!({
            "name": "A", "version": "2",
            "permissions": ["http://b.example.com/*", "http://news.bbc.co.uk/*"]
        }));
        assert_eq!(
            privilege_increase_reason(&old, &new),
            Some(PrivilegeIncrease::NewHosts(
                ["bbc.co.uk".to_string()].into_iter().collect()
            ))
        );
    }

    #[test]
    fn reason_names_the_added_warnings() {
        let old = load(json!({"name": "A", "version": "1", "permissions": ["tabs"]}));
        let new = load(json!({"name": "A", "version": "2", "permissions": ["tabs", "history", "bookmarks"]}));
        let reason = privilege_increase_reason(&old, &new).expect("increase");
        assert_eq!(
            reason,
            PrivilegeIncrease::NewWarnings([MessageId::WarningBookmarks].into_iter().collect())
        );
        assert_eq!(reason.code(), "new_warnings");
    }

    #[test]
    fn identical_versions_are_not_an_increase() {
        let manifest = json!({"name": "A", "version": "1", "permissions": ["tabs", "http://a.com/*"]});
        assert_eq!(privilege_increase_reason(&load(manifest.clone()), &load(manifest)), None);
    }
}

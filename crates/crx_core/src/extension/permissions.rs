//! API permission registry.
//!
//! # Responsibility
//! - Hold the table of known API permissions and their install warnings.
//! - Classify permission names (API, hosted-app eligible, alias).
//! - Answer whether a permission set allows an API function or event.
//!
//! # Invariants
//! - The registry is immutable once built; lookups are pure.
//! - `experimental` is only an API permission when experimental APIs are
//!   enabled or the extension is a component.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;

use super::location::Location;
use super::messages::MessageId;
use super::url_pattern::{SchemeSet, UrlPattern};

pub const BACKGROUND_PERMISSION: &str = "background";
pub const BOOKMARK_PERMISSION: &str = "bookmarks";
pub const CONTEXT_MENUS_PERMISSION: &str = "contextMenus";
pub const COOKIE_PERMISSION: &str = "cookies";
pub const EXPERIMENTAL_PERMISSION: &str = "experimental";
pub const GEOLOCATION_PERMISSION: &str = "geolocation";
pub const HISTORY_PERMISSION: &str = "history";
pub const IDLE_PERMISSION: &str = "idle";
pub const NOTIFICATION_PERMISSION: &str = "notifications";
pub const PROXY_PERMISSION: &str = "proxy";
pub const TAB_PERMISSION: &str = "tabs";
pub const UNLIMITED_STORAGE_PERMISSION: &str = "unlimitedStorage";
pub const WEBSTORE_PRIVATE_PERMISSION: &str = "webstorePrivate";

/// Legacy spelling of `unlimitedStorage`; accepted in manifests only.
pub const OLD_UNLIMITED_STORAGE_PERMISSION: &str = "unlimited_storage";

/// Alias of `tabs` for API checks; not accepted in manifests.
const WINDOW_PERMISSION: &str = "windows";

const HOSTED_APP_PERMISSIONS: &[&str] = &[
    BACKGROUND_PERMISSION,
    GEOLOCATION_PERMISSION,
    NOTIFICATION_PERMISSION,
    UNLIMITED_STORAGE_PERMISSION,
    WEBSTORE_PRIVATE_PERMISSION,
];

/// Permissions that effectively grant access to every site.
const ALL_HOSTS_PERMISSIONS: &[&str] = &[PROXY_PERMISSION];

const NON_PERMISSION_MODULE_NAMES: &[&str] = &[
    "browserAction",
    "browserActions",
    "devtools",
    "extension",
    "i18n",
    "pageAction",
    "pageActions",
    "test",
];

const NON_PERMISSION_FUNCTION_NAMES: &[&str] = &["tabs.create", "tabs.update"];

/// One row of the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionEntry {
    pub name: &'static str,
    /// Install warning, `None` when the permission shows nothing to users.
    pub message: Option<MessageId>,
}

const STANDARD_PERMISSIONS: &[PermissionEntry] = &[
    PermissionEntry {
        name: BACKGROUND_PERMISSION,
        message: None,
    },
    PermissionEntry {
        name: BOOKMARK_PERMISSION,
        message: Some(MessageId::WarningBookmarks),
    },
    PermissionEntry {
        name: CONTEXT_MENUS_PERMISSION,
        message: None,
    },
    PermissionEntry {
        name: COOKIE_PERMISSION,
        message: None,
    },
    PermissionEntry {
        name: EXPERIMENTAL_PERMISSION,
        message: None,
    },
    PermissionEntry {
        name: GEOLOCATION_PERMISSION,
        message: Some(MessageId::WarningGeolocation),
    },
    PermissionEntry {
        name: IDLE_PERMISSION,
        message: None,
    },
    PermissionEntry {
        name: HISTORY_PERMISSION,
        message: Some(MessageId::WarningBrowsingHistory),
    },
    PermissionEntry {
        name: NOTIFICATION_PERMISSION,
        message: None,
    },
    PermissionEntry {
        name: PROXY_PERMISSION,
        message: None,
    },
    PermissionEntry {
        name: TAB_PERMISSION,
        message: Some(MessageId::WarningBrowsingHistory),
    },
    PermissionEntry {
        name: UNLIMITED_STORAGE_PERMISSION,
        message: None,
    },
    PermissionEntry {
        name: WEBSTORE_PRIVATE_PERMISSION,
        message: None,
    },
];

static STANDARD_REGISTRY: Lazy<PermissionRegistry> =
    Lazy::new(|| PermissionRegistry::from_entries(STANDARD_PERMISSIONS));

/// Name-indexed permission table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRegistry {
    entries: BTreeMap<&'static str, PermissionEntry>,
}

impl PermissionRegistry {
    /// Shared registry with the built-in permission table.
    pub fn standard() -> &'static PermissionRegistry {
        &STANDARD_REGISTRY
    }

    pub fn from_entries(entries: &[PermissionEntry]) -> Self {
        Self {
            entries: entries.iter().map(|entry| (entry.name, *entry)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PermissionEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Install warning for `name`, if it has one.
    pub fn message_id(&self, name: &str) -> Option<MessageId> {
        self.get(name).and_then(|entry| entry.message)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Returns true when `name` is an API permission the extension may hold.
    pub fn is_api_permission(
        &self,
        name: &str,
        experimental_enabled: bool,
        location: Location,
    ) -> bool {
        if !self.contains(name) {
            return false;
        }
        if name == EXPERIMENTAL_PERMISSION {
            return experimental_enabled || location == Location::Component;
        }
        true
    }

    /// Distinct install warnings for a set of API permissions.
    pub fn warning_messages<'a>(
        &self,
        api_permissions: impl IntoIterator<Item = &'a String>,
    ) -> BTreeSet<MessageId> {
        api_permissions
            .into_iter()
            .filter_map(|name| self.message_id(name))
            .collect()
    }
}

/// Returns true when a hosted app may request `name`.
pub fn is_hosted_app_permission(name: &str) -> bool {
    HOSTED_APP_PERMISSIONS.contains(&name)
}

/// Maps legacy manifest spellings onto their canonical name.
pub fn canonical_permission_name(name: &str) -> &str {
    if name == OLD_UNLIMITED_STORAGE_PERMISSION {
        UNLIMITED_STORAGE_PERMISSION
    } else {
        name
    }
}

/// Returns true when the granted set implies access to every host.
pub fn grants_all_hosts(api_permissions: &BTreeSet<String>) -> bool {
    ALL_HOSTS_PERMISSIONS
        .iter()
        .any(|name| has_api_permission(api_permissions, name))
}

/// Schemes a host permission may name.
pub fn host_permission_schemes() -> SchemeSet {
    SchemeSet::HTTP | SchemeSet::HTTPS | SchemeSet::CHROME_UI
}

/// Host allowed under `chrome://` for non-component extensions.
pub const CHROME_UI_FAVICON_HOST: &str = "favicon";

/// Returns true when an extension at `location` may hold `pattern` as a
/// host permission. Only component extensions reach `chrome://` pages other
/// than favicons.
pub fn can_access_pattern(pattern: &UrlPattern, location: Location) -> bool {
    if pattern.matches_scheme("chrome") {
        return pattern.host() == CHROME_UI_FAVICON_HOST || location == Location::Component;
    }
    true
}

/// Checks a permission or API reference against a granted set.
///
/// `function_name` may be a bare permission (`tabs`), a function
/// (`tabs.getSelected`) or an event (`tabs/onUpdated`).
pub fn has_api_permission(api_permissions: &BTreeSet<String>, function_name: &str) -> bool {
    if NON_PERMISSION_FUNCTION_NAMES.contains(&function_name) {
        return true;
    }

    let module = function_name
        .split(['.', '/'])
        .next()
        .unwrap_or(function_name);
    let module = if module == WINDOW_PERMISSION {
        TAB_PERMISSION
    } else {
        module
    };

    api_permissions.contains(module) || NON_PERMISSION_MODULE_NAMES.contains(&module)
}

//! Install-time permission warnings.
//!
//! # Responsibility
//! - Name every warning an extension can produce with a stable `MessageId`.
//! - Build the host-access summary from a list of distinct hosts.
//! - Render messages through a pluggable `MessageCatalog`.
//!
//! # Invariants
//! - Message ids never carry user data; host names travel as parameters.
//! - A catalog that yields no text for an id suppresses that warning.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Stable identifier of a warning string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageId {
    WarningFullAccess,
    WarningAllHosts,
    WarningOneHost,
    WarningTwoHosts,
    WarningThreeHosts,
    WarningFourOrMoreHosts,
    WarningBookmarks,
    WarningGeolocation,
    WarningBrowsingHistory,
}

impl MessageId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WarningFullAccess => "warning_full_access",
            Self::WarningAllHosts => "warning_all_hosts",
            Self::WarningOneHost => "warning_one_host",
            Self::WarningTwoHosts => "warning_two_hosts",
            Self::WarningThreeHosts => "warning_three_hosts",
            Self::WarningFourOrMoreHosts => "warning_four_or_more_hosts",
            Self::WarningBookmarks => "warning_bookmarks",
            Self::WarningGeolocation => "warning_geolocation",
            Self::WarningBrowsingHistory => "warning_browsing_history",
        }
    }
}

/// Source of display strings for message ids.
///
/// Templates use `$1`, `$2`, `$3` placeholders for parameters.
pub trait MessageCatalog {
    fn lookup(&self, id: MessageId) -> Option<String>;
}

/// Built-in English strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn lookup(&self, id: MessageId) -> Option<String> {
        let text = match id {
            MessageId::WarningFullAccess => "All data on your computer and the websites you visit",
            MessageId::WarningAllHosts => "Your data on all websites",
            MessageId::WarningOneHost => "Your data on $1",
            MessageId::WarningTwoHosts => "Your data on $1 and $2",
            MessageId::WarningThreeHosts => "Your data on $1, $2, and $3",
            MessageId::WarningFourOrMoreHosts => "Your data on $1, $2, and $3 other websites",
            MessageId::WarningBookmarks => "Your bookmarks",
            MessageId::WarningGeolocation => "Your physical location",
            MessageId::WarningBrowsingHistory => "Your browsing history",
        };
        Some(text.to_string())
    }
}

/// One warning shown before install or re-enable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionMessage {
    pub id: MessageId,
    /// Positional parameters substituted into `$1..$n`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

impl PermissionMessage {
    pub fn new(id: MessageId) -> Self {
        Self {
            id,
            params: Vec::new(),
        }
    }

    pub fn with_params(id: MessageId, params: Vec<String>) -> Self {
        Self { id, params }
    }

    /// Renders the message, or `None` when the catalog has no text for it.
    pub fn render(&self, catalog: &dyn MessageCatalog) -> Option<String> {
        let template = catalog.lookup(self.id)?;
        if template.is_empty() {
            return None;
        }
        // Replace higher placeholders first so `$1` never eats `$10`.
        let mut text = template;
        for (index, param) in self.params.iter().enumerate().rev() {
            text = text.replace(&format!("${}", index + 1), param);
        }
        Some(text)
    }
}

impl Display for PermissionMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.render(&EnglishCatalog) {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "{}", self.id.as_str()),
        }
    }
}

/// Summarizes host access, or `None` when the extension touches no host.
///
/// With four or more hosts, the first two are named and the third
/// parameter is the count of the rest.
pub fn host_access_message(all_hosts: bool, hosts: &[String]) -> Option<PermissionMessage> {
    if all_hosts {
        return Some(PermissionMessage::new(MessageId::WarningAllHosts));
    }
    let message = match hosts {
        [] => return None,
        [one] => PermissionMessage::with_params(MessageId::WarningOneHost, vec![one.clone()]),
        [first, second] => PermissionMessage::with_params(
            MessageId::WarningTwoHosts,
            vec![first.clone(), second.clone()],
        ),
        [first, second, third] => PermissionMessage::with_params(
            MessageId::WarningThreeHosts,
            vec![first.clone(), second.clone(), third.clone()],
        ),
        [first, second, rest @ ..] => PermissionMessage::with_params(
            MessageId::WarningFourOrMoreHosts,
            vec![first.clone(), second.clone(), rest.len().to_string()],
        ),
    };
    Some(message)
}

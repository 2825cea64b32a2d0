//! Extension manifest loading and permission model.
//! This crate is the single source of truth for manifest validation rules.

pub mod config;
pub mod error;
pub mod extension;
pub mod logging;

pub use config::{ConfigError, LoaderConfig};
pub use error::{ErrorCategory, ManifestError, PatternRejection};
pub use extension::descriptor::{
    Extension, IncognitoMode, PluginInfo, UninstalledExtensionInfo,
};
pub use extension::domain::{DomainRegistry, StaticSuffixList};
pub use extension::id::{generate_id, id_is_valid, ExtensionId};
pub use extension::loader::{load_extension, LoadRequest, ManifestLoader};
pub use extension::location::Location;
pub use extension::messages::{EnglishCatalog, MessageCatalog, MessageId, PermissionMessage};
pub use extension::permissions::PermissionRegistry;
pub use extension::privilege::{
    is_privilege_increase, is_privilege_increase_with, privilege_increase_reason,
    PrivilegeIncrease,
};
pub use extension::url_pattern::{SchemeSet, UrlPattern, UrlPatternError, UrlPatternSet};
pub use extension::version::{Version, VersionError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

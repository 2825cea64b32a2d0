//! Loader configuration.
//!
//! # Responsibility
//! - Carry the host-wide switches that change how manifests are validated.
//! - Parse those switches from JSON for tools and tests.
//!
//! # Invariants
//! - The loader never reads process-global state; everything it needs to
//!   know about the host arrives through `LoaderConfig`.
//! - Missing JSON fields take the documented defaults.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::extension::version::{Version, VersionError};

/// Default gallery prefix used by `chrome_store_url`.
pub const GALLERY_BROWSE_PREFIX: &str = "https://chrome.google.com/extensions";

/// Host switches consulted while loading a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Allow manifests with an `app` key.
    pub apps_enabled: bool,
    /// Accept the `experimental` permission and parse toolstrips.
    pub experimental_apis_enabled: bool,
    /// `false` rejects any non-empty `plugins` list.
    pub plugins_allowed: bool,
    /// Overrides the gallery location (web store app and store URLs).
    pub apps_gallery_url: Option<String>,
    /// Host version compared against `minimum_chrome_version`. When unset,
    /// the key is only checked for syntax.
    pub product_version: Option<String>,
    /// Enables the `keyboard` URL override target.
    pub touch_ui: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            apps_enabled: true,
            experimental_apis_enabled: false,
            plugins_allowed: true,
            apps_gallery_url: None,
            product_version: None,
            touch_ui: false,
        }
    }
}

impl LoaderConfig {
    /// Parses a JSON object, filling omitted fields with defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.product_version()?;
        Ok(())
    }

    /// Parsed `product_version`, if configured.
    pub fn product_version(&self) -> Result<Option<Version>, ConfigError> {
        self.product_version
            .as_deref()
            .map(Version::parse)
            .transpose()
            .map_err(ConfigError::ProductVersion)
    }

    /// Gallery prefix without a trailing slash.
    pub fn chrome_store_url(&self) -> String {
        let prefix = self
            .apps_gallery_url
            .as_deref()
            .unwrap_or(GALLERY_BROWSE_PREFIX);
        prefix.strip_suffix('/').unwrap_or(prefix).to_string()
    }
}

/// Configuration parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    ProductVersion(VersionError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid loader config: {message}"),
            Self::ProductVersion(err) => write!(f, "invalid product_version: {err}"),
        }
    }
}

impl Error for ConfigError {}

//! App manifest settings.
//!
//! # Responsibility
//! - Parse the `app` block: web extent, launch URL and launch container.
//! - Reject hosted apps that also declare extension features.
//!
//! # Invariants
//! - Extent patterns are http/https only, never `<all_urls>`, and always end
//!   in an implied `*`.
//! - At most one of `launch.local_path` / `launch.web_url` is set; apps
//!   must set one.
//! - A launch web URL without an extent yields a one-pattern extent over
//!   the launch host.
//!
//! # See also
//! - loader.rs for the step order these functions run in.

use serde_json::{Map, Value};
use url::Url;

use crate::config::LoaderConfig;
use crate::error::{ManifestError, PatternRejection};

use super::manifest_keys as keys;
use super::resource::ResourceResolver;
use super::url_pattern::{SchemeSet, UrlPattern, UrlPatternSet};

/// Id of the web store app, the only app the gallery override applies to.
pub const WEB_STORE_APP_ID: &str = "ahfgeienlihckogmohjhadlkjgocpleb";

/// Schemes allowed in `app.urls` and the implied extent.
pub fn web_extent_schemes() -> SchemeSet {
    SchemeSet::HTTP | SchemeSet::HTTPS
}

/// Where an app opens when launched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LaunchContainer {
    Panel,
    #[default]
    Tab,
}

impl LaunchContainer {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            keys::LAUNCH_CONTAINER_PANEL => Some(Self::Panel),
            keys::LAUNCH_CONTAINER_TAB => Some(Self::Tab),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Panel => keys::LAUNCH_CONTAINER_PANEL,
            Self::Tab => keys::LAUNCH_CONTAINER_TAB,
        }
    }

    fn accepts_dimensions(self) -> bool {
        matches!(self, Self::Panel)
    }
}

/// Parsed `app` settings. Also meaningful for non-apps, where everything
/// stays at its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    pub web_extent: UrlPatternSet,
    pub launch_local_path: Option<String>,
    pub launch_web_url: Option<String>,
    pub launch_container: LaunchContainer,
    pub launch_width: u32,
    pub launch_height: u32,
}

/// Returns whether the manifest declares an app, failing if apps are off.
pub(crate) fn load_is_app(
    manifest: &Map<String, Value>,
    config: &LoaderConfig,
) -> Result<bool, ManifestError> {
    if !manifest.contains_key(keys::APP) {
        return Ok(false);
    }
    if !config.apps_enabled {
        return Err(ManifestError::AppsNotEnabled);
    }
    Ok(true)
}

/// Runs the app steps in order: extent, hybrid check, launch URL, container.
pub(crate) fn load_app_settings(
    manifest: &Map<String, Value>,
    is_app: bool,
    resolver: &ResourceResolver,
    config: &LoaderConfig,
) -> Result<AppSettings, ManifestError> {
    let mut settings = AppSettings {
        web_extent: load_extent(manifest)?,
        ..AppSettings::default()
    };
    ensure_not_hybrid_app(manifest, &settings.web_extent)?;
    load_launch_url(manifest, is_app, resolver, config, &mut settings)?;
    load_launch_container(manifest, &mut settings)?;
    Ok(settings)
}

fn load_extent(manifest: &Map<String, Value>) -> Result<UrlPatternSet, ManifestError> {
    let mut extent = UrlPatternSet::new();
    let Some(value) = keys::lookup(manifest, keys::WEB_URLS) else {
        return Ok(extent);
    };
    let list = value.as_array().ok_or(ManifestError::InvalidWebUrls)?;

    for (index, item) in list.iter().enumerate() {
        let reject = |reason| ManifestError::InvalidWebUrl { index, reason };
        let text = item.as_str().ok_or_else(|| reject(PatternRejection::NotAString))?;
        let mut pattern = UrlPattern::parse(web_extent_schemes(), text)
            .map_err(|err| reject(PatternRejection::Malformed(err)))?;
        if pattern.match_all_urls() {
            return Err(reject(PatternRejection::AllUrlsNotAllowed));
        }
        if pattern.path().contains('*') {
            return Err(reject(PatternRejection::WildcardPath));
        }
        let implied = format!("{}*", pattern.path());
        pattern
            .set_path(&implied)
            .map_err(|err| reject(PatternRejection::Malformed(err)))?;
        extent.add_pattern(pattern);
    }
    Ok(extent)
}

fn ensure_not_hybrid_app(
    manifest: &Map<String, Value>,
    extent: &UrlPatternSet,
) -> Result<(), ManifestError> {
    if extent.is_empty() {
        return Ok(());
    }
    let hybrid = manifest.keys().any(|key| {
        !keys::is_base_crx_key(key) && !keys::HOSTED_APP_EXTRA_KEYS.contains(&key.as_str())
    });
    if hybrid {
        return Err(ManifestError::HostedAppsCannotIncludeExtensionFeatures);
    }
    Ok(())
}

fn load_launch_url(
    manifest: &Map<String, Value>,
    is_app: bool,
    resolver: &ResourceResolver,
    config: &LoaderConfig,
    settings: &mut AppSettings,
) -> Result<(), ManifestError> {
    let local_path = keys::lookup(manifest, keys::LAUNCH_LOCAL_PATH);
    let web_url = keys::lookup(manifest, keys::LAUNCH_WEB_URL);

    match (local_path, web_url) {
        (Some(_), Some(_)) => return Err(ManifestError::LaunchPathAndUrlAreExclusive),
        (Some(local_path), None) => {
            let path = local_path
                .as_str()
                .ok_or(ManifestError::InvalidLaunchLocalPath)?;
            let resolved = resolver
                .base_url()
                .join(path)
                .map_err(|_| ManifestError::InvalidLaunchLocalPath)?;
            if !resolver.is_same_origin(&resolved) {
                return Err(ManifestError::InvalidLaunchLocalPath);
            }
            settings.launch_local_path = Some(path.to_string());
        }
        (None, Some(web_url)) => {
            let text = web_url.as_str().ok_or(ManifestError::InvalidLaunchWebUrl)?;
            Url::parse(text).map_err(|_| ManifestError::InvalidLaunchWebUrl)?;
            settings.launch_web_url = Some(text.to_string());
        }
        (None, None) if is_app => return Err(ManifestError::LaunchUrlRequired),
        (None, None) => {}
    }

    if settings.web_extent.is_empty() {
        if let Some(launch_url) = settings.launch_web_url.as_deref() {
            let host = Url::parse(launch_url)
                .map_err(|_| ManifestError::InvalidLaunchWebUrl)?
                .host_str()
                .unwrap_or_default()
                .to_string();
            let pattern = UrlPattern::for_host(web_extent_schemes(), &host)
                .map_err(|_| ManifestError::InvalidLaunchWebUrl)?;
            settings.web_extent.add_pattern(pattern);
        }
    }

    if resolver.extension_id() == WEB_STORE_APP_ID {
        apply_gallery_override(config, settings);
    }
    Ok(())
}

/// Points the web store app at a configured gallery URL.
fn apply_gallery_override(config: &LoaderConfig, settings: &mut AppSettings) {
    let Some(gallery) = config
        .apps_gallery_url
        .as_deref()
        .and_then(|text| Url::parse(text).ok())
    else {
        return;
    };
    settings.launch_web_url = Some(gallery.as_str().to_string());
    if let Ok(mut pattern) = UrlPattern::parse(web_extent_schemes(), gallery.as_str()) {
        let path = format!("{}*", pattern.path());
        if pattern.set_path(&path).is_ok() {
            settings.web_extent.add_pattern(pattern);
        }
    }
}

fn load_launch_container(
    manifest: &Map<String, Value>,
    settings: &mut AppSettings,
) -> Result<(), ManifestError> {
    let Some(value) = keys::lookup(manifest, keys::LAUNCH_CONTAINER) else {
        return Ok(());
    };
    settings.launch_container = value
        .as_str()
        .and_then(LaunchContainer::parse)
        .ok_or(ManifestError::InvalidLaunchContainer)?;

    if let Some(width) = keys::lookup(manifest, keys::LAUNCH_WIDTH) {
        if !settings.launch_container.accepts_dimensions() {
            return Err(ManifestError::InvalidLaunchWidthContainer);
        }
        settings.launch_width = dimension(width).ok_or(ManifestError::InvalidLaunchWidth)?;
    }

    if let Some(height) = keys::lookup(manifest, keys::LAUNCH_HEIGHT) {
        if !settings.launch_container.accepts_dimensions() {
            return Err(ManifestError::InvalidLaunchHeightContainer);
        }
        settings.launch_height = dimension(height).ok_or(ManifestError::InvalidLaunchHeight)?;
    }
    Ok(())
}

fn dimension(value: &Value) -> Option<u32> {
    let raw = value.as_i64()?;
    if raw < 0 || raw > i64::from(i32::MAX) {
        return None;
    }
    u32::try_from(raw).ok()
}

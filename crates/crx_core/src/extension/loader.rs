//! Manifest loader.
//!
//! # Responsibility
//! - Turn a manifest value tree into a sealed `Extension`.
//! - Validate every recognised key in a fixed order and stop at the first
//!   failure.
//!
//! # Invariants
//! - Steps run in order; later steps may read what earlier steps stored on
//!   the draft (identity before any resource URL, permissions before the
//!   experimental gates).
//! - A failed load returns only the error. The draft is dropped.
//! - Host configuration comes from `LoaderConfig`; nothing global is read.
//!
//! # See also
//! - descriptor.rs for the draft/sealed split.
//! - error.rs for the failure tags.

use std::path::PathBuf;
use std::time::Instant;

use log::{info, warn};
use serde_json::{Map, Value};
use url::Url;

use crate::config::LoaderConfig;
use crate::error::{ManifestError, PatternRejection};

use super::action::load_extension_action;
use super::app::{load_app_settings, load_is_app};
use super::content_script::load_content_script;
use super::descriptor::{DraftExtension, Extension, IncognitoMode, PluginInfo};
use super::icons::ICON_SIZES;
use super::id::{generate_id, parse_pem_key_bytes};
use super::location::Location;
use super::manifest_keys as keys;
use super::permissions::{
    can_access_pattern, canonical_permission_name, host_permission_schemes,
    is_hosted_app_permission, PermissionRegistry, EXPERIMENTAL_PERMISSION,
    WEBSTORE_PRIVATE_PERMISSION,
};
use super::resource::ResourceResolver;
use super::theme::{contains_non_theme_keys, load_theme};
use super::url_pattern::UrlPattern;
use super::version::{Version, MAX_EXTENSION_VERSION_COMPONENTS};

const OVERRIDE_NEW_TAB: &str = "newtab";
const OVERRIDE_BOOKMARKS: &str = "bookmarks";
const OVERRIDE_HISTORY: &str = "history";
const OVERRIDE_KEYBOARD: &str = "keyboard";

/// Where a manifest came from and how strictly its identity is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Extension root directory. Also seeds the id when there is no key.
    pub root: PathBuf,
    pub location: Location,
    /// Fail with `MissingKey` when the manifest has no `key`.
    pub require_key: bool,
}

impl LoadRequest {
    pub fn new(root: impl Into<PathBuf>, location: Location) -> Self {
        Self {
            root: root.into(),
            location,
            require_key: false,
        }
    }

    pub fn with_require_key(mut self, require_key: bool) -> Self {
        self.require_key = require_key;
        self
    }
}

/// Validates manifests against one configuration and permission table.
#[derive(Debug, Clone)]
pub struct ManifestLoader<'r> {
    config: LoaderConfig,
    permissions: &'r PermissionRegistry,
}

impl ManifestLoader<'static> {
    /// Loader backed by the built-in permission table.
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            permissions: PermissionRegistry::standard(),
        }
    }
}

impl<'r> ManifestLoader<'r> {
    pub fn with_registry(config: LoaderConfig, permissions: &'r PermissionRegistry) -> Self {
        Self {
            config,
            permissions,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn permissions(&self) -> &PermissionRegistry {
        self.permissions
    }

    /// Loads and seals one manifest.
    ///
    /// # Side effects
    /// - Emits `manifest_load` logging events with duration and status.
    pub fn load(&self, manifest: &Value, request: &LoadRequest) -> Result<Extension, ManifestError> {
        let started_at = Instant::now();
        info!(
            "event=manifest_load module=loader status=start location={} require_key={}",
            request.location.as_str(),
            request.require_key
        );

        match self.load_draft(manifest, request) {
            Ok(draft) => {
                let extension = draft.seal(self.permissions);
                info!(
                    "event=manifest_load module=loader status=ok extension_id={} duration_ms={}",
                    extension.id(),
                    started_at.elapsed().as_millis()
                );
                Ok(extension)
            }
            Err(err) => {
                warn!(
                    "event=manifest_load module=loader status=error duration_ms={} error_code={} field={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err.field()
                );
                Err(err)
            }
        }
    }

    fn load_draft(
        &self,
        manifest: &Value,
        request: &LoadRequest,
    ) -> Result<DraftExtension, ManifestError> {
        let source = manifest.as_object().ok_or(ManifestError::InvalidManifest)?;

        let (id, public_key) = load_identity(source, request)?;
        let resolver =
            ResourceResolver::new(id, request.root.clone()).ok_or(ManifestError::InvalidKey)?;
        let version = load_version(source)?;
        let name = load_name(source)?;

        let mut draft =
            DraftExtension::new(resolver, request.location, source.clone(), version, name);
        draft.public_key = public_key;

        draft.description = load_description(source)?;
        draft.update_url = load_update_url(source)?;
        self.check_minimum_version(source)?;
        draft.converted_from_user_script = source
            .get(keys::CONVERTED_FROM_USER_SCRIPT)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        load_icons(source, &mut draft)?;

        if let Some(theme) = source.get(keys::THEME) {
            if contains_non_theme_keys(source) {
                return Err(ManifestError::ThemesCannotContainExtensions);
            }
            draft.theme = Some(load_theme(theme)?);
            return Ok(draft);
        }

        self.load_plugins(source, &mut draft)?;
        load_background(source, &mut draft)?;
        self.load_toolstrips(source, &mut draft)?;
        load_content_scripts(source, &mut draft)?;
        load_actions(source, &mut draft)?;

        draft.is_app = load_is_app(source, &self.config)?;
        draft.app = load_app_settings(source, draft.is_app, &draft.resolver, &self.config)?;

        load_options_page(source, &mut draft)?;
        self.load_permissions(source, &mut draft)?;
        load_default_locale(source, &mut draft)?;
        self.load_url_overrides(source, &mut draft)?;
        load_omnibox(source, &mut draft)?;
        load_devtools(source, &mut draft)?;
        load_incognito(source, &mut draft)?;

        Ok(draft)
    }

    fn check_minimum_version(&self, source: &Map<String, Value>) -> Result<(), ManifestError> {
        let Some(value) = source.get(keys::MINIMUM_CHROME_VERSION) else {
            return Ok(());
        };
        let required = value
            .as_str()
            .and_then(|text| Version::parse(text).ok())
            .ok_or(ManifestError::InvalidMinimumChromeVersion)?;
        // An unparsable product version is treated as unknown.
        let current = self.config.product_version().ok().flatten();
        if let Some(current) = current {
            if current < required {
                return Err(ManifestError::ChromeVersionTooLow {
                    required: required.to_string(),
                });
            }
        }
        Ok(())
    }

    fn load_plugins(
        &self,
        source: &Map<String, Value>,
        draft: &mut DraftExtension,
    ) -> Result<(), ManifestError> {
        let Some(value) = source.get(keys::PLUGINS) else {
            return Ok(());
        };
        let list = value.as_array().ok_or(ManifestError::InvalidPlugins)?;
        if !self.config.plugins_allowed && !list.is_empty() {
            return Err(ManifestError::IllegalPlugins);
        }

        for (index, item) in list.iter().enumerate() {
            let plugin = item.as_object().ok_or(ManifestError::InvalidPlugins)?;
            let path = plugin
                .get(keys::PATH)
                .and_then(Value::as_str)
                .ok_or(ManifestError::InvalidPluginsPath(index))?;
            let is_public = match plugin.get(keys::PLUGIN_PUBLIC) {
                None => false,
                Some(flag) => flag
                    .as_bool()
                    .ok_or(ManifestError::InvalidPluginsPublic(index))?,
            };
            draft.plugins.push(PluginInfo {
                path: draft.resolver.root().join(path),
                is_public,
            });
        }
        Ok(())
    }

    fn load_toolstrips(
        &self,
        source: &Map<String, Value>,
        draft: &mut DraftExtension,
    ) -> Result<(), ManifestError> {
        if !self.config.experimental_apis_enabled {
            return Ok(());
        }
        let Some(value) = source.get(keys::TOOLSTRIPS) else {
            return Ok(());
        };
        let list = value.as_array().ok_or(ManifestError::InvalidToolstrips)?;

        for (index, item) in list.iter().enumerate() {
            let path = match item {
                Value::String(path) => Some(path.as_str()),
                Value::Object(toolstrip) => toolstrip.get(keys::PATH).and_then(Value::as_str),
                _ => None,
            };
            let url = path
                .and_then(|path| draft.resolver.resource_url(path))
                .ok_or(ManifestError::InvalidToolstrip(index))?;
            draft.toolstrips.push(url);
        }
        Ok(())
    }

    fn load_permissions(
        &self,
        source: &Map<String, Value>,
        draft: &mut DraftExtension,
    ) -> Result<(), ManifestError> {
        let Some(value) = source.get(keys::PERMISSIONS) else {
            return Ok(());
        };
        let list = value.as_array().ok_or(ManifestError::InvalidPermissions)?;
        let location = draft.location;
        let experimental_enabled = self.config.experimental_apis_enabled;

        for (index, item) in list.iter().enumerate() {
            let raw = item.as_str().ok_or(ManifestError::InvalidPermission {
                index,
                reason: PatternRejection::NotAString,
            })?;

            if raw == WEBSTORE_PRIVATE_PERMISSION && location != Location::Component {
                continue;
            }
            let name = canonical_permission_name(raw);

            let is_api = if draft.app.web_extent.is_empty() || location == Location::Component {
                self.permissions
                    .is_api_permission(name, experimental_enabled, location)
            } else {
                is_hosted_app_permission(name)
            };
            if is_api {
                draft.api_permissions.insert(name.to_string());
                continue;
            }

            let mut pattern = UrlPattern::parse(host_permission_schemes(), name).map_err(|err| {
                ManifestError::InvalidPermission {
                    index,
                    reason: PatternRejection::Malformed(err),
                }
            })?;
            if !can_access_pattern(&pattern, location) {
                return Err(ManifestError::InvalidPermissionScheme(index));
            }
            // Only the host is meaningful for a grant.
            pattern
                .set_path("/*")
                .map_err(|err| ManifestError::InvalidPermission {
                    index,
                    reason: PatternRejection::Malformed(err),
                })?;
            draft.host_permissions.push(pattern);
        }
        Ok(())
    }

    fn load_url_overrides(
        &self,
        source: &Map<String, Value>,
        draft: &mut DraftExtension,
    ) -> Result<(), ManifestError> {
        let Some(value) = source.get(keys::CHROME_URL_OVERRIDES) else {
            return Ok(());
        };
        let overrides = value
            .as_object()
            .ok_or(ManifestError::InvalidChromeUrlOverrides)?;

        for (page, target) in overrides {
            if !self.is_override_target(page) {
                return Err(ManifestError::InvalidChromeUrlOverrides);
            }
            let url = target
                .as_str()
                .and_then(|path| draft.resolver.resource_url(path))
                .ok_or(ManifestError::InvalidChromeUrlOverrides)?;
            draft.chrome_url_overrides.insert(page.clone(), url);
        }

        if overrides.len() > 1 {
            return Err(ManifestError::MultipleOverrides);
        }
        Ok(())
    }

    fn is_override_target(&self, page: &str) -> bool {
        matches!(page, OVERRIDE_NEW_TAB | OVERRIDE_BOOKMARKS | OVERRIDE_HISTORY)
            || (self.config.touch_ui && page == OVERRIDE_KEYBOARD)
    }
}

/// Convenience wrapper over `ManifestLoader::new(config).load(...)`.
pub fn load_extension(
    manifest: &Value,
    request: &LoadRequest,
    config: &LoaderConfig,
) -> Result<Extension, ManifestError> {
    ManifestLoader::new(config.clone()).load(manifest, request)
}

fn load_identity(
    source: &Map<String, Value>,
    request: &LoadRequest,
) -> Result<(String, Option<String>), ManifestError> {
    match source.get(keys::PUBLIC_KEY) {
        Some(value) => {
            let key = value.as_str().ok_or(ManifestError::InvalidKey)?;
            let bytes = parse_pem_key_bytes(key).map_err(|_| ManifestError::InvalidKey)?;
            if bytes.is_empty() {
                return Err(ManifestError::InvalidKey);
            }
            Ok((generate_id(&bytes), Some(key.to_string())))
        }
        None if request.require_key => Err(ManifestError::MissingKey),
        None => {
            let seed = request.root.to_string_lossy();
            Ok((generate_id(seed.as_bytes()), None))
        }
    }
}

fn load_version(source: &Map<String, Value>) -> Result<Version, ManifestError> {
    let version = source
        .get(keys::VERSION)
        .and_then(Value::as_str)
        .and_then(|text| Version::parse(text).ok())
        .ok_or(ManifestError::InvalidVersion)?;
    if version.components().len() > MAX_EXTENSION_VERSION_COMPONENTS {
        return Err(ManifestError::InvalidVersion);
    }
    Ok(version)
}

fn load_name(source: &Map<String, Value>) -> Result<String, ManifestError> {
    match source.get(keys::NAME).and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => Ok(name.to_string()),
        _ => Err(ManifestError::InvalidName),
    }
}

fn load_description(source: &Map<String, Value>) -> Result<String, ManifestError> {
    match source.get(keys::DESCRIPTION) {
        None => Ok(String::new()),
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or(ManifestError::InvalidDescription),
    }
}

fn load_update_url(source: &Map<String, Value>) -> Result<Option<Url>, ManifestError> {
    let Some(value) = source.get(keys::UPDATE_URL) else {
        return Ok(None);
    };
    let text = value
        .as_str()
        .ok_or_else(|| ManifestError::InvalidUpdateUrl(String::new()))?;
    match Url::parse(text) {
        Ok(url) if url.fragment().is_none() => Ok(Some(url)),
        _ => Err(ManifestError::InvalidUpdateUrl(text.to_string())),
    }
}

fn load_icons(source: &Map<String, Value>, draft: &mut DraftExtension) -> Result<(), ManifestError> {
    let Some(value) = source.get(keys::ICONS) else {
        return Ok(());
    };
    let icons = value.as_object().ok_or(ManifestError::InvalidIcons)?;

    for size in ICON_SIZES {
        let key = size.to_string();
        let Some(entry) = icons.get(&key) else {
            continue;
        };
        let path = entry
            .as_str()
            .map(|path| path.strip_prefix('/').unwrap_or(path))
            .filter(|path| !path.is_empty())
            .ok_or_else(|| ManifestError::InvalidIconPath(key.clone()))?;
        draft.icons.add(*size, path);
    }
    Ok(())
}

fn load_background(
    source: &Map<String, Value>,
    draft: &mut DraftExtension,
) -> Result<(), ManifestError> {
    let Some(value) = source.get(keys::BACKGROUND) else {
        return Ok(());
    };
    let url = value
        .as_str()
        .and_then(|path| draft.resolver.resource_url(path))
        .ok_or(ManifestError::InvalidBackground)?;
    draft.background_url = Some(url);
    Ok(())
}

fn load_content_scripts(
    source: &Map<String, Value>,
    draft: &mut DraftExtension,
) -> Result<(), ManifestError> {
    let Some(value) = source.get(keys::CONTENT_SCRIPTS) else {
        return Ok(());
    };
    let list = value
        .as_array()
        .ok_or(ManifestError::InvalidContentScriptsList)?;

    for (index, item) in list.iter().enumerate() {
        let mut script = load_content_script(item, index, &draft.resolver)?;
        if draft.converted_from_user_script {
            script.emulate_greasemonkey = true;
            script.match_all_frames = true;
        }
        draft.content_scripts.push(script);
    }
    Ok(())
}

fn load_actions(source: &Map<String, Value>, draft: &mut DraftExtension) -> Result<(), ManifestError> {
    let page_action = if let Some(value) = source.get(keys::PAGE_ACTIONS) {
        let list = value
            .as_array()
            .ok_or(ManifestError::InvalidPageActionsList)?;
        match list.as_slice() {
            [] => None,
            [single] => Some(single.as_object().ok_or(ManifestError::InvalidPageAction)?),
            _ => return Err(ManifestError::InvalidPageActionsListSize),
        }
    } else if let Some(value) = source.get(keys::PAGE_ACTION) {
        Some(value.as_object().ok_or(ManifestError::InvalidPageAction)?)
    } else {
        None
    };

    if let Some(action) = page_action {
        draft.page_action = Some(load_extension_action(action, &draft.name, &draft.resolver)?);
    }

    if let Some(value) = source.get(keys::BROWSER_ACTION) {
        if draft.page_action.is_some() {
            return Err(ManifestError::OneUiSurfaceOnly);
        }
        let action = value
            .as_object()
            .ok_or(ManifestError::InvalidBrowserAction)?;
        draft.browser_action = Some(load_extension_action(action, &draft.name, &draft.resolver)?);
    }
    Ok(())
}

fn load_options_page(
    source: &Map<String, Value>,
    draft: &mut DraftExtension,
) -> Result<(), ManifestError> {
    let Some(value) = source.get(keys::OPTIONS_PAGE) else {
        return Ok(());
    };
    let text = value.as_str().ok_or(ManifestError::InvalidOptionsPage)?;

    if draft.is_hosted_app() {
        let url = Url::parse(text)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or(ManifestError::InvalidOptionsPageInHostedApp)?;
        draft.options_url = Some(url);
        return Ok(());
    }

    if Url::parse(text).is_ok() {
        return Err(ManifestError::InvalidOptionsPageExpectUrlInPackage);
    }
    let url = draft
        .resolver
        .resource_url(text)
        .ok_or(ManifestError::InvalidOptionsPage)?;
    draft.options_url = Some(url);
    Ok(())
}

fn load_default_locale(
    source: &Map<String, Value>,
    draft: &mut DraftExtension,
) -> Result<(), ManifestError> {
    let Some(value) = source.get(keys::DEFAULT_LOCALE) else {
        return Ok(());
    };
    match value.as_str() {
        Some(locale) if !locale.is_empty() => {
            draft.default_locale = Some(locale.to_string());
            Ok(())
        }
        _ => Err(ManifestError::InvalidDefaultLocale),
    }
}

fn load_omnibox(source: &Map<String, Value>, draft: &mut DraftExtension) -> Result<(), ManifestError> {
    let Some(value) = keys::lookup(source, keys::OMNIBOX_KEYWORD) else {
        return Ok(());
    };
    let keyword = value
        .as_str()
        .filter(|keyword| !keyword.is_empty())
        .ok_or(ManifestError::InvalidOmniboxKeyword)?;
    if !draft.has_api_permission(EXPERIMENTAL_PERMISSION) {
        return Err(ManifestError::OmniboxExperimental);
    }
    draft.omnibox_keyword = Some(keyword.to_string());
    Ok(())
}

fn load_devtools(source: &Map<String, Value>, draft: &mut DraftExtension) -> Result<(), ManifestError> {
    let Some(value) = source.get(keys::DEVTOOLS_PAGE) else {
        return Ok(());
    };
    let path = value.as_str().ok_or(ManifestError::InvalidDevToolsPage)?;
    if !draft.has_api_permission(EXPERIMENTAL_PERMISSION) {
        return Err(ManifestError::DevToolsExperimental);
    }
    let url = draft
        .resolver
        .resource_url(path)
        .ok_or(ManifestError::InvalidDevToolsPage)?;
    draft.devtools_url = Some(url);
    Ok(())
}

fn load_incognito(
    source: &Map<String, Value>,
    draft: &mut DraftExtension,
) -> Result<(), ManifestError> {
    draft.incognito = if draft.is_app {
        IncognitoMode::Split
    } else {
        IncognitoMode::Spanning
    };
    let Some(value) = source.get(keys::INCOGNITO) else {
        return Ok(());
    };
    draft.incognito = value
        .as_str()
        .and_then(IncognitoMode::parse)
        .ok_or(ManifestError::InvalidIncognitoBehavior)?;
    Ok(())
}

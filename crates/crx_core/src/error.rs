//! Structured manifest validation errors.
//!
//! # Responsibility
//! - Give every loader failure a stable code, a category and the manifest
//!   field it belongs to.
//! - Carry positional indexes so callers can point at the offending entry.
//!
//! # Invariants
//! - `code()` values are stable across releases; tooling may match on them.
//! - Formatting to human text happens in `Display` only; the loader never
//!   builds message strings itself.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::extension::url_pattern::UrlPatternError;

/// Coarse failure taxonomy used by callers that do not care about the exact
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Identity, version, name or another scalar has a wrong type or value.
    MissingOrInvalidKey,
    /// A field expected to be a list/dictionary has the wrong shape.
    MalformedList,
    /// A URL pattern could not be parsed or is not allowed where it appears.
    InvalidPattern,
    /// Two fields that cannot be combined are both present.
    ConflictingFields,
    /// The manifest mixes features that exclude each other.
    MutuallyExclusiveFeature,
    /// A field needs a permission the manifest does not hold.
    PermissionGated,
    /// The loader configuration forbids the feature.
    OutOfPolicy,
}

/// Why a URL pattern string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternRejection {
    /// The list entry is not a string.
    NotAString,
    /// The pattern text itself is malformed.
    Malformed(UrlPatternError),
    /// `<all_urls>` is not accepted in this position.
    AllUrlsNotAllowed,
    /// Paths may not contain `*` in this position.
    WildcardPath,
}

impl Display for PatternRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAString => write!(f, "expected a string"),
            Self::Malformed(err) => write!(f, "{err}"),
            Self::AllUrlsNotAllowed => write!(f, "<all_urls> is not allowed here"),
            Self::WildcardPath => write!(f, "wildcards are not allowed in the path"),
        }
    }
}

/// Manifest load failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    InvalidManifest,
    MissingKey,
    InvalidKey,
    InvalidVersion,
    InvalidName,
    InvalidDescription,
    InvalidUpdateUrl(String),
    InvalidMinimumChromeVersion,
    ChromeVersionTooLow { required: String },
    InvalidIcons,
    InvalidIconPath(String),
    ThemesCannotContainExtensions,
    InvalidTheme,
    InvalidThemeImages,
    InvalidThemeColors,
    InvalidThemeTints,
    InvalidPlugins,
    IllegalPlugins,
    InvalidPluginsPath(usize),
    InvalidPluginsPublic(usize),
    InvalidBackground,
    InvalidToolstrips,
    InvalidToolstrip(usize),
    InvalidContentScriptsList,
    InvalidContentScript(usize),
    InvalidRunAt(usize),
    InvalidAllFrames(usize),
    InvalidMatches(usize),
    InvalidMatchCount(usize),
    InvalidMatch {
        script: usize,
        index: usize,
        reason: PatternRejection,
    },
    InvalidGlobList {
        script: usize,
        key: &'static str,
    },
    InvalidGlob {
        script: usize,
        key: &'static str,
        index: usize,
    },
    InvalidJsList(usize),
    InvalidCssList(usize),
    MissingFile(usize),
    InvalidJs {
        script: usize,
        index: usize,
    },
    InvalidCss {
        script: usize,
        index: usize,
    },
    InvalidPageActionsList,
    InvalidPageActionsListSize,
    InvalidPageAction,
    InvalidPageActionIconPath,
    InvalidPageActionId,
    InvalidPageActionDefaultTitle,
    InvalidPageActionName,
    InvalidPageActionOldAndNewKeys,
    InvalidPageActionPopup,
    InvalidPageActionPopupPath(String),
    OneUiSurfaceOnly,
    InvalidBrowserAction,
    AppsNotEnabled,
    InvalidWebUrls,
    InvalidWebUrl {
        index: usize,
        reason: PatternRejection,
    },
    HostedAppsCannotIncludeExtensionFeatures,
    LaunchPathAndUrlAreExclusive,
    InvalidLaunchLocalPath,
    InvalidLaunchWebUrl,
    LaunchUrlRequired,
    InvalidLaunchContainer,
    InvalidLaunchWidthContainer,
    InvalidLaunchWidth,
    InvalidLaunchHeightContainer,
    InvalidLaunchHeight,
    InvalidOptionsPage,
    InvalidOptionsPageInHostedApp,
    InvalidOptionsPageExpectUrlInPackage,
    InvalidPermissions,
    InvalidPermission {
        index: usize,
        reason: PatternRejection,
    },
    InvalidPermissionScheme(usize),
    InvalidDefaultLocale,
    InvalidChromeUrlOverrides,
    MultipleOverrides,
    InvalidOmniboxKeyword,
    OmniboxExperimental,
    InvalidDevToolsPage,
    DevToolsExperimental,
    InvalidIncognitoBehavior,
}

impl ManifestError {
    /// Stable snake_case tag for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidManifest => "invalid_manifest",
            Self::MissingKey => "missing_key",
            Self::InvalidKey => "invalid_key",
            Self::InvalidVersion => "invalid_version",
            Self::InvalidName => "invalid_name",
            Self::InvalidDescription => "invalid_description",
            Self::InvalidUpdateUrl(_) => "invalid_update_url",
            Self::InvalidMinimumChromeVersion => "invalid_minimum_chrome_version",
            Self::ChromeVersionTooLow { .. } => "chrome_version_too_low",
            Self::InvalidIcons => "invalid_icons",
            Self::InvalidIconPath(_) => "invalid_icon_path",
            Self::ThemesCannotContainExtensions => "themes_cannot_contain_extensions",
            Self::InvalidTheme => "invalid_theme",
            Self::InvalidThemeImages => "invalid_theme_images",
            Self::InvalidThemeColors => "invalid_theme_colors",
            Self::InvalidThemeTints => "invalid_theme_tints",
            Self::InvalidPlugins => "invalid_plugins",
            Self::IllegalPlugins => "illegal_plugins",
            Self::InvalidPluginsPath(_) => "invalid_plugins_path",
            Self::InvalidPluginsPublic(_) => "invalid_plugins_public",
            Self::InvalidBackground => "invalid_background",
            Self::InvalidToolstrips => "invalid_toolstrips",
            Self::InvalidToolstrip(_) => "invalid_toolstrip",
            Self::InvalidContentScriptsList => "invalid_content_scripts_list",
            Self::InvalidContentScript(_) => "invalid_content_script",
            Self::InvalidRunAt(_) => "invalid_run_at",
            Self::InvalidAllFrames(_) => "invalid_all_frames",
            Self::InvalidMatches(_) => "invalid_matches",
            Self::InvalidMatchCount(_) => "invalid_match_count",
            Self::InvalidMatch { .. } => "invalid_match",
            Self::InvalidGlobList { .. } => "invalid_glob_list",
            Self::InvalidGlob { .. } => "invalid_glob",
            Self::InvalidJsList(_) => "invalid_js_list",
            Self::InvalidCssList(_) => "invalid_css_list",
            Self::MissingFile(_) => "missing_file",
            Self::InvalidJs { .. } => "invalid_js",
            Self::InvalidCss { .. } => "invalid_css",
            Self::InvalidPageActionsList => "invalid_page_actions_list",
            Self::InvalidPageActionsListSize => "invalid_page_actions_list_size",
            Self::InvalidPageAction => "invalid_page_action",
            Self::InvalidPageActionIconPath => "invalid_page_action_icon_path",
            Self::InvalidPageActionId => "invalid_page_action_id",
            Self::InvalidPageActionDefaultTitle => "invalid_page_action_default_title",
            Self::InvalidPageActionName => "invalid_page_action_name",
            Self::InvalidPageActionOldAndNewKeys => "invalid_page_action_old_and_new_keys",
            Self::InvalidPageActionPopup => "invalid_page_action_popup",
            Self::InvalidPageActionPopupPath(_) => "invalid_page_action_popup_path",
            Self::OneUiSurfaceOnly => "one_ui_surface_only",
            Self::InvalidBrowserAction => "invalid_browser_action",
            Self::AppsNotEnabled => "apps_not_enabled",
            Self::InvalidWebUrls => "invalid_web_urls",
            Self::InvalidWebUrl { .. } => "invalid_web_url",
            Self::HostedAppsCannotIncludeExtensionFeatures => {
                "hosted_apps_cannot_include_extension_features"
            }
            Self::LaunchPathAndUrlAreExclusive => "launch_path_and_url_are_exclusive",
            Self::InvalidLaunchLocalPath => "invalid_launch_local_path",
            Self::InvalidLaunchWebUrl => "invalid_launch_web_url",
            Self::LaunchUrlRequired => "launch_url_required",
            Self::InvalidLaunchContainer => "invalid_launch_container",
            Self::InvalidLaunchWidthContainer => "invalid_launch_width_container",
            Self::InvalidLaunchWidth => "invalid_launch_width",
            Self::InvalidLaunchHeightContainer => "invalid_launch_height_container",
            Self::InvalidLaunchHeight => "invalid_launch_height",
            Self::InvalidOptionsPage => "invalid_options_page",
            Self::InvalidOptionsPageInHostedApp => "invalid_options_page_in_hosted_app",
            Self::InvalidOptionsPageExpectUrlInPackage => {
                "invalid_options_page_expect_url_in_package"
            }
            Self::InvalidPermissions => "invalid_permissions",
            Self::InvalidPermission { .. } => "invalid_permission",
            Self::InvalidPermissionScheme(_) => "invalid_permission_scheme",
            Self::InvalidDefaultLocale => "invalid_default_locale",
            Self::InvalidChromeUrlOverrides => "invalid_chrome_url_overrides",
            Self::MultipleOverrides => "multiple_overrides",
            Self::InvalidOmniboxKeyword => "invalid_omnibox_keyword",
            Self::OmniboxExperimental => "omnibox_experimental",
            Self::InvalidDevToolsPage => "invalid_devtools_page",
            Self::DevToolsExperimental => "devtools_experimental",
            Self::InvalidIncognitoBehavior => "invalid_incognito_behavior",
        }
    }

    /// Coarse category of this failure.
    pub fn category(&self) -> ErrorCategory {
        use ErrorCategory::*;
        match self {
            Self::InvalidContentScriptsList
            | Self::InvalidContentScript(_)
            | Self::InvalidMatches(_)
            | Self::InvalidMatchCount(_)
            | Self::InvalidGlobList { .. }
            | Self::InvalidJsList(_)
            | Self::InvalidCssList(_)
            | Self::MissingFile(_)
            | Self::InvalidPlugins
            | Self::InvalidToolstrips
            | Self::InvalidIcons
            | Self::InvalidTheme
            | Self::InvalidThemeImages
            | Self::InvalidThemeColors
            | Self::InvalidThemeTints
            | Self::InvalidPageActionsList
            | Self::InvalidPageActionsListSize
            | Self::InvalidPageAction
            | Self::InvalidBrowserAction
            | Self::InvalidWebUrls
            | Self::InvalidPermissions
            | Self::InvalidChromeUrlOverrides => MalformedList,
            Self::InvalidMatch { .. }
            | Self::InvalidWebUrl { .. }
            | Self::InvalidPermission { .. }
            | Self::InvalidPermissionScheme(_) => InvalidPattern,
            Self::InvalidPageActionOldAndNewKeys
            | Self::LaunchPathAndUrlAreExclusive
            | Self::InvalidLaunchWidthContainer
            | Self::InvalidLaunchHeightContainer
            | Self::MultipleOverrides => ConflictingFields,
            Self::ThemesCannotContainExtensions
            | Self::OneUiSurfaceOnly
            | Self::HostedAppsCannotIncludeExtensionFeatures => MutuallyExclusiveFeature,
            Self::OmniboxExperimental | Self::DevToolsExperimental => PermissionGated,
            Self::AppsNotEnabled | Self::IllegalPlugins | Self::ChromeVersionTooLow { .. } => {
                OutOfPolicy
            }
            _ => MissingOrInvalidKey,
        }
    }

    /// Manifest key the failure belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidManifest => "",
            Self::MissingKey | Self::InvalidKey => "key",
            Self::InvalidVersion => "version",
            Self::InvalidName => "name",
            Self::InvalidDescription => "description",
            Self::InvalidUpdateUrl(_) => "update_url",
            Self::InvalidMinimumChromeVersion | Self::ChromeVersionTooLow { .. } => {
                "minimum_chrome_version"
            }
            Self::InvalidIcons | Self::InvalidIconPath(_) => "icons",
            Self::ThemesCannotContainExtensions
            | Self::InvalidTheme
            | Self::InvalidThemeImages
            | Self::InvalidThemeColors
            | Self::InvalidThemeTints => "theme",
            Self::InvalidPlugins
            | Self::IllegalPlugins
            | Self::InvalidPluginsPath(_)
            | Self::InvalidPluginsPublic(_) => "plugins",
            Self::InvalidBackground => "background_page",
            Self::InvalidToolstrips | Self::InvalidToolstrip(_) => "toolstrips",
            Self::InvalidContentScriptsList
            | Self::InvalidContentScript(_)
            | Self::InvalidRunAt(_)
            | Self::InvalidAllFrames(_)
            | Self::InvalidMatches(_)
            | Self::InvalidMatchCount(_)
            | Self::InvalidMatch { .. }
            | Self::InvalidGlobList { .. }
            | Self::InvalidGlob { .. }
            | Self::InvalidJsList(_)
            | Self::InvalidCssList(_)
            | Self::MissingFile(_)
            | Self::InvalidJs { .. }
            | Self::InvalidCss { .. } => "content_scripts",
            Self::InvalidPageActionsList | Self::InvalidPageActionsListSize => "page_actions",
            Self::InvalidPageAction
            | Self::InvalidPageActionIconPath
            | Self::InvalidPageActionId
            | Self::InvalidPageActionDefaultTitle
            | Self::InvalidPageActionName
            | Self::InvalidPageActionOldAndNewKeys
            | Self::InvalidPageActionPopup
            | Self::InvalidPageActionPopupPath(_) => "page_action",
            Self::OneUiSurfaceOnly | Self::InvalidBrowserAction => "browser_action",
            Self::AppsNotEnabled | Self::HostedAppsCannotIncludeExtensionFeatures => "app",
            Self::InvalidWebUrls | Self::InvalidWebUrl { .. } => "app.urls",
            Self::LaunchPathAndUrlAreExclusive | Self::LaunchUrlRequired => "app.launch",
            Self::InvalidLaunchLocalPath => "app.launch.local_path",
            Self::InvalidLaunchWebUrl => "app.launch.web_url",
            Self::InvalidLaunchContainer => "app.launch.container",
            Self::InvalidLaunchWidthContainer | Self::InvalidLaunchWidth => "app.launch.width",
            Self::InvalidLaunchHeightContainer | Self::InvalidLaunchHeight => {
                "app.launch.height"
            }
            Self::InvalidOptionsPage
            | Self::InvalidOptionsPageInHostedApp
            | Self::InvalidOptionsPageExpectUrlInPackage => "options_page",
            Self::InvalidPermissions
            | Self::InvalidPermission { .. }
            | Self::InvalidPermissionScheme(_) => "permissions",
            Self::InvalidDefaultLocale => "default_locale",
            Self::InvalidChromeUrlOverrides | Self::MultipleOverrides => "chrome_url_overrides",
            Self::InvalidOmniboxKeyword | Self::OmniboxExperimental => "omnibox.keyword",
            Self::InvalidDevToolsPage | Self::DevToolsExperimental => "devtools_page",
            Self::InvalidIncognitoBehavior => "incognito",
        }
    }

    /// Primary positional index (list entry or content script number).
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::InvalidPluginsPath(i)
            | Self::InvalidPluginsPublic(i)
            | Self::InvalidToolstrip(i)
            | Self::InvalidContentScript(i)
            | Self::InvalidRunAt(i)
            | Self::InvalidAllFrames(i)
            | Self::InvalidMatches(i)
            | Self::InvalidMatchCount(i)
            | Self::InvalidJsList(i)
            | Self::InvalidCssList(i)
            | Self::MissingFile(i)
            | Self::InvalidPermissionScheme(i) => Some(*i),
            Self::InvalidMatch { script, .. }
            | Self::InvalidGlobList { script, .. }
            | Self::InvalidGlob { script, .. }
            | Self::InvalidJs { script, .. }
            | Self::InvalidCss { script, .. } => Some(*script),
            Self::InvalidWebUrl { index, .. } | Self::InvalidPermission { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    /// Secondary index inside a content script entry.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::InvalidMatch { index, .. }
            | Self::InvalidGlob { index, .. }
            | Self::InvalidJs { index, .. }
            | Self::InvalidCss { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl Display for ManifestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidManifest => write!(f, "manifest must be a dictionary"),
            Self::MissingKey => write!(f, "required value 'key' is missing"),
            Self::InvalidKey => write!(f, "invalid value for 'key'"),
            Self::InvalidVersion => write!(
                f,
                "required value 'version' is missing or invalid; it must be 1-4 dot-separated integers"
            ),
            Self::InvalidName => write!(f, "required value 'name' is missing or invalid"),
            Self::InvalidDescription => write!(f, "invalid value for 'description'"),
            Self::InvalidUpdateUrl(value) => {
                write!(f, "invalid value for update url: '{value}'")
            }
            Self::InvalidMinimumChromeVersion => {
                write!(f, "invalid value for 'minimum_chrome_version'")
            }
            Self::ChromeVersionTooLow { required } => write!(
                f,
                "this extension requires host version {required} or greater"
            ),
            Self::InvalidIcons => write!(f, "invalid value for 'icons'"),
            Self::InvalidIconPath(size) => write!(f, "invalid value for 'icons[\"{size}\"]'"),
            Self::ThemesCannotContainExtensions => {
                write!(f, "a theme cannot contain extension features")
            }
            Self::InvalidTheme => write!(f, "invalid value for 'theme'"),
            Self::InvalidThemeImages => write!(f, "invalid value for theme images; must be strings"),
            Self::InvalidThemeColors => write!(
                f,
                "invalid value for theme colors; colors must be RGB [r, g, b] or RGBA [r, g, b, a]"
            ),
            Self::InvalidThemeTints => write!(
                f,
                "invalid value for theme tints; tints must be numbers in the form [h, s, l]"
            ),
            Self::InvalidPlugins => write!(f, "invalid value for 'plugins'"),
            Self::IllegalPlugins => write!(f, "plugins are not allowed on this platform"),
            Self::InvalidPluginsPath(i) => write!(f, "invalid value for 'plugins[{i}].path'"),
            Self::InvalidPluginsPublic(i) => {
                write!(f, "invalid value for 'plugins[{i}].public'")
            }
            Self::InvalidBackground => write!(f, "invalid value for 'background_page'"),
            Self::InvalidToolstrips => write!(f, "invalid value for 'toolstrips'"),
            Self::InvalidToolstrip(i) => write!(f, "invalid value for 'toolstrips[{i}]'"),
            Self::InvalidContentScriptsList => write!(f, "invalid value for 'content_scripts'"),
            Self::InvalidContentScript(i) => {
                write!(f, "invalid value for 'content_scripts[{i}]'")
            }
            Self::InvalidRunAt(i) => write!(f, "invalid value for 'content_scripts[{i}].run_at'"),
            Self::InvalidAllFrames(i) => {
                write!(f, "invalid value for 'content_scripts[{i}].all_frames'")
            }
            Self::InvalidMatches(i) => {
                write!(f, "required value 'content_scripts[{i}].matches' is missing or invalid")
            }
            Self::InvalidMatchCount(i) => write!(
                f,
                "invalid value for 'content_scripts[{i}].matches'; must contain at least one match"
            ),
            Self::InvalidMatch {
                script,
                index,
                reason,
            } => write!(
                f,
                "invalid value for 'content_scripts[{script}].matches[{index}]': {reason}"
            ),
            Self::InvalidGlobList { script, key } => {
                write!(f, "invalid value for 'content_scripts[{script}].{key}'")
            }
            Self::InvalidGlob { script, key, index } => {
                write!(f, "invalid value for 'content_scripts[{script}].{key}[{index}]'")
            }
            Self::InvalidJsList(i) => write!(f, "invalid value for 'content_scripts[{i}].js'"),
            Self::InvalidCssList(i) => write!(f, "invalid value for 'content_scripts[{i}].css'"),
            Self::MissingFile(i) => write!(
                f,
                "required value 'content_scripts[{i}].js' or 'content_scripts[{i}].css' is missing"
            ),
            Self::InvalidJs { script, index } => {
                write!(f, "invalid value for 'content_scripts[{script}].js[{index}]'")
            }
            Self::InvalidCss { script, index } => {
                write!(f, "invalid value for 'content_scripts[{script}].css[{index}]'")
            }
            Self::InvalidPageActionsList => write!(f, "invalid value for 'page_actions'"),
            Self::InvalidPageActionsListSize => {
                write!(f, "invalid value for 'page_actions'; only one page action is allowed")
            }
            Self::InvalidPageAction => write!(f, "invalid value for 'page_action'"),
            Self::InvalidPageActionIconPath => {
                write!(f, "invalid value for 'page_action.default_icon'")
            }
            Self::InvalidPageActionId => write!(f, "invalid value for 'page_action.id'"),
            Self::InvalidPageActionDefaultTitle => {
                write!(f, "invalid value for 'default_title'")
            }
            Self::InvalidPageActionName => write!(f, "invalid value for 'page_action.name'"),
            Self::InvalidPageActionOldAndNewKeys => write!(
                f,
                "key 'default_popup' is deprecated and cannot be combined with 'popup'"
            ),
            Self::InvalidPageActionPopup => write!(f, "invalid type for page action popup"),
            Self::InvalidPageActionPopupPath(value) => {
                write!(f, "invalid value for page action popup path [{value}]")
            }
            Self::OneUiSurfaceOnly => write!(
                f,
                "only one of 'browser_action', 'page_action' and 'app' can be specified"
            ),
            Self::InvalidBrowserAction => write!(f, "invalid value for 'browser_action'"),
            Self::AppsNotEnabled => write!(f, "apps are not enabled"),
            Self::InvalidWebUrls => write!(f, "invalid value for 'app.urls'"),
            Self::InvalidWebUrl { index, reason } => {
                write!(f, "invalid value for 'app.urls[{index}]': {reason}")
            }
            Self::HostedAppsCannotIncludeExtensionFeatures => {
                write!(f, "hosted apps cannot use extension features")
            }
            Self::LaunchPathAndUrlAreExclusive => write!(
                f,
                "the 'app.launch.local_path' and 'app.launch.web_url' keys cannot both be set"
            ),
            Self::InvalidLaunchLocalPath => {
                write!(f, "invalid value for 'app.launch.local_path'")
            }
            Self::InvalidLaunchWebUrl => write!(f, "invalid value for 'app.launch.web_url'"),
            Self::LaunchUrlRequired => write!(
                f,
                "either 'app.launch.local_path' or 'app.launch.web_url' is required"
            ),
            Self::InvalidLaunchContainer => write!(f, "invalid value for 'app.launch.container'"),
            Self::InvalidLaunchWidthContainer => write!(
                f,
                "invalid value for 'app.launch.width'; can only be used with a panel container"
            ),
            Self::InvalidLaunchWidth => write!(f, "invalid value for 'app.launch.width'"),
            Self::InvalidLaunchHeightContainer => write!(
                f,
                "invalid value for 'app.launch.height'; can only be used with a panel container"
            ),
            Self::InvalidLaunchHeight => write!(f, "invalid value for 'app.launch.height'"),
            Self::InvalidOptionsPage => write!(f, "invalid value for 'options_page'"),
            Self::InvalidOptionsPageInHostedApp => write!(
                f,
                "invalid value for 'options_page'; hosted apps must specify an absolute http(s) URL"
            ),
            Self::InvalidOptionsPageExpectUrlInPackage => write!(
                f,
                "invalid value for 'options_page'; packaged extensions must use a relative path"
            ),
            Self::InvalidPermissions => write!(f, "required value 'permissions' is invalid"),
            Self::InvalidPermission { index, reason } => {
                write!(f, "invalid value for 'permissions[{index}]': {reason}")
            }
            Self::InvalidPermissionScheme(i) => {
                write!(f, "invalid scheme for 'permissions[{i}]'")
            }
            Self::InvalidDefaultLocale => write!(f, "invalid value for 'default_locale'"),
            Self::InvalidChromeUrlOverrides => {
                write!(f, "invalid value for 'chrome_url_overrides'")
            }
            Self::MultipleOverrides => {
                write!(f, "an extension cannot override more than one page")
            }
            Self::InvalidOmniboxKeyword => write!(f, "invalid value for 'omnibox.keyword'"),
            Self::OmniboxExperimental => write!(
                f,
                "'omnibox.keyword' requires the 'experimental' permission"
            ),
            Self::InvalidDevToolsPage => write!(f, "invalid value for 'devtools_page'"),
            Self::DevToolsExperimental => {
                write!(f, "'devtools_page' requires the 'experimental' permission")
            }
            Self::InvalidIncognitoBehavior => write!(f, "invalid value for 'incognito'"),
        }
    }
}

impl Error for ManifestError {}

//! Manifest key names and keyword values.
//!
//! Nested keys are written as dotted paths and read with [`lookup`].

use serde_json::{Map, Value};

pub const ALL_FRAMES: &str = "all_frames";
pub const APP: &str = "app";
pub const BACKGROUND: &str = "background_page";
pub const BROWSER_ACTION: &str = "browser_action";
pub const CHROME_URL_OVERRIDES: &str = "chrome_url_overrides";
pub const CONTENT_SCRIPTS: &str = "content_scripts";
pub const CONVERTED_FROM_USER_SCRIPT: &str = "converted_from_user_script";
pub const CSS: &str = "css";
pub const CURRENT_LOCALE: &str = "current_locale";
pub const DEFAULT_LOCALE: &str = "default_locale";
pub const DESCRIPTION: &str = "description";
pub const DEVTOOLS_PAGE: &str = "devtools_page";
pub const EXCLUDE_GLOBS: &str = "exclude_globs";
pub const ICONS: &str = "icons";
pub const INCLUDE_GLOBS: &str = "include_globs";
pub const INCOGNITO: &str = "incognito";
pub const JS: &str = "js";
pub const LAUNCH: &str = "app.launch";
pub const LAUNCH_CONTAINER: &str = "app.launch.container";
pub const LAUNCH_HEIGHT: &str = "app.launch.height";
pub const LAUNCH_LOCAL_PATH: &str = "app.launch.local_path";
pub const LAUNCH_WEB_URL: &str = "app.launch.web_url";
pub const LAUNCH_WIDTH: &str = "app.launch.width";
pub const MATCHES: &str = "matches";
pub const MINIMUM_CHROME_VERSION: &str = "minimum_chrome_version";
pub const NAME: &str = "name";
pub const OMNIBOX_KEYWORD: &str = "omnibox.keyword";
pub const OPTIONS_PAGE: &str = "options_page";
pub const PAGE_ACTION: &str = "page_action";
pub const PAGE_ACTIONS: &str = "page_actions";
pub const PAGE_ACTION_DEFAULT_ICON: &str = "default_icon";
pub const PAGE_ACTION_DEFAULT_POPUP: &str = "default_popup";
pub const PAGE_ACTION_DEFAULT_TITLE: &str = "default_title";
pub const PAGE_ACTION_ICONS: &str = "icons";
pub const PAGE_ACTION_ID: &str = "id";
pub const PAGE_ACTION_POPUP: &str = "popup";
pub const PAGE_ACTION_POPUP_PATH: &str = "path";
pub const PATH: &str = "path";
pub const PERMISSIONS: &str = "permissions";
pub const PLUGINS: &str = "plugins";
pub const PLUGIN_PUBLIC: &str = "public";
pub const PUBLIC_KEY: &str = "key";
pub const RUN_AT: &str = "run_at";
pub const SIGNATURE: &str = "signature";
pub const THEME: &str = "theme";
pub const THEME_COLORS: &str = "colors";
pub const THEME_DISPLAY_PROPERTIES: &str = "properties";
pub const THEME_IMAGES: &str = "images";
pub const THEME_TINTS: &str = "tints";
pub const TOOLSTRIPS: &str = "toolstrips";
pub const UPDATE_URL: &str = "update_url";
pub const VERSION: &str = "version";
pub const WEB_URLS: &str = "app.urls";

pub const RUN_AT_DOCUMENT_START: &str = "document_start";
pub const RUN_AT_DOCUMENT_END: &str = "document_end";
pub const RUN_AT_DOCUMENT_IDLE: &str = "document_idle";

pub const LAUNCH_CONTAINER_PANEL: &str = "panel";
pub const LAUNCH_CONTAINER_TAB: &str = "tab";

pub const INCOGNITO_SPANNING: &str = "spanning";
pub const INCOGNITO_SPLIT: &str = "split";

/// Keys any manifest may carry, including themes and hosted apps.
pub const BASE_CRX_KEYS: &[&str] = &[
    CURRENT_LOCALE,
    DEFAULT_LOCALE,
    DESCRIPTION,
    ICONS,
    NAME,
    PUBLIC_KEY,
    SIGNATURE,
    VERSION,
    UPDATE_URL,
];

/// Non-base keys a hosted app may still declare.
pub const HOSTED_APP_EXTRA_KEYS: &[&str] = &[APP, PERMISSIONS, OPTIONS_PAGE];

/// Reads a dotted `path` (e.g. `app.launch.web_url`) from `manifest`.
pub fn lookup<'a>(manifest: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = manifest.get(first)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Returns true when `key` belongs to the base allow-list.
pub fn is_base_crx_key(key: &str) -> bool {
    BASE_CRX_KEYS.contains(&key)
}

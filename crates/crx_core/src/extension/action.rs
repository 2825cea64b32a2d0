//! Page action and browser action declarations.
//!
//! Both surfaces share one shape and one loader; the manifest decides which
//! slot the result lands in.

use serde_json::{Map, Value};
use url::Url;

use crate::error::ManifestError;

use super::manifest_keys as keys;
use super::resource::ResourceResolver;

/// Toolbar or omnibox button declared by an extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionAction {
    /// Legacy page action id.
    pub id: Option<String>,
    /// Legacy list of icon paths that could be switched at runtime.
    pub icon_paths: Vec<String>,
    pub default_icon_path: Option<String>,
    pub title: String,
    pub popup_url: Option<Url>,
}

impl ExtensionAction {
    pub fn has_popup(&self) -> bool {
        self.popup_url.is_some()
    }
}

/// Parses an action dictionary.
///
/// The title comes from `default_title`, then the action's own `name`, then
/// `fallback_title` (the manifest name).
pub(crate) fn load_extension_action(
    action: &Map<String, Value>,
    fallback_title: &str,
    resolver: &ResourceResolver,
) -> Result<ExtensionAction, ManifestError> {
    let mut result = ExtensionAction::default();

    // A non-list `icons` is ignored; only list entries are checked.
    if let Some(Value::Array(icons)) = action.get(keys::PAGE_ACTION_ICONS) {
        for icon in icons {
            match icon.as_str() {
                Some(path) if !path.is_empty() => result.icon_paths.push(path.to_string()),
                _ => return Err(ManifestError::InvalidPageActionIconPath),
            }
        }
    }

    if let Some(id) = action.get(keys::PAGE_ACTION_ID) {
        let id = id.as_str().ok_or(ManifestError::InvalidPageActionId)?;
        result.id = Some(id.to_string());
    }

    if let Some(default_icon) = action.get(keys::PAGE_ACTION_DEFAULT_ICON) {
        match default_icon.as_str() {
            Some(path) if !path.is_empty() => result.default_icon_path = Some(path.to_string()),
            _ => return Err(ManifestError::InvalidPageActionIconPath),
        }
    }

    result.title = if let Some(title) = action.get(keys::PAGE_ACTION_DEFAULT_TITLE) {
        title
            .as_str()
            .ok_or(ManifestError::InvalidPageActionDefaultTitle)?
            .to_string()
    } else if let Some(name) = action.get(keys::NAME) {
        name.as_str()
            .ok_or(ManifestError::InvalidPageActionName)?
            .to_string()
    } else {
        fallback_title.to_string()
    };

    let has_new_key = action.contains_key(keys::PAGE_ACTION_DEFAULT_POPUP);
    let has_old_key = action.contains_key(keys::PAGE_ACTION_POPUP);
    if has_new_key && has_old_key {
        return Err(ManifestError::InvalidPageActionOldAndNewKeys);
    }
    let popup_key = if has_new_key {
        Some(keys::PAGE_ACTION_DEFAULT_POPUP)
    } else if has_old_key {
        Some(keys::PAGE_ACTION_POPUP)
    } else {
        None
    };

    if let Some(popup) = popup_key.and_then(|key| action.get(key)) {
        let path = match popup {
            Value::String(path) => path.as_str(),
            Value::Object(legacy) => legacy
                .get(keys::PAGE_ACTION_POPUP_PATH)
                .and_then(Value::as_str)
                .ok_or_else(|| ManifestError::InvalidPageActionPopupPath("<missing>".to_string()))?,
            _ => return Err(ManifestError::InvalidPageActionPopup),
        };
        // An empty popup means "no popup".
        if !path.is_empty() {
            let url = resolver
                .resource_url(path)
                .ok_or_else(|| ManifestError::InvalidPageActionPopupPath(path.to_string()))?;
            result.popup_url = Some(url);
        }
    }

    Ok(result)
}

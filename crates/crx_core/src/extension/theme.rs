//! Theme manifests.
//!
//! # Responsibility
//! - Validate the `theme` dictionary (images, colors, tints, properties).
//! - Detect manifests that mix theme and extension keys.
//!
//! # Invariants
//! - Colors are `[r, g, b]` integers with an optional integer or real alpha.
//! - Tints are exactly three numbers.

use serde_json::{Map, Value};

use crate::error::ManifestError;

use super::manifest_keys as keys;

/// Validated theme sub-dictionaries, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    pub images: Option<Map<String, Value>>,
    pub colors: Option<Map<String, Value>>,
    pub tints: Option<Map<String, Value>>,
    pub display_properties: Option<Map<String, Value>>,
}

impl Theme {
    /// Image paths referenced by the theme.
    pub fn image_paths(&self) -> impl Iterator<Item = &str> {
        self.images
            .iter()
            .flat_map(|images| images.values())
            .filter_map(Value::as_str)
    }
}

/// Returns true when `manifest` holds keys other than base keys and `theme`.
pub fn contains_non_theme_keys(manifest: &Map<String, Value>) -> bool {
    manifest
        .keys()
        .any(|key| !keys::is_base_crx_key(key) && key != keys::THEME)
}

pub(crate) fn load_theme(value: &Value) -> Result<Theme, ManifestError> {
    let theme = value.as_object().ok_or(ManifestError::InvalidTheme)?;
    let mut result = Theme::default();

    if let Some(images) = theme.get(keys::THEME_IMAGES).and_then(Value::as_object) {
        if !images.values().all(Value::is_string) {
            return Err(ManifestError::InvalidThemeImages);
        }
        result.images = Some(images.clone());
    }

    if let Some(colors) = theme.get(keys::THEME_COLORS).and_then(Value::as_object) {
        if !colors.values().all(is_color) {
            return Err(ManifestError::InvalidThemeColors);
        }
        result.colors = Some(colors.clone());
    }

    if let Some(tints) = theme.get(keys::THEME_TINTS).and_then(Value::as_object) {
        if !tints.values().all(is_tint) {
            return Err(ManifestError::InvalidThemeTints);
        }
        result.tints = Some(tints.clone());
    }

    if let Some(properties) = theme
        .get(keys::THEME_DISPLAY_PROPERTIES)
        .and_then(Value::as_object)
    {
        result.display_properties = Some(properties.clone());
    }

    Ok(result)
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn is_color(value: &Value) -> bool {
    let Some(list) = value.as_array() else {
        return false;
    };
    let rgb_ok = list.len() >= 3 && list[..3].iter().all(is_integer);
    match list.len() {
        3 => rgb_ok,
        4 => rgb_ok && list[3].is_number(),
        _ => false,
    }
}

fn is_tint(value: &Value) -> bool {
    value
        .as_array()
        .map(|list| list.len() == 3 && list.iter().all(Value::is_number))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{contains_non_theme_keys, load_theme};
    use crate::error::ManifestError;
    use serde_json::json;

    #[test]
    fn accepts_rgb_rgba_and_tints() {
        let theme = load_theme(&json!({
            "images": {"theme_frame": "images/frame.png"},
            "colors": {"frame": [10, 20, 30], "toolbar": [1, 2, 3, 0.5], "tab": [1, 2, 3, 1]},
            "tints": {"buttons": [0.1, 1, -1]},
            "properties": {"ntp_logo_alternate": 1}
        }))
        .expect("theme");
        assert_eq!(theme.image_paths().collect::<Vec<_>>(), vec!["images/frame.png"]);
        assert!(theme.colors.is_some());
        assert!(theme.display_properties.is_some());
    }

    #[test]
    fn rejects_bad_theme_values() {
        assert_eq!(
            load_theme(&json!("nope")).expect_err("not a dict"),
            ManifestError::InvalidTheme
        );
        assert_eq!(
            load_theme(&json!({"images": {"a": 1}})).expect_err("image"),
            ManifestError::InvalidThemeImages
        );
        assert_eq!(
            load_theme(&json!({"colors": {"a": [1, 2]}})).expect_err("short color"),
            ManifestError::InvalidThemeColors
        );
        assert_eq!(
            load_theme(&json!({"colors": {"a": [1.5, 2, 3]}})).expect_err("real rgb"),
            ManifestError::InvalidThemeColors
        );
        assert_eq!(
            load_theme(&json!({"colors": {"a": [1, 2, 3, "x"]}})).expect_err("bad alpha"),
            ManifestError::InvalidThemeColors
        );
        assert_eq!(
            load_theme(&json!({"tints": {"a": [1, 2, 3, 4]}})).expect_err("long tint"),
            ManifestError::InvalidThemeTints
        );
    }

    #[test]
    fn non_theme_keys_are_detected() {
        let pure = json!({"name": "T", "version": "1", "theme": {}});
        assert!(!contains_non_theme_keys(pure.as_object().expect("object")));
        let mixed = json!({"name": "T", "version": "1", "theme": {}, "background_page": "b.html"});
        assert!(contains_non_theme_keys(mixed.as_object().expect("object")));
    }
}

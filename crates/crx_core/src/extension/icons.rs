//! Declared icon paths keyed by pixel size.

use std::collections::BTreeMap;

/// Pixel sizes accepted in the manifest `icons` dictionary, largest first.
pub const ICON_SIZES: &[u32] = &[128, 48, 32, 16, 19];

pub const EXTENSION_ICON_LARGE: u32 = 128;
pub const EXTENSION_ICON_MEDIUM: u32 = 48;
pub const EXTENSION_ICON_SMALL: u32 = 32;
pub const EXTENSION_ICON_SMALLISH: u32 = 16;
pub const EXTENSION_ICON_BITTY: u32 = 19;

/// How [`ExtensionIconSet::get`] treats a size with no exact entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconMatch {
    Exactly,
    /// Closest size at or above the request.
    Bigger,
    /// Closest size at or below the request.
    Smaller,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionIconSet {
    paths: BTreeMap<u32, String>,
}

impl ExtensionIconSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, size: u32, path: impl Into<String>) {
        self.paths.insert(size, path.into());
    }

    pub fn get(&self, size: u32, match_type: IconMatch) -> Option<&str> {
        let found = match match_type {
            IconMatch::Exactly => self.paths.get(&size),
            IconMatch::Bigger => self.paths.range(size..).next().map(|(_, path)| path),
            IconMatch::Smaller => self.paths.range(..=size).next_back().map(|(_, path)| path),
        };
        found.map(String::as_str)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.values().any(|candidate| candidate == path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.paths.iter().map(|(size, path)| (*size, path.as_str()))
    }
}

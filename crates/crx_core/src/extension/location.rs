//! Install location classification.

/// Where an extension was installed from.
///
/// The location is a trust tier: `Component` extensions ship with the host
/// and may use permissions other locations cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    /// Unknown or corrupted install record.
    #[default]
    Invalid,
    /// Installed by the user from a packaged file or the store.
    Internal,
    /// Installed through an external preferences file.
    ExternalPref,
    /// Installed through the system registry.
    ExternalRegistry,
    /// Downloaded on behalf of an external preferences entry.
    ExternalPrefDownload,
    /// Loaded unpacked from a directory, usually during development.
    Load,
    /// Bundled with the host; highest trust.
    Component,
}

const LOCATION_NAMES: &[(&str, Location)] = &[
    ("invalid", Location::Invalid),
    ("internal", Location::Internal),
    ("external_pref", Location::ExternalPref),
    ("external_registry", Location::ExternalRegistry),
    ("external_pref_download", Location::ExternalPrefDownload),
    ("load", Location::Load),
    ("component", Location::Component),
];

impl Location {
    pub fn as_str(self) -> &'static str {
        LOCATION_NAMES
            .iter()
            .find(|(_, location)| *location == self)
            .map(|(name, _)| *name)
            .unwrap_or("invalid")
    }

    /// Parses a snake_case location name.
    pub fn parse(value: &str) -> Option<Self> {
        LOCATION_NAMES
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, location)| *location)
    }

    /// Returns true for locations managed outside the user's control.
    pub fn is_external(self) -> bool {
        matches!(
            self,
            Self::ExternalPref | Self::ExternalRegistry | Self::ExternalPrefDownload
        )
    }
}

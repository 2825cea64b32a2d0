//! Dotted numeric versions.

use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Maximum number of components an extension version may carry.
pub const MAX_EXTENSION_VERSION_COMPONENTS: usize = 4;

/// Version made of one or more non-negative 16-bit components.
///
/// Comparison pads the shorter side with zeros, so `1.0` equals `1`.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u16>,
}

impl Version {
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        if value.is_empty() {
            return Err(VersionError::Empty);
        }
        let components = value
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                    return Err(VersionError::InvalidComponent(part.to_string()));
                }
                part.parse::<u16>()
                    .map_err(|_| VersionError::InvalidComponent(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { components })
    }

    pub fn components(&self) -> &[u16] {
        &self.components
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let left = self.components.get(i).copied().unwrap_or(0);
            let right = other.components.get(i).copied().unwrap_or(0);
            match left.cmp(&right) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u16::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Version parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    Empty,
    InvalidComponent(String),
}

impl Display for VersionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "version must not be empty"),
            Self::InvalidComponent(part) => write!(f, "invalid version component: `{part}`"),
        }
    }
}

impl Error for VersionError {}

#[cfg(test)]
mod tests {
    use super::{Version, VersionError};

    #[test]
    fn parses_dotted_versions() {
        let version = Version::parse("1.2.30.4").expect("four components");
        assert_eq!(version.components(), &[1, 2, 30, 4]);
        assert_eq!(version.to_string(), "1.2.30.4");
        assert_eq!(Version::parse("7").expect("single").components(), &[7]);
    }

    #[test]
    fn rejects_malformed_versions() {
        assert_eq!(Version::parse(""), Err(VersionError::Empty));
        for bad in ["1..2", "1.a", "+1", "-1", "1.2.", "70000", " 1"] {
            assert!(Version::parse(bad).is_err(), "`{bad}` should be rejected");
        }
    }

    #[test]
    fn compares_with_zero_padding() {
        let v = |s: &str| Version::parse(s).expect("version");
        assert_eq!(v("1.0"), v("1"));
        assert!(v("1.0.1") > v("1"));
        assert!(v("2") > v("1.99.99"));
        assert!(v("6.0.472.0") < v("6.0.490"));
    }
}

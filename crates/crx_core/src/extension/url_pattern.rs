//! Scheme/host/path match expressions.
//!
//! # Responsibility
//! - Parse `<scheme>://<host><path>` patterns and the `<all_urls>` sentinel.
//! - Decide whether a concrete URL is covered by a pattern.
//!
//! # Invariants
//! - A pattern's scheme must be a member of its scheme set; `*` narrows the
//!   set to http/https.
//! - An empty host is only produced together with the subdomain wildcard
//!   (except for `file` patterns, which carry no host at all).
//! - Paths are kept verbatim; `*` is never implied.
//! - Matching is pure: no I/O, no allocation-dependent outcomes.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use url::{Host, Url};

use super::glob::{Glob, GlobSyntax};

/// Literal sentinel that matches every URL with a valid scheme.
pub const ALL_URLS_PATTERN: &str = "<all_urls>";

const SCHEME_SEPARATOR: &str = "://";

bitflags! {
    /// Set of schemes a pattern is allowed to use.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SchemeSet: u32 {
        const HTTP = 1 << 0;
        const HTTPS = 1 << 1;
        const FILE = 1 << 2;
        const FTP = 1 << 3;
        const CHROME_UI = 1 << 4;
        /// Accept any scheme, known or not.
        const ALL = u32::MAX;
    }
}

const KNOWN_SCHEMES: &[(&str, SchemeSet)] = &[
    ("http", SchemeSet::HTTP),
    ("https", SchemeSet::HTTPS),
    ("file", SchemeSet::FILE),
    ("ftp", SchemeSet::FTP),
    ("chrome", SchemeSet::CHROME_UI),
];

impl SchemeSet {
    /// Returns true when `scheme` is a member of this set.
    pub fn allows(self, scheme: &str) -> bool {
        if self == SchemeSet::ALL {
            return true;
        }
        KNOWN_SCHEMES
            .iter()
            .any(|(name, flag)| *name == scheme && self.contains(*flag))
    }
}

/// Pattern parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPatternError {
    MissingSchemeSeparator,
    InvalidScheme(String),
    MissingPath,
    EmptyHost,
    WildcardInHost,
    InvalidPath,
}

impl Display for UrlPatternError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSchemeSeparator => write!(f, "missing scheme separator '://'"),
            Self::InvalidScheme(scheme) => write!(f, "scheme '{scheme}' is not allowed"),
            Self::MissingPath => write!(f, "missing path after host"),
            Self::EmptyHost => write!(f, "host must not be empty"),
            Self::WildcardInHost => {
                write!(f, "'*' may only appear as the first host component")
            }
            Self::InvalidPath => write!(f, "path cannot be compiled"),
        }
    }
}

impl Error for UrlPatternError {}

/// Parsed URL match expression.
///
/// Two patterns are equal when they have the same scheme, host, subdomain
/// flag, path and sentinel form; the scheme set they were parsed under is
/// not compared.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    valid_schemes: SchemeSet,
    scheme: String,
    host: String,
    match_subdomains: bool,
    path: Glob,
    match_all_urls: bool,
}

impl UrlPattern {
    /// Parses `text` restricted to `valid_schemes`.
    pub fn parse(valid_schemes: SchemeSet, text: &str) -> Result<Self, UrlPatternError> {
        if text == ALL_URLS_PATTERN {
            return Ok(Self {
                valid_schemes,
                scheme: "*".to_string(),
                host: String::new(),
                match_subdomains: true,
                path: path_glob("/*")?,
                match_all_urls: true,
            });
        }

        let scheme_end = text
            .find(SCHEME_SEPARATOR)
            .ok_or(UrlPatternError::MissingSchemeSeparator)?;
        let mut pattern = Self::empty(valid_schemes)?;
        pattern.set_scheme(&text[..scheme_end])?;

        let host_start = scheme_end + SCHEME_SEPARATOR.len();
        // File URLs have no host; everything after the separator is path.
        let path_start = if pattern.scheme == "file" {
            host_start
        } else {
            let host_end = text[host_start..]
                .find('/')
                .map(|offset| host_start + offset)
                .ok_or(UrlPatternError::MissingPath)?;
            let raw_host = &text[host_start..host_end];
            let (match_subdomains, host) = match raw_host.strip_prefix('*') {
                Some("") => (true, ""),
                Some(rest) => match rest.strip_prefix('.') {
                    Some(rest) => (true, rest),
                    None => return Err(UrlPatternError::WildcardInHost),
                },
                None => (false, raw_host),
            };
            if host.contains('*') {
                return Err(UrlPatternError::WildcardInHost);
            }
            if host.is_empty() && !match_subdomains {
                return Err(UrlPatternError::EmptyHost);
            }
            pattern.match_subdomains = match_subdomains;
            pattern.host = host.to_ascii_lowercase();
            host_end
        };

        pattern.set_path(&text[path_start..])?;
        Ok(pattern)
    }

    /// Builds `*://*.<host>/*`: any scheme allowed by `valid_schemes`, the
    /// host and all of its subdomains, any path.
    pub fn for_host(valid_schemes: SchemeSet, host: &str) -> Result<Self, UrlPatternError> {
        if host.is_empty() {
            return Err(UrlPatternError::EmptyHost);
        }
        let mut pattern = Self::empty(valid_schemes)?;
        pattern.set_scheme("*")?;
        pattern.host = host.to_ascii_lowercase();
        pattern.match_subdomains = true;
        pattern.set_path("/*")?;
        Ok(pattern)
    }

    fn empty(valid_schemes: SchemeSet) -> Result<Self, UrlPatternError> {
        Ok(Self {
            valid_schemes,
            scheme: String::new(),
            host: String::new(),
            match_subdomains: false,
            path: path_glob("")?,
            match_all_urls: false,
        })
    }

    fn set_scheme(&mut self, scheme: &str) -> Result<(), UrlPatternError> {
        if scheme == "*" {
            self.valid_schemes &= SchemeSet::HTTP | SchemeSet::HTTPS;
        } else if !self.valid_schemes.allows(scheme) {
            return Err(UrlPatternError::InvalidScheme(scheme.to_string()));
        }
        self.scheme = scheme.to_string();
        Ok(())
    }

    pub fn valid_schemes(&self) -> SchemeSet {
        self.valid_schemes
    }

    /// Scheme text, `*` for "http or https".
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn match_subdomains(&self) -> bool {
        self.match_subdomains
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    pub fn set_path(&mut self, path: &str) -> Result<(), UrlPatternError> {
        self.path = path_glob(path)?;
        Ok(())
    }

    /// Widens the scheme set so `other`'s schemes are accepted too.
    pub(crate) fn merge_schemes(&mut self, other: SchemeSet) {
        self.valid_schemes |= other;
    }

    /// True only for patterns parsed from `<all_urls>`.
    pub fn match_all_urls(&self) -> bool {
        self.match_all_urls
    }

    /// True when the pattern covers every host of its schemes.
    pub fn matches_all_hosts(&self) -> bool {
        self.match_subdomains && self.host.is_empty()
    }

    /// Returns true when `scheme` is valid for this pattern and equal to its
    /// scheme (or the pattern scheme is `*`).
    pub fn matches_scheme(&self, scheme: &str) -> bool {
        if !self.valid_schemes.allows(scheme) {
            return false;
        }
        self.scheme == "*" || self.scheme == scheme
    }

    pub fn matches_url(&self, url: &Url) -> bool {
        if !self.matches_scheme(url.scheme()) {
            return false;
        }
        if self.match_all_urls {
            return true;
        }
        if !self.matches_host(url) {
            return false;
        }
        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        self.matches_path(&path)
    }

    pub fn matches_host(&self, url: &Url) -> bool {
        let test_host = url.host_str().unwrap_or("");
        if test_host == self.host {
            return true;
        }
        if self.matches_all_hosts() {
            return true;
        }
        if !self.match_subdomains {
            return false;
        }
        // No subdomain matching against IP literals.
        if matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_))) {
            return false;
        }
        if test_host.len() <= self.host.len() + 1 {
            return false;
        }
        test_host.ends_with(self.host.as_str())
            && test_host.as_bytes()[test_host.len() - self.host.len() - 1] == b'.'
    }

    pub fn matches_path(&self, path: &str) -> bool {
        self.path.is_match(path)
    }
}

fn path_glob(path: &str) -> Result<Glob, UrlPatternError> {
    Glob::new(path, GlobSyntax::Star).map_err(|_| UrlPatternError::InvalidPath)
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.match_all_urls == other.match_all_urls
            && self.scheme == other.scheme
            && self.host == other.host
            && self.match_subdomains == other.match_subdomains
            && self.path == other.path
    }
}

impl Eq for UrlPattern {}

impl Hash for UrlPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.match_all_urls.hash(state);
        self.scheme.hash(state);
        self.host.hash(state);
        self.match_subdomains.hash(state);
        self.path.hash(state);
    }
}

impl Display for UrlPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.match_all_urls {
            return write!(f, "{ALL_URLS_PATTERN}");
        }
        write!(f, "{}{}", self.scheme, SCHEME_SEPARATOR)?;
        if self.match_subdomains {
            write!(f, "*")?;
            if !self.host.is_empty() {
                write!(f, ".")?;
            }
        }
        write!(f, "{}{}", self.host, self.path.as_str())
    }
}

/// Ordered set of patterns, as used for web extents and effective hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPatternSet {
    patterns: Vec<UrlPattern>,
}

impl UrlPatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `pattern` unless an equal one is already present, in which case
    /// the kept pattern also accepts the new one's schemes.
    pub fn add_pattern(&mut self, pattern: UrlPattern) {
        match self.patterns.iter_mut().find(|kept| **kept == pattern) {
            Some(kept) => kept.merge_schemes(pattern.valid_schemes),
            None => self.patterns.push(pattern),
        }
    }

    pub fn patterns(&self) -> &[UrlPattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn contains_url(&self, url: &Url) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches_url(url))
    }
}

impl FromIterator<UrlPattern> for UrlPatternSet {
    fn from_iter<I: IntoIterator<Item = UrlPattern>>(iter: I) -> Self {
        let mut set = Self::new();
        for pattern in iter {
            set.add_pattern(pattern);
        }
        set
    }
}

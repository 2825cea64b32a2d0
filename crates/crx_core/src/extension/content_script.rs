//! Content script declarations.
//!
//! # Responsibility
//! - Parse one `content_scripts[i]` entry into a `ContentScript`.
//! - Decide whether a script applies to a page URL (patterns plus globs).
//!
//! # Invariants
//! - A loaded script has at least one match pattern and at least one js or
//!   css file.
//! - Match patterns only use content-script schemes (http, https, file, ftp).

use serde_json::{Map, Value};
use url::Url;

use crate::error::{ManifestError, PatternRejection};

use super::glob::{Glob, GlobSyntax};
use super::manifest_keys as keys;
use super::resource::{ExtensionResource, ResourceResolver};
use super::url_pattern::{SchemeSet, UrlPattern};

/// Schemes a content script may be injected into.
pub fn content_script_schemes() -> SchemeSet {
    SchemeSet::HTTP | SchemeSet::HTTPS | SchemeSet::FILE | SchemeSet::FTP
}

/// Point in page load at which a script runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunLocation {
    DocumentStart,
    DocumentEnd,
    #[default]
    DocumentIdle,
}

impl RunLocation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            keys::RUN_AT_DOCUMENT_START => Some(Self::DocumentStart),
            keys::RUN_AT_DOCUMENT_END => Some(Self::DocumentEnd),
            keys::RUN_AT_DOCUMENT_IDLE => Some(Self::DocumentIdle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DocumentStart => keys::RUN_AT_DOCUMENT_START,
            Self::DocumentEnd => keys::RUN_AT_DOCUMENT_END,
            Self::DocumentIdle => keys::RUN_AT_DOCUMENT_IDLE,
        }
    }
}

/// A js or css file injected by a content script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub resource: ExtensionResource,
    pub url: Url,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentScript {
    pub run_location: RunLocation,
    pub match_all_frames: bool,
    pub emulate_greasemonkey: bool,
    pub url_patterns: Vec<UrlPattern>,
    pub include_globs: Vec<Glob>,
    pub exclude_globs: Vec<Glob>,
    pub js: Vec<ScriptFile>,
    pub css: Vec<ScriptFile>,
}

impl ContentScript {
    /// Returns true when the script should run on `url`.
    pub fn matches_url(&self, url: &Url) -> bool {
        if !self.url_patterns.iter().any(|pattern| pattern.matches_url(url)) {
            return false;
        }
        let spec = url.as_str();
        if !self.include_globs.is_empty()
            && !self.include_globs.iter().any(|glob| glob.is_match(spec))
        {
            return false;
        }
        !self.exclude_globs.iter().any(|glob| glob.is_match(spec))
    }
}

/// Parses `content_scripts[index]`.
pub(crate) fn load_content_script(
    value: &Value,
    index: usize,
    resolver: &ResourceResolver,
) -> Result<ContentScript, ManifestError> {
    let entry = value
        .as_object()
        .ok_or(ManifestError::InvalidContentScript(index))?;
    let mut script = ContentScript::default();

    if let Some(run_at) = entry.get(keys::RUN_AT) {
        script.run_location = run_at
            .as_str()
            .and_then(RunLocation::parse)
            .ok_or(ManifestError::InvalidRunAt(index))?;
    }

    if let Some(all_frames) = entry.get(keys::ALL_FRAMES) {
        script.match_all_frames = all_frames
            .as_bool()
            .ok_or(ManifestError::InvalidAllFrames(index))?;
    }

    let matches = entry
        .get(keys::MATCHES)
        .and_then(Value::as_array)
        .ok_or(ManifestError::InvalidMatches(index))?;
    if matches.is_empty() {
        return Err(ManifestError::InvalidMatchCount(index));
    }
    for (match_index, item) in matches.iter().enumerate() {
        let text = item.as_str().ok_or(ManifestError::InvalidMatch {
            script: index,
            index: match_index,
            reason: PatternRejection::NotAString,
        })?;
        let pattern = UrlPattern::parse(content_script_schemes(), text).map_err(|err| {
            ManifestError::InvalidMatch {
                script: index,
                index: match_index,
                reason: PatternRejection::Malformed(err),
            }
        })?;
        script.url_patterns.push(pattern);
    }

    script.include_globs = load_globs(entry, index, keys::INCLUDE_GLOBS)?;
    script.exclude_globs = load_globs(entry, index, keys::EXCLUDE_GLOBS)?;

    let js = optional_list(entry, keys::JS).map_err(|_| ManifestError::InvalidJsList(index))?;
    let css = optional_list(entry, keys::CSS).map_err(|_| ManifestError::InvalidCssList(index))?;
    if js.len() + css.len() == 0 {
        return Err(ManifestError::MissingFile(index));
    }

    for (file_index, item) in js.iter().enumerate() {
        let invalid = ManifestError::InvalidJs {
            script: index,
            index: file_index,
        };
        script.js.push(load_script_file(item, resolver).ok_or(invalid)?);
    }
    for (file_index, item) in css.iter().enumerate() {
        let invalid = ManifestError::InvalidCss {
            script: index,
            index: file_index,
        };
        script.css.push(load_script_file(item, resolver).ok_or(invalid)?);
    }

    Ok(script)
}

fn load_globs(
    entry: &Map<String, Value>,
    index: usize,
    key: &'static str,
) -> Result<Vec<Glob>, ManifestError> {
    let Some(value) = entry.get(key) else {
        return Ok(Vec::new());
    };
    let list = value
        .as_array()
        .ok_or(ManifestError::InvalidGlobList { script: index, key })?;
    list.iter()
        .enumerate()
        .map(|(glob_index, item)| {
            item.as_str()
                .and_then(|text| Glob::new(text, GlobSyntax::StarAndQuestion).ok())
                .ok_or(ManifestError::InvalidGlob {
                    script: index,
                    key,
                    index: glob_index,
                })
        })
        .collect()
}

fn optional_list<'a>(entry: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], ()> {
    match entry.get(key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(()),
    }
}

fn load_script_file(value: &Value, resolver: &ResourceResolver) -> Option<ScriptFile> {
    let relative = value.as_str()?;
    Some(ScriptFile {
        resource: resolver.resource(relative),
        url: resolver.resource_url(relative)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{load_content_script, RunLocation};
    use crate::error::{ManifestError, PatternRejection};
    use crate::extension::resource::ResourceResolver;
    use crate::extension::url_pattern::UrlPatternError;
    use serde_json::json;
    use url::Url;

    fn resolver() -> ResourceResolver {
        ResourceResolver::new("aaaaaaaaaabbbbbbbbbbccccccccccdd", "/ext").expect("resolver")
    }

    #[test]
    fn loads_full_entry() {
        let entry = json!({
            "matches": ["http://*.example.com/*", "file:///*"],
            "run_at": "document_start",
            "all_frames": true,
            "include_globs": ["*news*"],
            "js": ["a.js", "/b.js"],
            "css": ["s.css"]
        });
        let script = load_content_script(&entry, 0, &resolver()).expect("load");
        assert_eq!(script.run_location, RunLocation::DocumentStart);
        assert!(script.match_all_frames);
        assert_eq!(script.url_patterns.len(), 2);
        assert_eq!(
            script
                .include_globs
                .iter()
                .map(|glob| glob.as_str())
                .collect::<Vec<_>>(),
            vec!["*news*"]
        );
        assert_eq!(script.js.len(), 2);
        assert_eq!(script.js[1].url.path(), "/b.js");
        assert_eq!(script.css[0].resource.relative_path(), "s.css");
    }

    #[test]
    fn defaults_to_document_idle() {
        let entry = json!({"matches": ["http://a.com/*"], "js": ["a.js"]});
        let script = load_content_script(&entry, 0, &resolver()).expect("load");
        assert_eq!(script.run_location, RunLocation::DocumentIdle);
        assert!(!script.match_all_frames);
    }

    #[test]
    fn reports_indexed_failures() {
        let r = resolver();
        let err = load_content_script(&json!({"js": ["a.js"]}), 3, &r).expect_err("no matches");
        assert_eq!(err, ManifestError::InvalidMatches(3));

        let err = load_content_script(&json!({"matches": [], "js": ["a.js"]}), 1, &r)
            .expect_err("empty matches");
        assert_eq!(err, ManifestError::InvalidMatchCount(1));

        let err = load_content_script(
            &json!({"matches": ["http://a.com/*", "chrome://x/*"], "js": ["a.js"]}),
            2,
            &r,
        )
        .expect_err("bad scheme");
        assert_eq!(
            err,
            ManifestError::InvalidMatch {
                script: 2,
                index: 1,
                reason: PatternRejection::Malformed(UrlPatternError::InvalidScheme(
                    "chrome".to_string()
                )),
            }
        );

        let err = load_content_script(&json!({"matches": ["http://a.com/*"]}), 0, &r)
            .expect_err("no files");
        assert_eq!(err, ManifestError::MissingFile(0));

        let err = load_content_script(
            &json!({"matches": ["http://a.com/*"], "js": ["a.js", 7]}),
            0,
            &r,
        )
        .expect_err("non-string js");
        assert_eq!(err, ManifestError::InvalidJs { script: 0, index: 1 });

        let err = load_content_script(
            &json!({"matches": ["http://a.com/*"], "js": ["a.js"], "run_at": "later"}),
            0,
            &r,
        )
        .expect_err("bad run_at");
        assert_eq!(err, ManifestError::InvalidRunAt(0));
    }

    #[test]
    fn globs_filter_matching_urls() {
        let entry = json!({
            "matches": ["http://*/*"],
            "include_globs": ["http://*.example.com/*"],
            "exclude_globs": ["*private*"],
            "js": ["a.js"]
        });
        let script = load_content_script(&entry, 0, &resolver()).expect("load");
        let url = |s: &str| Url::parse(s).expect("url");
        assert!(script.matches_url(&url("http://www.example.com/news")));
        assert!(!script.matches_url(&url("http://www.example.com/private/1")));
        assert!(!script.matches_url(&url("http://other.org/")));
        assert!(!script.matches_url(&url("https://www.example.com/news")));
    }

    #[test]
    fn question_mark_globs_match_one_character() {
        let entry = json!({
            "matches": ["http://*/*"],
            "include_globs": ["http://a.com/v?/*"],
            "js": ["a.js"]
        });
        let script = load_content_script(&entry, 0, &resolver()).expect("load");
        let url = |s: &str| Url::parse(s).expect("url");
        assert!(script.matches_url(&url("http://a.com/v1/page")));
        assert!(!script.matches_url(&url("http://a.com/v10/page")));
    }
}

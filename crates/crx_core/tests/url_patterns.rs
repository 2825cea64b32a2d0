use crx_core::{SchemeSet, UrlPattern, UrlPatternError};
use url::Url;

fn url(text: &str) -> Url {
    Url::parse(text).expect("test url")
}

#[test]
fn all_urls_matches_every_allowed_scheme() {
    let schemes = SchemeSet::HTTP | SchemeSet::HTTPS | SchemeSet::FILE | SchemeSet::FTP;
    let pattern = UrlPattern::parse(schemes, "<all_urls>").expect("all urls");
    assert!(pattern.match_all_urls());
    assert!(pattern.matches_all_hosts());
    for candidate in [
        "http://a.com/",
        "https://b.org/deep/path?q=1",
        "file:///tmp/x.html",
        "ftp://files.example.com/pub",
    ] {
        assert!(pattern.matches_url(&url(candidate)), "{candidate}");
    }
    assert!(!pattern.matches_url(&url("chrome://settings/")));
    assert_eq!(pattern.to_string(), "<all_urls>");
}

#[test]
fn subdomain_wildcard_matches_domain_and_children() {
    let pattern =
        UrlPattern::parse(SchemeSet::HTTP | SchemeSet::HTTPS, "*://*.example.com/*").expect("pattern");
    assert!(pattern.matches_url(&url("http://a.b.example.com/x")));
    assert!(pattern.matches_url(&url("https://example.com/")));
    assert!(!pattern.matches_url(&url("http://otherexample.com/")));
    assert!(!pattern.match_all_urls());
}

#[test]
fn path_globs_are_anchored() {
    let pattern = UrlPattern::parse(SchemeSet::HTTP, "http://a.com/foo*bar").expect("pattern");
    assert!(pattern.matches_url(&url("http://a.com/foobar")));
    assert!(pattern.matches_url(&url("http://a.com/foo/baz/bar")));
    assert!(!pattern.matches_url(&url("http://a.com/foobarbaz")));
    assert!(!pattern.matches_url(&url("http://a.com/xfoobar")));

    let exact = UrlPattern::parse(SchemeSet::HTTP, "http://a.com/page").expect("pattern");
    assert!(!exact.matches_url(&url("http://a.com/page/more")));
}

#[test]
fn scheme_must_be_in_mask() {
    assert_eq!(
        UrlPattern::parse(SchemeSet::HTTP, "https://a.com/*").expect_err("https not allowed"),
        UrlPatternError::InvalidScheme("https".to_string())
    );
    let pattern = UrlPattern::parse(SchemeSet::HTTP, "*://a.com/*").expect("wildcard scheme");
    assert!(pattern.matches_url(&url("http://a.com/")));
    assert!(!pattern.matches_url(&url("https://a.com/")));
}

#[test]
fn malformed_patterns_are_rejected() {
    let schemes = SchemeSet::HTTP | SchemeSet::HTTPS;
    assert_eq!(
        UrlPattern::parse(schemes, "http:/a.com/").expect_err("separator"),
        UrlPatternError::MissingSchemeSeparator
    );
    assert_eq!(
        UrlPattern::parse(schemes, "http://a.com").expect_err("path"),
        UrlPatternError::MissingPath
    );
    assert_eq!(
        UrlPattern::parse(schemes, "http:///").expect_err("host"),
        UrlPatternError::EmptyHost
    );
    assert_eq!(
        UrlPattern::parse(schemes, "http://a.*.com/").expect_err("wildcard in host"),
        UrlPatternError::WildcardInHost
    );
}

#[test]
fn any_host_pattern() {
    let pattern = UrlPattern::parse(SchemeSet::HTTP, "http://*/*").expect("pattern");
    assert!(pattern.matches_all_hosts());
    assert!(pattern.matches_url(&url("http://anything.test/x")));
    assert!(pattern.matches_url(&url("http://127.0.0.1/")));
}

#[test]
fn file_patterns_have_no_host() {
    let pattern = UrlPattern::parse(SchemeSet::FILE, "file:///home/*").expect("pattern");
    assert_eq!(pattern.host(), "");
    assert!(pattern.matches_url(&url("file:///home/user/a.html")));
    assert!(!pattern.matches_url(&url("file:///etc/passwd")));
}

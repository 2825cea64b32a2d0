use crx_core::extension::app::LaunchContainer;
use crx_core::extension::content_script::RunLocation;
use crx_core::extension::icons::IconMatch;
use crx_core::{
    load_extension, ErrorCategory, Extension, LoadRequest, LoaderConfig, Location, ManifestError,
    ManifestLoader, PatternRejection,
};
use serde_json::{json, Value};
use url::Url;

fn request() -> LoadRequest {
    LoadRequest::new("/extensions/sample", Location::Internal)
}

fn load(manifest: Value) -> Result<Extension, ManifestError> {
    load_extension(&manifest, &request(), &LoaderConfig::default())
}

fn experimental_config() -> LoaderConfig {
    LoaderConfig {
        experimental_apis_enabled: true,
        ..LoaderConfig::default()
    }
}

#[test]
fn api_and_host_permissions_are_split() {
    let extension = load(json!({
        "name": "A",
        "version": "1.0",
        "permissions": ["tabs", "http://*.google.com/*"]
    }))
    .expect("manifest should load");

    assert_eq!(
        extension.api_permissions().iter().collect::<Vec<_>>(),
        vec!["tabs"]
    );
    assert_eq!(extension.host_permissions().len(), 1);
    let host = &extension.host_permissions()[0];
    assert_eq!(host.host(), "google.com");
    assert!(host.match_subdomains());
    assert_eq!(host.path(), "/*");
}

#[test]
fn host_permission_paths_are_normalized() {
    let extension = load(json!({
        "name": "A",
        "version": "1",
        "permissions": ["http://a.com/only/this/page.html"]
    }))
    .expect("manifest should load");
    assert_eq!(extension.host_permissions()[0].path(), "/*");
    assert!(extension.has_host_permission(&Url::parse("http://a.com/other").expect("url")));
}

#[test]
fn legacy_permission_names_are_remapped() {
    let extension = load(json!({
        "name": "A",
        "version": "1",
        "permissions": ["unlimited_storage", "webstorePrivate"]
    }))
    .expect("manifest should load");
    assert!(extension.api_permissions().contains("unlimitedStorage"));
    assert!(!extension.api_permissions().contains("webstorePrivate"));

    let component = load_extension(
        &json!({"name": "A", "version": "1", "permissions": ["webstorePrivate"]}),
        &LoadRequest::new("/extensions/sample", Location::Component),
        &LoaderConfig::default(),
    )
    .expect("component manifest should load");
    assert!(component.api_permissions().contains("webstorePrivate"));
}

#[test]
fn permission_failures_carry_their_index() {
    let err = load(json!({
        "name": "A",
        "version": "1",
        "permissions": ["tabs", "not a pattern"]
    }))
    .expect_err("malformed permission");
    assert!(matches!(
        err,
        ManifestError::InvalidPermission {
            index: 1,
            reason: PatternRejection::Malformed(_)
        }
    ));
    assert_eq!(err.index(), Some(1));
    assert_eq!(err.field(), "permissions");
    assert_eq!(err.category(), ErrorCategory::InvalidPattern);

    let err = load(json!({"name": "A", "version": "1", "permissions": [7]}))
        .expect_err("non-string permission");
    assert_eq!(
        err,
        ManifestError::InvalidPermission {
            index: 0,
            reason: PatternRejection::NotAString
        }
    );

    let err = load(json!({"name": "A", "version": "1", "permissions": "tabs"}))
        .expect_err("not a list");
    assert_eq!(err, ManifestError::InvalidPermissions);
}

#[test]
fn chrome_scheme_permissions_depend_on_location() {
    let favicon = load(json!({
        "name": "A",
        "version": "1",
        "permissions": ["chrome://favicon/"]
    }))
    .expect("favicon is allowed");
    assert_eq!(favicon.host_permissions()[0].host(), "favicon");

    let manifest = json!({"name": "A", "version": "1", "permissions": ["chrome://history/"]});
    assert_eq!(
        load(manifest.clone()).expect_err("chrome host is restricted"),
        ManifestError::InvalidPermissionScheme(0)
    );
    assert!(load_extension(
        &manifest,
        &LoadRequest::new("/extensions/sample", Location::Component),
        &LoaderConfig::default()
    )
    .is_ok());
}

#[test]
fn experimental_permission_needs_flag() {
    let manifest = json!({"name": "A", "version": "1", "permissions": ["experimental"]});
    assert!(matches!(
        load(manifest.clone()).expect_err("flag is off"),
        ManifestError::InvalidPermission { index: 0, .. }
    ));
    let extension =
        load_extension(&manifest, &request(), &experimental_config()).expect("flag is on");
    assert!(extension.api_permissions().contains("experimental"));
}

#[test]
fn page_action_and_browser_action_are_exclusive() {
    let err = load(json!({
        "name": "A",
        "version": "1",
        "page_action": {"default_title": "page"},
        "browser_action": {"default_title": "browser"}
    }))
    .expect_err("two UI surfaces");
    assert_eq!(err, ManifestError::OneUiSurfaceOnly);
    assert_eq!(err.category(), ErrorCategory::MutuallyExclusiveFeature);
}

#[test]
fn action_title_and_popup() {
    let extension = load(json!({
        "name": "Fallback",
        "version": "1",
        "browser_action": {"default_icon": "icon.png", "default_popup": "popup.html"}
    }))
    .expect("manifest should load");
    let action = extension.browser_action().expect("browser action");
    assert_eq!(action.title, "Fallback");
    assert_eq!(action.default_icon_path.as_deref(), Some("icon.png"));
    assert!(action.has_popup());

    let legacy = load(json!({
        "name": "A",
        "version": "1",
        "page_actions": [{"id": "legacy", "name": "Legacy", "popup": {"path": "p.html"}}]
    }))
    .expect("legacy page action");
    let action = legacy.page_action().expect("page action");
    assert_eq!(action.id.as_deref(), Some("legacy"));
    assert_eq!(action.title, "Legacy");
    assert!(action.has_popup());

    let empty_popup = load(json!({
        "name": "A",
        "version": "1",
        "browser_action": {"default_popup": ""}
    }))
    .expect("empty popup means no popup");
    assert!(!empty_popup.browser_action().expect("action").has_popup());

    assert_eq!(
        load(json!({
            "name": "A",
            "version": "1",
            "page_action": {"popup": "a.html", "default_popup": "b.html"}
        }))
        .expect_err("old and new popup keys"),
        ManifestError::InvalidPageActionOldAndNewKeys
    );

    assert_eq!(
        load(json!({"name": "A", "version": "1", "page_actions": [{}, {}]}))
            .expect_err("two legacy page actions"),
        ManifestError::InvalidPageActionsListSize
    );
}

#[test]
fn theme_cannot_carry_extension_keys() {
    let err = load(json!({
        "name": "T",
        "version": "1",
        "theme": {},
        "background": "bg.html"
    }))
    .expect_err("theme with extension key");
    assert_eq!(err, ManifestError::ThemesCannotContainExtensions);
}

#[test]
fn theme_loads_and_stops_early() {
    let extension = load(json!({
        "name": "T",
        "version": "1",
        "description": "dark",
        "theme": {
            "images": {"theme_frame": "frame.png"},
            "colors": {"frame": [10, 20, 30], "toolbar": [1, 2, 3, 0.5]},
            "tints": {"buttons": [0.1, 0.2, 1]},
            "properties": {"ntp_background_alignment": "bottom"}
        }
    }))
    .expect("theme should load");
    assert!(extension.is_theme());
    assert!(extension.browser_images().contains("frame.png"));
    assert!(extension.api_permissions().is_empty());

    assert_eq!(
        load(json!({"name": "T", "version": "1", "theme": {"colors": {"frame": [1, 2]}}}))
            .expect_err("two color components"),
        ManifestError::InvalidThemeColors
    );
    assert_eq!(
        load(json!({"name": "T", "version": "1", "theme": {"tints": {"buttons": [1, 2, 3, 4]}}}))
            .expect_err("four tint components"),
        ManifestError::InvalidThemeTints
    );
}

#[test]
fn icons_strip_leading_slash_and_reject_empty_paths() {
    let extension = load(json!({
        "name": "A",
        "version": "1",
        "icons": {"16": "/small.png", "128": "big.png", "99": "ignored.png"}
    }))
    .expect("manifest should load");
    assert_eq!(extension.icons().get(16, IconMatch::Exactly), Some("small.png"));
    assert_eq!(extension.icons().get(48, IconMatch::Bigger), Some("big.png"));
    assert_eq!(extension.icons().get(48, IconMatch::Exactly), None);
    assert_eq!(
        extension
            .icon_url(128, IconMatch::Exactly)
            .expect("icon url")
            .path(),
        "/big.png"
    );

    assert_eq!(
        load(json!({"name": "A", "version": "1", "icons": {"48": "/"}}))
            .expect_err("empty icon path"),
        ManifestError::InvalidIconPath("48".to_string())
    );
}

#[test]
fn content_scripts_are_parsed() {
    let extension = load(json!({
        "name": "A",
        "version": "1",
        "content_scripts": [{
            "matches": ["http://*.example.com/*"],
            "exclude_globs": ["*private*"],
            "js": ["script.js"],
            "css": ["style.css"],
            "run_at": "document_start"
        }]
    }))
    .expect("manifest should load");

    let script = &extension.content_scripts()[0];
    assert_eq!(script.run_location, RunLocation::DocumentStart);
    assert!(!script.match_all_frames);
    assert_eq!(script.js.len(), 1);
    assert_eq!(script.css.len(), 1);
    assert!(script.matches_url(&Url::parse("http://www.example.com/page").expect("url")));
    assert!(!script.matches_url(&Url::parse("http://www.example.com/private").expect("url")));
    assert_eq!(extension.effective_host_permissions().len(), 1);
}

#[test]
fn content_script_failures_are_indexed() {
    let err = load(json!({
        "name": "A",
        "version": "1",
        "content_scripts": [
            {"matches": ["http://a.com/*"], "js": ["a.js"]},
            {"matches": ["http://b.com/*"]}
        ]
    }))
    .expect_err("second script has no files");
    assert_eq!(err, ManifestError::MissingFile(1));
    assert_eq!(err.index(), Some(1));

    let err = load(json!({
        "name": "A",
        "version": "1",
        "content_scripts": [{"matches": ["http://a.com/*", "chrome://b/*"], "js": ["a.js"]}]
    }))
    .expect_err("chrome scheme is not scriptable");
    assert!(matches!(
        err,
        ManifestError::InvalidMatch {
            script: 0,
            index: 1,
            ..
        }
    ));
    assert_eq!(err.item_index(), Some(1));

    assert_eq!(
        load(json!({"name": "A", "version": "1", "content_scripts": [{"matches": [], "js": ["a.js"]}]}))
            .expect_err("no matches"),
        ManifestError::InvalidMatchCount(0)
    );
}

#[test]
fn converted_user_scripts_emulate_greasemonkey() {
    let extension = load(json!({
        "name": "A",
        "version": "1",
        "converted_from_user_script": true,
        "content_scripts": [{"matches": ["http://a.com/*"], "js": ["a.user.js"]}]
    }))
    .expect("manifest should load");
    let script = &extension.content_scripts()[0];
    assert!(script.emulate_greasemonkey);
    assert!(script.match_all_frames);
    assert!(extension.converted_from_user_script());
}

#[test]
fn hosted_app_with_extent_and_launch_url() {
    let extension = load(json!({
        "name": "App",
        "version": "1",
        "app": {
            "urls": ["http://app.example.com/path/"],
            "launch": {"web_url": "http://app.example.com/path/start", "container": "panel", "width": 640}
        },
        "permissions": ["notifications", "http://other.com/*"],
        "options_page": "https://app.example.com/options"
    }))
    .expect("hosted app should load");

    assert!(extension.is_app());
    assert!(extension.is_hosted_app());
    assert_eq!(extension.web_extent().len(), 1);
    assert_eq!(extension.web_extent().patterns()[0].path(), "/path/*");
    assert_eq!(extension.launch_container(), LaunchContainer::Panel);
    assert_eq!(extension.launch_width(), 640);
    assert!(extension.api_permissions().contains("notifications"));
    assert_eq!(extension.host_permissions().len(), 1);
    assert_eq!(
        extension.full_launch_url().expect("launch url").as_str(),
        "http://app.example.com/path/start"
    );
    assert_eq!(
        extension.options_url().expect("options").as_str(),
        "https://app.example.com/options"
    );
}

#[test]
fn hosted_app_rules() {
    assert_eq!(
        load(json!({
            "name": "App",
            "version": "1",
            "app": {"urls": ["http://a.com/"], "launch": {"web_url": "http://a.com/"}},
            "background_page": "bg.html"
        }))
        .expect_err("hybrid app"),
        ManifestError::HostedAppsCannotIncludeExtensionFeatures
    );
    assert_eq!(
        load(json!({
            "name": "App",
            "version": "1",
            "app": {"launch": {"web_url": "http://a.com/", "local_path": "main.html"}}
        }))
        .expect_err("two launch targets"),
        ManifestError::LaunchPathAndUrlAreExclusive
    );
    assert_eq!(
        load(json!({"name": "App", "version": "1", "app": {}}))
            .expect_err("no launch target"),
        ManifestError::LaunchUrlRequired
    );
    assert!(matches!(
        load(json!({
            "name": "App",
            "version": "1",
            "app": {"urls": ["http://a.com/x*"], "launch": {"web_url": "http://a.com/"}}
        }))
        .expect_err("wildcard path"),
        ManifestError::InvalidWebUrl {
            index: 0,
            reason: PatternRejection::WildcardPath
        }
    ));
    assert_eq!(
        load(json!({
            "name": "App",
            "version": "1",
            "app": {"urls": ["http://a.com/"], "launch": {"web_url": "http://a.com/"}},
            "options_page": "options.html"
        }))
        .expect_err("relative options page in hosted app"),
        ManifestError::InvalidOptionsPageInHostedApp
    );
    assert_eq!(
        load(json!({
            "name": "App",
            "version": "1",
            "app": {"launch": {"local_path": "main.html", "container": "tab", "width": 10}}
        }))
        .expect_err("tab has no width"),
        ManifestError::InvalidLaunchWidthContainer
    );
}

#[test]
fn launch_web_url_implies_extent() {
    let extension = load(json!({
        "name": "App",
        "version": "1",
        "app": {"launch": {"web_url": "http://www.example.com/start"}}
    }))
    .expect("app should load");
    assert_eq!(extension.web_extent().len(), 1);
    assert!(extension
        .web_extent()
        .contains_url(&Url::parse("https://www.example.com/anything").expect("url")));
}

#[test]
fn apps_can_be_disabled() {
    let config = LoaderConfig {
        apps_enabled: false,
        ..LoaderConfig::default()
    };
    let err = load_extension(
        &json!({"name": "App", "version": "1", "app": {"launch": {"local_path": "a.html"}}}),
        &request(),
        &config,
    )
    .expect_err("apps are off");
    assert_eq!(err, ManifestError::AppsNotEnabled);
    assert_eq!(err.category(), ErrorCategory::OutOfPolicy);
}

#[test]
fn packaged_options_page_must_be_relative() {
    let extension = load(json!({"name": "A", "version": "1", "options_page": "options.html"}))
        .expect("manifest should load");
    assert_eq!(
        extension.options_url(),
        extension.resource_url("options.html").as_ref()
    );
    assert_eq!(
        load(json!({"name": "A", "version": "1", "options_page": "http://a.com/options"}))
            .expect_err("absolute url in package"),
        ManifestError::InvalidOptionsPageExpectUrlInPackage
    );
}

#[test]
fn url_overrides_allow_one_target() {
    let extension = load(json!({
        "name": "A",
        "version": "1",
        "chrome_url_overrides": {"newtab": "tab.html"}
    }))
    .expect("manifest should load");
    assert!(extension.chrome_url_overrides().contains_key("newtab"));

    assert_eq!(
        load(json!({
            "name": "A",
            "version": "1",
            "chrome_url_overrides": {"newtab": "tab.html", "history": "history.html"}
        }))
        .expect_err("two overrides"),
        ManifestError::MultipleOverrides
    );
    assert_eq!(
        load(json!({
            "name": "A",
            "version": "1",
            "chrome_url_overrides": {"downloads": "d.html"}
        }))
        .expect_err("unknown target"),
        ManifestError::InvalidChromeUrlOverrides
    );
}

#[test]
fn omnibox_and_devtools_need_experimental_permission() {
    let loader = ManifestLoader::new(experimental_config());
    assert_eq!(
        loader
            .load(
                &json!({"name": "A", "version": "1", "omnibox": {"keyword": "go"}}),
                &request()
            )
            .expect_err("omnibox without permission"),
        ManifestError::OmniboxExperimental
    );
    assert_eq!(
        loader
            .load(
                &json!({"name": "A", "version": "1", "devtools_page": "dev.html"}),
                &request()
            )
            .expect_err("devtools without permission"),
        ManifestError::DevToolsExperimental
    );

    let extension = loader
        .load(
            &json!({
                "name": "A",
                "version": "1",
                "permissions": ["experimental"],
                "omnibox": {"keyword": "go"},
                "devtools_page": "dev.html"
            }),
            &request(),
        )
        .expect("gated features with permission");
    assert_eq!(extension.omnibox_keyword(), Some("go"));
    assert!(extension.devtools_url().is_some());
}

#[test]
fn default_locale_must_be_non_empty() {
    assert_eq!(
        load(json!({"name": "A", "version": "1", "default_locale": ""}))
            .expect_err("empty locale"),
        ManifestError::InvalidDefaultLocale
    );
    let extension = load(json!({"name": "A", "version": "1", "default_locale": "en"}))
        .expect("manifest should load");
    assert_eq!(extension.default_locale(), Some("en"));
}

#[test]
fn public_key_determines_id() {
    let extension = load(json!({"name": "A", "version": "1", "key": "AAEC"}))
        .expect("manifest should load");
    assert_eq!(extension.id(), crx_core::generate_id(&[0, 1, 2]));
    assert_eq!(extension.public_key(), Some("AAEC"));
    assert_eq!(
        extension.url().as_str(),
        format!("chrome-extension://{}/", extension.id())
    );

    let pem = "-----BEGIN PUBLIC KEY-----\nAAEC\n-----END PUBLIC KEY-----";
    let wrapped = load(json!({"name": "A", "version": "1", "key": pem})).expect("pem key");
    assert_eq!(wrapped.id(), extension.id());

    assert_eq!(
        load(json!({"name": "A", "version": "1", "key": "!!!"})).expect_err("bad base64"),
        ManifestError::InvalidKey
    );
}

fn hosted_app_with_tabs() -> Value {
    json!({
        "name": "App",
        "version": "1",
        "app": {"urls": ["http://a.com/"], "launch": {"web_url": "http://a.com/"}},
        "permissions": ["notifications", "tabs"]
    })
}

#[test]
fn hosted_apps_only_take_hosted_app_permissions() {
    let err = load(hosted_app_with_tabs()).expect_err("tabs is not a hosted app permission");
    assert!(matches!(
        err,
        ManifestError::InvalidPermission {
            index: 1,
            reason: PatternRejection::Malformed(_)
        }
    ));
}

#[test]
fn component_hosted_apps_take_any_permission() {
    let extension = load_extension(
        &hosted_app_with_tabs(),
        &LoadRequest::new("/extensions/component_app", Location::Component),
        &LoaderConfig::default(),
    )
    .expect("component hosted app should load");
    assert!(extension.is_hosted_app());
    assert!(extension.api_permissions().contains("tabs"));
    assert!(extension.api_permissions().contains("notifications"));
}

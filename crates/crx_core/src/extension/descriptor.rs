//! Loaded extension descriptor.
//!
//! # Responsibility
//! - Hold everything the loader extracted from a manifest.
//! - Separate the mutable build state (`DraftExtension`) from the finished,
//!   read-only `Extension`.
//! - Answer permission questions about a finished descriptor.
//!
//! # Invariants
//! - Only `DraftExtension::seal` creates an `Extension`; the draft is
//!   consumed, so no writable handle survives a successful load.
//! - Effective host access is computed exactly once, during sealing.
//! - An `Extension` is immutable and cheap to clone across threads.
//!
//! # See also
//! - loader.rs for how a draft is populated.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use url::Url;

use crate::config::LoaderConfig;

use super::action::ExtensionAction;
use super::app::{AppSettings, LaunchContainer};
use super::content_script::ContentScript;
use super::domain::{DomainRegistry, StaticSuffixList};
use super::effective::{derive_effective_hosts, distinct_host_keys, distinct_hosts, has_effective_access_to_all_hosts};
use super::icons::{ExtensionIconSet, IconMatch};
use super::id::ExtensionId;
use super::location::Location;
use super::manifest_keys as keys;
use super::messages::{host_access_message, EnglishCatalog, MessageCatalog, MessageId, PermissionMessage};
use super::permissions::{can_access_pattern, has_api_permission, PermissionRegistry};
use super::resource::{ExtensionResource, ResourceResolver};
use super::theme::Theme;
use super::url_pattern::{UrlPattern, UrlPatternSet};
use super::version::Version;

/// Host that marks an update URL as served by the official gallery.
const GALLERY_UPDATE_DOMAIN: &str = "google.com";

/// NPAPI plugin shipped inside an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub path: PathBuf,
    pub is_public: bool,
}

/// Whether incognito windows share the regular profile's extension process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IncognitoMode {
    #[default]
    Spanning,
    Split,
}

impl IncognitoMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            keys::INCOGNITO_SPANNING => Some(Self::Spanning),
            keys::INCOGNITO_SPLIT => Some(Self::Split),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spanning => keys::INCOGNITO_SPANNING,
            Self::Split => keys::INCOGNITO_SPLIT,
        }
    }
}

/// Snapshot kept after an extension is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstalledExtensionInfo {
    pub extension_id: ExtensionId,
    pub extension_api_permissions: BTreeSet<String>,
    pub is_theme: bool,
    pub is_app: bool,
    pub converted_from_user_script: bool,
    pub update_url: Option<Url>,
}

/// Extension under construction. Exists only inside the loader.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DraftExtension {
    pub(crate) resolver: ResourceResolver,
    pub(crate) location: Location,
    pub(crate) manifest: Map<String, Value>,
    pub(crate) public_key: Option<String>,
    pub(crate) version: Version,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) update_url: Option<Url>,
    pub(crate) converted_from_user_script: bool,
    pub(crate) icons: ExtensionIconSet,
    pub(crate) theme: Option<Theme>,
    pub(crate) plugins: Vec<PluginInfo>,
    pub(crate) background_url: Option<Url>,
    pub(crate) toolstrips: Vec<Url>,
    pub(crate) content_scripts: Vec<ContentScript>,
    pub(crate) page_action: Option<ExtensionAction>,
    pub(crate) browser_action: Option<ExtensionAction>,
    pub(crate) is_app: bool,
    pub(crate) app: AppSettings,
    pub(crate) options_url: Option<Url>,
    pub(crate) api_permissions: BTreeSet<String>,
    pub(crate) host_permissions: Vec<UrlPattern>,
    pub(crate) default_locale: Option<String>,
    pub(crate) chrome_url_overrides: BTreeMap<String, Url>,
    pub(crate) omnibox_keyword: Option<String>,
    pub(crate) devtools_url: Option<Url>,
    pub(crate) incognito: IncognitoMode,
}

impl DraftExtension {
    pub(crate) fn new(
        resolver: ResourceResolver,
        location: Location,
        manifest: Map<String, Value>,
        version: Version,
        name: String,
    ) -> Self {
        Self {
            resolver,
            location,
            manifest,
            public_key: None,
            version,
            name,
            description: String::new(),
            update_url: None,
            converted_from_user_script: false,
            icons: ExtensionIconSet::new(),
            theme: None,
            plugins: Vec::new(),
            background_url: None,
            toolstrips: Vec::new(),
            content_scripts: Vec::new(),
            page_action: None,
            browser_action: None,
            is_app: false,
            app: AppSettings::default(),
            options_url: None,
            api_permissions: BTreeSet::new(),
            host_permissions: Vec::new(),
            default_locale: None,
            chrome_url_overrides: BTreeMap::new(),
            omnibox_keyword: None,
            devtools_url: None,
            incognito: IncognitoMode::Spanning,
        }
    }

    pub(crate) fn has_api_permission(&self, name: &str) -> bool {
        has_api_permission(&self.api_permissions, name)
    }

    pub(crate) fn is_hosted_app(&self) -> bool {
        self.is_app && !self.app.web_extent.is_empty()
    }

    /// Derives effective host access and freezes the descriptor.
    pub(crate) fn seal(self, permissions: &PermissionRegistry) -> Extension {
        let effective_host_permissions =
            derive_effective_hosts(&self.host_permissions, &self.content_scripts);
        let effective_all_hosts = has_effective_access_to_all_hosts(
            &self.api_permissions,
            &self.host_permissions,
            &self.content_scripts,
        );
        let warning_messages = permissions.warning_messages(&self.api_permissions);
        Extension {
            inner: Arc::new(SealedExtension {
                fields: self,
                effective_host_permissions,
                effective_all_hosts,
                warning_messages,
            }),
        }
    }
}

#[derive(Debug, PartialEq)]
struct SealedExtension {
    fields: DraftExtension,
    effective_host_permissions: UrlPatternSet,
    effective_all_hosts: bool,
    warning_messages: BTreeSet<MessageId>,
}

/// Validated, immutable extension descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    inner: Arc<SealedExtension>,
}

impl Extension {
    fn fields(&self) -> &DraftExtension {
        &self.inner.fields
    }

    pub fn id(&self) -> &str {
        self.fields().resolver.extension_id()
    }

    /// Extension root directory.
    pub fn path(&self) -> &Path {
        self.fields().resolver.root()
    }

    /// `chrome-extension://<id>/`.
    pub fn url(&self) -> &Url {
        self.fields().resolver.base_url()
    }

    pub fn location(&self) -> Location {
        self.fields().location
    }

    /// The manifest exactly as it was loaded.
    pub fn manifest(&self) -> &Map<String, Value> {
        &self.fields().manifest
    }

    /// Raw `key` value, when the manifest carries one.
    pub fn public_key(&self) -> Option<&str> {
        self.fields().public_key.as_deref()
    }

    pub fn version(&self) -> &Version {
        &self.fields().version
    }

    pub fn name(&self) -> &str {
        &self.fields().name
    }

    pub fn description(&self) -> &str {
        &self.fields().description
    }

    pub fn update_url(&self) -> Option<&Url> {
        self.fields().update_url.as_ref()
    }

    pub fn converted_from_user_script(&self) -> bool {
        self.fields().converted_from_user_script
    }

    pub fn icons(&self) -> &ExtensionIconSet {
        &self.fields().icons
    }

    pub fn is_theme(&self) -> bool {
        self.fields().theme.is_some()
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.fields().theme.as_ref()
    }

    pub fn plugins(&self) -> &[PluginInfo] {
        &self.fields().plugins
    }

    pub fn background_url(&self) -> Option<&Url> {
        self.fields().background_url.as_ref()
    }

    pub fn toolstrips(&self) -> &[Url] {
        &self.fields().toolstrips
    }

    pub fn content_scripts(&self) -> &[ContentScript] {
        &self.fields().content_scripts
    }

    pub fn page_action(&self) -> Option<&ExtensionAction> {
        self.fields().page_action.as_ref()
    }

    pub fn browser_action(&self) -> Option<&ExtensionAction> {
        self.fields().browser_action.as_ref()
    }

    pub fn is_app(&self) -> bool {
        self.fields().is_app
    }

    /// An app whose content lives on the web (non-empty extent).
    pub fn is_hosted_app(&self) -> bool {
        self.fields().is_hosted_app()
    }

    pub fn web_extent(&self) -> &UrlPatternSet {
        &self.fields().app.web_extent
    }

    pub fn launch_local_path(&self) -> Option<&str> {
        self.fields().app.launch_local_path.as_deref()
    }

    pub fn launch_web_url(&self) -> Option<&str> {
        self.fields().app.launch_web_url.as_deref()
    }

    pub fn launch_container(&self) -> LaunchContainer {
        self.fields().app.launch_container
    }

    pub fn launch_width(&self) -> u32 {
        self.fields().app.launch_width
    }

    pub fn launch_height(&self) -> u32 {
        self.fields().app.launch_height
    }

    pub fn options_url(&self) -> Option<&Url> {
        self.fields().options_url.as_ref()
    }

    pub fn api_permissions(&self) -> &BTreeSet<String> {
        &self.fields().api_permissions
    }

    pub fn host_permissions(&self) -> &[UrlPattern] {
        &self.fields().host_permissions
    }

    pub fn default_locale(&self) -> Option<&str> {
        self.fields().default_locale.as_deref()
    }

    pub fn chrome_url_overrides(&self) -> &BTreeMap<String, Url> {
        &self.fields().chrome_url_overrides
    }

    pub fn omnibox_keyword(&self) -> Option<&str> {
        self.fields().omnibox_keyword.as_deref()
    }

    pub fn devtools_url(&self) -> Option<&Url> {
        self.fields().devtools_url.as_ref()
    }

    pub fn incognito_mode(&self) -> IncognitoMode {
        self.fields().incognito
    }

    pub fn incognito_split_mode(&self) -> bool {
        self.fields().incognito == IncognitoMode::Split
    }

    pub fn effective_host_permissions(&self) -> &UrlPatternSet {
        &self.inner.effective_host_permissions
    }

    pub fn has_effective_access_to_all_hosts(&self) -> bool {
        self.inner.effective_all_hosts
    }

    /// Checks an API permission, function (`tabs.get`) or event
    /// (`tabs/onUpdated`) reference.
    pub fn has_api_permission(&self, function_name: &str) -> bool {
        self.fields().has_api_permission(function_name)
    }

    /// True when an explicit host permission matches `url`.
    pub fn has_host_permission(&self, url: &Url) -> bool {
        self.host_permissions()
            .iter()
            .any(|pattern| pattern.matches_url(url))
    }

    /// True when this extension's location allows `pattern` as a host
    /// permission.
    pub fn can_access_url(&self, pattern: &UrlPattern) -> bool {
        can_access_pattern(pattern, self.location())
    }

    pub fn resource(&self, relative_path: &str) -> ExtensionResource {
        self.fields().resolver.resource(relative_path)
    }

    pub fn resource_url(&self, relative_path: &str) -> Option<Url> {
        self.fields().resolver.resource_url(relative_path)
    }

    pub fn icon_resource(&self, size: u32, match_type: IconMatch) -> Option<ExtensionResource> {
        self.icons()
            .get(size, match_type)
            .map(|path| self.resource(path))
    }

    pub fn icon_url(&self, size: u32, match_type: IconMatch) -> Option<Url> {
        self.icons()
            .get(size, match_type)
            .and_then(|path| self.resource_url(path))
    }

    /// Relative paths of every image the browser may decode for this
    /// extension: icons, theme images and action icons.
    pub fn browser_images(&self) -> BTreeSet<String> {
        let mut images: BTreeSet<String> = self
            .icons()
            .iter()
            .map(|(_, path)| path.to_string())
            .collect();
        if let Some(theme) = self.theme() {
            images.extend(theme.image_paths().map(str::to_string));
        }
        for action in [self.page_action(), self.browser_action()].into_iter().flatten() {
            images.extend(action.icon_paths.iter().cloned());
            images.extend(action.default_icon_path.iter().cloned());
        }
        images
    }

    /// URL an app opens on launch.
    pub fn full_launch_url(&self) -> Option<Url> {
        if let Some(local_path) = self.launch_local_path() {
            return self.resource_url(local_path);
        }
        self.launch_web_url().and_then(|text| Url::parse(text).ok())
    }

    /// Gallery detail page, only for extensions updated from the gallery.
    pub fn gallery_url(&self, config: &LoaderConfig) -> Option<Url> {
        let host = self.update_url()?.host_str()?;
        let from_gallery = host == GALLERY_UPDATE_DOMAIN
            || host.ends_with(&format!(".{GALLERY_UPDATE_DOMAIN}"));
        if !from_gallery {
            return None;
        }
        Url::parse(&format!("{}/detail/{}", config.chrome_store_url(), self.id())).ok()
    }

    /// Distinct effective hosts using the built-in suffix list.
    pub fn distinct_hosts(&self) -> Vec<String> {
        self.distinct_hosts_with(StaticSuffixList::standard())
    }

    pub fn distinct_hosts_with(&self, registry: &dyn DomainRegistry) -> Vec<String> {
        distinct_hosts(self.effective_host_permissions().patterns(), registry)
    }

    /// Registered-domain keys of the effective hosts.
    pub fn distinct_host_keys_with(&self, registry: &dyn DomainRegistry) -> BTreeSet<String> {
        distinct_host_keys(self.effective_host_permissions().patterns(), registry)
    }

    /// Warnings produced by API permissions, deduplicated.
    pub fn simple_permission_messages(&self) -> BTreeSet<MessageId> {
        self.simple_permission_messages_with(&EnglishCatalog)
    }

    /// Like [`Self::simple_permission_messages`], dropping ids the catalog
    /// has no text for.
    pub fn simple_permission_messages_with(
        &self,
        catalog: &dyn MessageCatalog,
    ) -> BTreeSet<MessageId> {
        self.inner
            .warning_messages
            .iter()
            .copied()
            .filter(|id| is_visible(*id, catalog))
            .collect()
    }

    /// Install warnings: full access for plugins, otherwise the host
    /// summary followed by API permission warnings.
    pub fn permission_messages(&self) -> Vec<PermissionMessage> {
        self.permission_messages_with(StaticSuffixList::standard(), &EnglishCatalog)
    }

    pub fn permission_messages_with(
        &self,
        registry: &dyn DomainRegistry,
        catalog: &dyn MessageCatalog,
    ) -> Vec<PermissionMessage> {
        if !self.plugins().is_empty() {
            return vec![PermissionMessage::new(MessageId::WarningFullAccess)];
        }

        let mut messages = Vec::new();
        let hosts = self.distinct_hosts_with(registry);
        if let Some(host_message) =
            host_access_message(self.has_effective_access_to_all_hosts(), &hosts)
        {
            if is_visible(host_message.id, catalog) {
                messages.push(host_message);
            }
        }
        messages.extend(
            self.simple_permission_messages_with(catalog)
                .into_iter()
                .map(PermissionMessage::new),
        );
        messages
    }

    /// Permission messages rendered to display text.
    pub fn render_permission_messages(&self, catalog: &dyn MessageCatalog) -> Vec<String> {
        self.permission_messages_with(StaticSuffixList::standard(), catalog)
            .iter()
            .filter_map(|message| message.render(catalog))
            .collect()
    }

    pub fn uninstalled_info(&self) -> UninstalledExtensionInfo {
        UninstalledExtensionInfo {
            extension_id: self.id().to_string(),
            extension_api_permissions: self.api_permissions().clone(),
            is_theme: self.is_theme(),
            is_app: self.is_app(),
            converted_from_user_script: self.converted_from_user_script(),
            update_url: self.update_url().cloned(),
        }
    }
}

fn is_visible(id: MessageId, catalog: &dyn MessageCatalog) -> bool {
    catalog
        .lookup(id)
        .map(|text| !text.is_empty())
        .unwrap_or(false)
}

//! Extension-relative resources.
//!
//! # Responsibility
//! - Map a manifest-relative path to a resource handle under the
//!   extension root.
//! - Map a manifest-relative path to a `chrome-extension://<id>/` URL.
//!
//! # Invariants
//! - Resolution is pure; nothing here touches the filesystem.
//! - A leading `/` on a relative path is ignored.

use std::path::{Path, PathBuf};

use url::Url;

use super::id::ExtensionId;

pub const EXTENSION_SCHEME: &str = "chrome-extension";

/// File inside an extension, identified without touching the disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionResource {
    extension_id: ExtensionId,
    extension_root: PathBuf,
    relative_path: String,
}

impl ExtensionResource {
    pub fn new(
        extension_id: impl Into<ExtensionId>,
        extension_root: impl Into<PathBuf>,
        relative_path: impl Into<String>,
    ) -> Self {
        Self {
            extension_id: extension_id.into(),
            extension_root: extension_root.into(),
            relative_path: relative_path.into(),
        }
    }

    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    pub fn extension_root(&self) -> &Path {
        &self.extension_root
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Absolute-looking path of the file under the extension root.
    pub fn file_path(&self) -> PathBuf {
        self.extension_root
            .join(self.relative_path.trim_start_matches('/'))
    }
}

/// `chrome-extension://<id>/` for `id`.
pub fn extension_base_url(id: &str) -> Option<Url> {
    Url::parse(&format!("{EXTENSION_SCHEME}://{id}/")).ok()
}

/// Joins `relative_path` onto an extension base URL.
pub fn resolve_resource_url(base_url: &Url, relative_path: &str) -> Option<Url> {
    let mut spec = base_url.as_str().to_string();
    if !spec.ends_with('/') {
        spec.push('/');
    }
    spec.push_str(relative_path.trim_start_matches('/'));
    Url::parse(&spec).ok()
}

/// Resolves manifest paths for one extension during and after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResolver {
    extension_id: ExtensionId,
    root: PathBuf,
    base_url: Url,
}

impl ResourceResolver {
    /// Returns `None` when `extension_id` cannot form a base URL.
    pub fn new(extension_id: impl Into<ExtensionId>, root: impl Into<PathBuf>) -> Option<Self> {
        let extension_id = extension_id.into();
        let base_url = extension_base_url(&extension_id)?;
        Some(Self {
            extension_id,
            root: root.into(),
            base_url,
        })
    }

    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resource(&self, relative_path: &str) -> ExtensionResource {
        ExtensionResource::new(self.extension_id.clone(), self.root.clone(), relative_path)
    }

    pub fn resource_url(&self, relative_path: &str) -> Option<Url> {
        resolve_resource_url(&self.base_url, relative_path)
    }

    /// Returns true when `url` stays inside this extension's origin.
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.scheme() == self.base_url.scheme() && url.host_str() == self.base_url.host_str()
    }
}

//! Extension manifest model.
//!
//! Loading runs through `loader`; everything else here is either a piece the
//! loader assembles or a pure helper usable before any extension exists
//! (ids, URL patterns, versions).

pub mod action;
pub mod app;
pub mod content_script;
pub mod descriptor;
pub mod domain;
pub mod effective;
pub mod glob;
pub mod icons;
pub mod id;
pub mod loader;
pub mod location;
pub mod manifest_keys;
pub mod messages;
pub mod permissions;
pub mod privilege;
pub mod resource;
pub mod theme;
pub mod url_pattern;
pub mod version;

//! Common types shared by sources, the cache and the aggregators

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel version for a component that cannot exist for the requested release
pub const INCOMPATIBLE_VERSION: &str = "N/A";

/// Runtime/toolchain family a build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Forge,
    NeoForge,
    Fabric,
    Universal,
}

impl Loader {
    /// The loaders that own a matrix column
    pub const MATRIX: [Loader; 3] = [Loader::Forge, Loader::NeoForge, Loader::Fabric];

    pub fn as_str(&self) -> &'static str {
        match self {
            Loader::Forge => "forge",
            Loader::NeoForge => "neoforge",
            Loader::Fabric => "fabric",
            Loader::Universal => "universal",
        }
    }
}

/// One optional value per matrix loader. Serializes with all three keys present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderMap {
    pub forge: Option<String>,
    pub neoforge: Option<String>,
    pub fabric: Option<String>,
}

impl LoaderMap {
    /// Sets the slot for `loader`. `Universal` has no slot and is ignored.
    pub fn set(&mut self, loader: Loader, value: Option<String>) {
        match loader {
            Loader::Forge => self.forge = value,
            Loader::NeoForge => self.neoforge = value,
            Loader::Fabric => self.fabric = value,
            Loader::Universal => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.forge.is_none() && self.neoforge.is_none() && self.fabric.is_none()
    }
}

/// Resolved version of one component for one target release.
///
/// Always the terminal result of exactly one of: a successful resolution,
/// a compatibility rejection (`version == "N/A"`), or a failure (`version == None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub component_name: String,
    pub loader: Loader,
    pub version: Option<String>,
    /// Release the version was resolved for; differs from the request when a fallback was used
    pub target_release: String,
    pub source_url: String,
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_urls: Option<LoaderMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader_versions: Option<LoaderMap>,
    pub coordinates: Option<String>,
    pub notes: Option<String>,
    pub fallback_used: bool,
    pub cached_at: Option<DateTime<Utc>>,
}

impl VersionRecord {
    /// Creates a successfully resolved record
    pub fn resolved(
        component_name: &str,
        loader: Loader,
        version: String,
        target_release: &str,
        source_url: String,
    ) -> Self {
        Self {
            component_name: component_name.to_string(),
            loader,
            version: Some(version),
            target_release: target_release.to_string(),
            source_url,
            icon_url: None,
            download_urls: None,
            loader_versions: None,
            coordinates: None,
            notes: None,
            fallback_used: false,
            cached_at: None,
        }
    }

    /// Creates the record for a component rejected before any fetch
    pub fn incompatible(
        component_name: &str,
        loader: Loader,
        target_release: &str,
        minimum_release: &str,
        source_url: String,
    ) -> Self {
        Self {
            version: Some(INCOMPATIBLE_VERSION.to_string()),
            notes: Some(format!(
                "Not available for Minecraft {target_release}. Requires {minimum_release} or later."
            )),
            ..Self::resolved(component_name, loader, String::new(), target_release, source_url)
        }
    }

    /// Creates the record for a resolution that failed
    pub fn errored(
        component_name: &str,
        loader: Loader,
        target_release: &str,
        source_url: String,
        cause: &str,
    ) -> Self {
        Self {
            version: None,
            notes: Some(format!("Failed to fetch: {cause}")),
            ..Self::resolved(component_name, loader, String::new(), target_release, source_url)
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_icon(mut self, icon_url: Option<String>) -> Self {
        self.icon_url = icon_url;
        self
    }

    pub fn is_incompatible(&self) -> bool {
        self.version.as_deref() == Some(INCOMPATIBLE_VERSION)
    }

    pub fn is_error(&self) -> bool {
        self.version.is_none()
    }

    /// The version if it is a real one (neither failed nor the incompatibility sentinel)
    pub fn usable_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .filter(|v| *v != INCOMPATIBLE_VERSION && !v.is_empty())
    }
}

/// component -> target release -> per-loader version
pub type CompatibilityMatrix = IndexMap<String, IndexMap<String, LoaderMap>>;

/// Kind of a platform release in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
}

/// Entry of the platform release catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub id: String,
    pub version_type: ReleaseType,
    pub release_time: String,
}

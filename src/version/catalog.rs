//! Platform release catalog from the Minecraft version manifest

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::registries::fetch_document;
use crate::version::types::{ReleaseInfo, ReleaseType};

/// Cache key of the whole catalog
pub const CATALOG_CACHE_KEY: &str = "minecraft-versions";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    versions: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    id: String,
    #[serde(rename = "type")]
    version_type: ReleaseType,
    release_time: String,
}

impl From<ManifestEntry> for ReleaseInfo {
    fn from(entry: ManifestEntry) -> Self {
        Self {
            id: entry.id,
            version_type: entry.version_type,
            release_time: entry.release_time,
        }
    }
}

pub struct ReleaseCatalog {
    fetcher: Arc<dyn HttpFetcher>,
    manifest_url: String,
}

impl ReleaseCatalog {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, manifest_url: &str) -> Self {
        Self {
            fetcher,
            manifest_url: manifest_url.to_string(),
        }
    }

    /// All releases in manifest order (newest first)
    pub async fn fetch_releases(&self) -> Result<Vec<ReleaseInfo>, RegistryError> {
        let response = fetch_document(
            self.fetcher.as_ref(),
            &self.manifest_url,
            "Minecraft version manifest",
        )
        .await?;

        let manifest: Manifest = response.json().inspect_err(|e| {
            warn!("Failed to parse Minecraft version manifest: {}", e);
        })?;

        if manifest.versions.is_empty() {
            return Err(RegistryError::InvalidResponse(
                "Minecraft version manifest lists no versions".to_string(),
            ));
        }

        info!("Fetched {} Minecraft versions", manifest.versions.len());
        Ok(manifest.versions.into_iter().map(ReleaseInfo::from).collect())
    }
}

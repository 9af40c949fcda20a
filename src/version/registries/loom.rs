//! Fabric Loom plugin version from the Fabric Maven metadata

use std::sync::Arc;

use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::metadata::parse_maven_metadata;
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::semver::latest_version;
use crate::version::types::{Loader, VersionRecord};

/// Source implementation for Fabric Loom. Only SNAPSHOT builds are considered.
pub struct LoomSource {
    fetcher: Arc<dyn HttpFetcher>,
    metadata_url: String,
    source_url: String,
    icon_url: Option<String>,
}

impl LoomSource {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        metadata_url: &str,
        source_url: String,
        icon_url: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            metadata_url: metadata_url.to_string(),
            source_url,
            icon_url,
        }
    }
}

#[async_trait::async_trait]
impl ComponentSource for LoomSource {
    fn label(&self) -> &'static str {
        "loom"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let response =
            fetch_document(self.fetcher.as_ref(), &self.metadata_url, "Loom metadata").await?;
        let metadata = parse_maven_metadata(&response.body);

        let snapshots: Vec<&String> = metadata
            .versions
            .iter()
            .filter(|v| v.contains("SNAPSHOT"))
            .collect();

        let version = latest_version(&snapshots).ok_or_else(|| {
            RegistryError::NoMatchingVersion("No Loom SNAPSHOT versions found".to_string())
        })?;

        Ok(VersionRecord::resolved(
            component,
            Loader::Fabric,
            version,
            target_release,
            self.source_url.clone(),
        )
        .with_notes("Fabric Loom Gradle plugin (SNAPSHOT)")
        .with_icon(self.icon_url.clone()))
    }
}

//! NeoForm version from the NeoForged Maven metadata

use std::sync::Arc;

use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::metadata::extract_version_tags;
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::semver::latest_version;
use crate::version::types::{Loader, VersionRecord};

/// Source implementation for NeoForm.
///
/// NeoForm versions are `<release>-<timestamp>`, so candidates are picked by
/// scanning `<version>` tags for the `<release>-` prefix.
pub struct NeoFormSource {
    fetcher: Arc<dyn HttpFetcher>,
    metadata_url: String,
    source_url: String,
    icon_url: Option<String>,
}

impl NeoFormSource {
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
impl ComponentSource for NeoFormSource {
    fn label(&self) -> &'static str {
        "neoform"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let response =
            fetch_document(self.fetcher.as_ref(), &self.metadata_url, "NeoForm metadata").await?;

        let prefix = format!("{target_release}-");
        let matching = extract_version_tags(&response.body, Some(&prefix));

        let version = latest_version(&matching).ok_or_else(|| {
            RegistryError::NoMatchingVersion(format!(
                "No NeoForm versions found for Minecraft {target_release}"
            ))
        })?;

        Ok(VersionRecord::resolved(
            component,
            Loader::Universal,
            version,
            target_release,
            self.source_url.clone(),
        )
        .with_icon(self.icon_url.clone()))
    }
}

//! ModDevGradle plugin version from the `<latest>` pointer of its Maven metadata

use std::sync::Arc;

use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::metadata::find_latest_tag;
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::types::{Loader, VersionRecord};

pub struct ModDevGradleSource {
    fetcher: Arc<dyn HttpFetcher>,
    metadata_url: String,
    source_url: String,
    icon_url: Option<String>,
}

impl ModDevGradleSource {
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
impl ComponentSource for ModDevGradleSource {
    fn label(&self) -> &'static str {
        "moddev-gradle"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let response = fetch_document(
            self.fetcher.as_ref(),
            &self.metadata_url,
            "ModDevGradle metadata",
        )
        .await?;

        let version = find_latest_tag(&response.body).ok_or_else(|| {
            RegistryError::InvalidResponse(
                "Could not find latest version in ModDevGradle XML".to_string(),
            )
        })?;

        Ok(VersionRecord::resolved(
            component,
            Loader::Universal,
            version,
            target_release,
            self.source_url.clone(),
        )
        .with_notes("Version-agnostic Gradle plugin")
        .with_icon(self.icon_url.clone()))
    }
}

//! Fabric loader version from the Fabric meta API

use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::types::{Loader, VersionRecord};

/// Entry of `GET /v2/versions/loader/<release>`, newest first
#[derive(Debug, Deserialize)]
struct LoaderEntry {
    loader: Option<LoaderInfo>,
}

#[derive(Debug, Deserialize)]
struct LoaderInfo {
    version: Option<String>,
}

/// Source implementation for the Fabric meta API
pub struct FabricLoaderSource {
    fetcher: Arc<dyn HttpFetcher>,
    base_url: String,
    icon_url: Option<String>,
}

impl FabricLoaderSource {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, base_url: &str, icon_url: Option<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.to_string(),
            icon_url,
        }
    }
}

#[async_trait::async_trait]
impl ComponentSource for FabricLoaderSource {
    fn label(&self) -> &'static str {
        "fabric-loader"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let url = format!("{}/{}", self.base_url, target_release);
        let response = fetch_document(
            self.fetcher.as_ref(),
            &url,
            &format!("Fabric loader list for Minecraft {target_release}"),
        )
        .await?;

        let entries: Vec<LoaderEntry> = response.json().inspect_err(|e| {
            warn!("Failed to parse Fabric loader response: {}", e);
        })?;

        let first = entries.into_iter().next().ok_or_else(|| {
            RegistryError::NoMatchingVersion("No Fabric loader data found".to_string())
        })?;

        let version = first
            .loader
            .and_then(|loader| loader.version)
            .ok_or_else(|| {
                RegistryError::InvalidResponse(
                    "Invalid Fabric loader response structure".to_string(),
                )
            })?;

        Ok(
            VersionRecord::resolved(component, Loader::Fabric, version, target_release, url)
                .with_icon(self.icon_url.clone()),
        )
    }
}

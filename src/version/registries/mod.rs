//! Source implementations, one per built-in component plus Modrinth for everything else

pub mod fabric_loader;
pub mod forge;
pub mod forge_gradle;
pub mod loom;
pub mod moddev_gradle;
pub mod modrinth;
pub mod neoforge;
pub mod neoform;
pub mod parchment;

pub use fabric_loader::FabricLoaderSource;
pub use forge::ForgeSource;
pub use forge_gradle::ForgeGradleSource;
pub use loom::LoomSource;
pub use moddev_gradle::ModDevGradleSource;
pub use modrinth::ModrinthSource;
pub use neoforge::NeoForgeSource;
pub use neoform::NeoFormSource;
pub use parchment::ParchmentSource;

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::warn;

use crate::config::ResolverConfig;
use crate::version::error::RegistryError;
use crate::version::http::{HttpFetcher, HttpResponse};
use crate::version::registry::{ComponentSource, SourceRegistry};

/// Registry with a dedicated source for every built-in component and
/// `third_party` as the default.
pub fn built_in_registry(
    fetcher: Arc<dyn HttpFetcher>,
    config: &ResolverConfig,
    third_party: Arc<dyn ComponentSource>,
) -> SourceRegistry {
    let endpoints = &config.endpoints;
    let urls = &config.source_urls;

    SourceRegistry::new(third_party)
        .with_source(
            "forge",
            Arc::new(ForgeSource::new(
                fetcher.clone(),
                &endpoints.forge_base,
                urls.icon_url("forge"),
            )),
        )
        .with_source(
            "neoforge",
            Arc::new(NeoForgeSource::new(
                fetcher.clone(),
                &endpoints.neoforge_metadata,
                urls.icon_url("neoforge"),
            )),
        )
        .with_source(
            "fabric-loader",
            Arc::new(FabricLoaderSource::new(
                fetcher.clone(),
                &endpoints.fabric_loader,
                urls.icon_url("fabric-loader"),
            )),
        )
        .with_source(
            "parchment",
            Arc::new(ParchmentSource::new(
                fetcher.clone(),
                &endpoints.parchment_metadata,
                &endpoints.parchment_source,
                config.fallback,
                urls.icon_url("parchment"),
            )),
        )
        .with_source(
            "neoform",
            Arc::new(NeoFormSource::new(
                fetcher.clone(),
                &endpoints.neoform_metadata,
                urls.source_url("neoform"),
                urls.icon_url("neoform"),
            )),
        )
        .with_source(
            "moddev-gradle",
            Arc::new(ModDevGradleSource::new(
                fetcher.clone(),
                &endpoints.moddev_gradle_metadata,
                urls.source_url("moddev-gradle"),
                urls.icon_url("moddev-gradle"),
            )),
        )
        .with_source(
            "forgegradle",
            Arc::new(ForgeGradleSource::new(
                fetcher.clone(),
                &endpoints.forgegradle_metadata,
                urls.source_url("forgegradle"),
                urls.icon_url("forgegradle"),
            )),
        )
        .with_source(
            "loom",
            Arc::new(LoomSource::new(
                fetcher,
                &endpoints.loom_metadata,
                urls.source_url("loom"),
                urls.icon_url("loom"),
            )),
        )
}

/// Fetch `url` and require a successful, non-empty response.
///
/// `what` names the upstream document in error messages.
pub(crate) async fn fetch_document(
    fetcher: &dyn HttpFetcher,
    url: &str,
    what: &str,
) -> Result<HttpResponse, RegistryError> {
    let response = fetcher.fetch(url).await?;

    if response.status == StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(format!("{what} ({url})")));
    }

    if !response.is_success() {
        warn!("{} returned status {}: {}", what, response.status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "{what} returned status {}",
            response.status
        )));
    }

    if response.body.trim().is_empty() {
        return Err(RegistryError::InvalidResponse(format!(
            "{what} returned an empty body"
        )));
    }

    Ok(response)
}

#[cfg(test)]
pub(crate) fn test_fetcher() -> Arc<dyn HttpFetcher> {
    Arc::new(
        crate::version::http::ReqwestFetcher::new(&crate::config::HttpConfig::default()).unwrap(),
    )
}

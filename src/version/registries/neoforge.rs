//! NeoForge version from the NeoForged Maven metadata

use std::sync::Arc;

use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::metadata::parse_maven_metadata;
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::semver::{latest_version, matches_version_prefix, release_prefix};
use crate::version::types::{Loader, VersionRecord};

/// Source implementation for NeoForge.
///
/// NeoForge versions drop the leading `1.` of the Minecraft release
/// (Minecraft 1.21.1 -> NeoForge 21.1.x).
pub struct NeoForgeSource {
    fetcher: Arc<dyn HttpFetcher>,
    metadata_url: String,
    icon_url: Option<String>,
}

impl NeoForgeSource {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        metadata_url: &str,
        icon_url: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            metadata_url: metadata_url.to_string(),
            icon_url,
        }
    }
}

#[async_trait::async_trait]
impl ComponentSource for NeoForgeSource {
    fn label(&self) -> &'static str {
        "neoforge"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let response =
            fetch_document(self.fetcher.as_ref(), &self.metadata_url, "NeoForge metadata").await?;
        let metadata = parse_maven_metadata(&response.body);

        let prefix = release_prefix(target_release);
        let matching: Vec<&String> = metadata
            .versions
            .iter()
            .filter(|v| matches_version_prefix(&prefix, v))
            .collect();

        let version = latest_version(&matching).ok_or_else(|| {
            RegistryError::NoMatchingVersion(format!(
                "No NeoForge version found for Minecraft {target_release}"
            ))
        })?;

        Ok(VersionRecord::resolved(
            component,
            Loader::NeoForge,
            version,
            target_release,
            self.metadata_url.clone(),
        )
        .with_icon(self.icon_url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::registries::test_fetcher;
    use mockito::Server;

    const METADATA: &str = r#"<metadata>
  <versioning>
    <latest>21.10.2-beta</latest>
    <versions>
      <version>21.1.1-beta</version>
      <version>21.1.9</version>
      <version>21.1.77</version>
      <version>21.10.2-beta</version>
      <version>21.0.167</version>
    </versions>
  </versioning>
</metadata>"#;

    async fn source_with_metadata(body: &str) -> (mockito::ServerGuard, mockito::Mock, NeoForgeSource) {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/neoforge/maven-metadata.xml")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
        let source = NeoForgeSource::new(
            test_fetcher(),
            &format!("{}/neoforge/maven-metadata.xml", server.url()),
            Some("/icons/neoforge.svg".to_string()),
        );
        (server, mock, source)
    }

    #[tokio::test]
    async fn resolve_picks_highest_version_on_segment_boundary() {
        let (_server, mock, source) = source_with_metadata(METADATA).await;

        let record = source.resolve("neoforge", "1.21.1").await.unwrap();

        mock.assert_async().await;
        // 21.10.2-beta must not be taken for 21.1
        assert_eq!(record.version.as_deref(), Some("21.1.77"));
        assert_eq!(record.loader, Loader::NeoForge);
        assert_eq!(record.icon_url.as_deref(), Some("/icons/neoforge.svg"));
        assert!(!record.fallback_used);
    }

    #[tokio::test]
    async fn resolve_fails_when_no_version_matches_release() {
        let (_server, mock, source) = source_with_metadata(METADATA).await;

        let result = source.resolve("neoforge", "1.20.4").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NoMatchingVersion(_))));
    }

    #[tokio::test]
    async fn resolve_fails_for_unparseable_metadata() {
        let (_server, mock, source) = source_with_metadata("<<<not xml").await;

        let result = source.resolve("neoforge", "1.21.1").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NoMatchingVersion(_))));
    }
}

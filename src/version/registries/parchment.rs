//! Parchment mappings, walking back through older releases when the
//! requested one has no published mappings yet

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::FallbackConfig;
use crate::version::error::RegistryError;
use crate::version::fallback::generate_fallback_candidates;
use crate::version::http::HttpFetcher;
use crate::version::metadata::parse_maven_metadata;
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::semver::latest_version;
use crate::version::types::{Loader, VersionRecord};

const UNSTABLE_MARKERS: &[&str] = &["nightly", "SNAPSHOT"];

/// Source implementation for Parchment.
///
/// Mappings are forwards compatible within a minor line, so when the
/// requested release has none the candidates from
/// [`generate_fallback_candidates`] are tried one after another.
pub struct ParchmentSource {
    fetcher: Arc<dyn HttpFetcher>,
    metadata_template: String,
    source_template: String,
    fallback: FallbackConfig,
    icon_url: Option<String>,
}

impl ParchmentSource {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        metadata_template: &str,
        source_template: &str,
        fallback: FallbackConfig,
        icon_url: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            metadata_template: metadata_template.to_string(),
            source_template: source_template.to_string(),
            fallback,
            icon_url,
        }
    }

    /// Latest stable mappings version published for exactly `release`
    async fn stable_version_for(&self, release: &str) -> Result<String, RegistryError> {
        let url = self.metadata_template.replace("{version}", release);
        let response = fetch_document(
            self.fetcher.as_ref(),
            &url,
            &format!("Parchment metadata for {release}"),
        )
        .await?;
        let metadata = parse_maven_metadata(&response.body);

        if metadata.is_empty() {
            return Err(RegistryError::NoMatchingVersion(format!(
                "No Parchment versions listed for {release}"
            )));
        }

        let stable: Vec<&String> = metadata
            .versions
            .iter()
            .filter(|v| !UNSTABLE_MARKERS.iter().any(|m| v.contains(m)))
            .collect();

        latest_version(&stable).ok_or_else(|| {
            RegistryError::NoMatchingVersion(format!(
                "Only nightly Parchment versions found for {release}"
            ))
        })
    }
}

#[async_trait::async_trait]
impl ComponentSource for ParchmentSource {
    fn label(&self) -> &'static str {
        "parchment"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        for candidate in generate_fallback_candidates(target_release, &self.fallback) {
            let version = match self.stable_version_for(&candidate).await {
                Ok(version) => version,
                Err(e) => {
                    warn!("Failed to fetch Parchment for {}: {}", candidate, e);
                    continue;
                }
            };

            let fallback_used = candidate != target_release;
            if fallback_used {
                debug!(
                    "Parchment for {} resolved through fallback release {}",
                    target_release, candidate
                );
            }

            let source_url = self.source_template.replace("{version}", &candidate);
            let mut record = VersionRecord::resolved(
                component,
                Loader::Universal,
                version,
                &candidate,
                source_url,
            )
            .with_icon(self.icon_url.clone());

            if fallback_used {
                record = record.with_notes(format!(
                    "Using Parchment mappings for {candidate} (forwards compatible)"
                ));
                record.fallback_used = true;
            }

            return Ok(record);
        }

        Err(RegistryError::FallbackExhausted(target_release.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::registries::test_fetcher;
    use mockito::{Server, ServerGuard};

    fn source_for(server: &ServerGuard) -> ParchmentSource {
        ParchmentSource::new(
            test_fetcher(),
            &format!("{}/parchment-{{version}}/maven-metadata.xml", server.url()),
            &format!("{}/parchment-{{version}}/", server.url()),
            FallbackConfig {
                previous_minors: 1,
                max_patch: 2,
            },
            Some("/icons/parchment.svg".to_string()),
        )
    }

    fn metadata(versions: &[&str]) -> String {
        let body: String = versions
            .iter()
            .map(|v| format!("<version>{v}</version>"))
            .collect();
        format!("<metadata><versioning><versions>{body}</versions></versioning></metadata>")
    }

    #[tokio::test]
    async fn resolve_uses_exact_release_when_available() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/parchment-1.21.1/maven-metadata.xml")
            .with_status(200)
            .with_body(metadata(&["2024.07.28", "2024.11.17", "2024.11.18-nightly-SNAPSHOT"]))
            .create_async()
            .await;

        let record = source_for(&server)
            .resolve("parchment", "1.21.1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(record.version.as_deref(), Some("2024.11.17"));
        assert_eq!(record.target_release, "1.21.1");
        assert!(!record.fallback_used);
        assert_eq!(record.notes, None);
        assert_eq!(record.source_url, format!("{}/parchment-1.21.1/", server.url()));
    }

    #[tokio::test]
    async fn resolve_falls_back_past_missing_and_nightly_only_releases() {
        let mut server = Server::new_async().await;
        let missing = server
            .mock("GET", "/parchment-1.21.3/maven-metadata.xml")
            .with_status(404)
            .create_async()
            .await;
        let nightly_only = server
            .mock("GET", "/parchment-1.21.2/maven-metadata.xml")
            .with_status(200)
            .with_body(metadata(&["2024.12.01-nightly-SNAPSHOT"]))
            .create_async()
            .await;
        let found = server
            .mock("GET", "/parchment-1.21.1/maven-metadata.xml")
            .with_status(200)
            .with_body(metadata(&["2024.11.17"]))
            .create_async()
            .await;

        let record = source_for(&server)
            .resolve("parchment", "1.21.3")
            .await
            .unwrap();

        missing.assert_async().await;
        nightly_only.assert_async().await;
        found.assert_async().await;
        assert_eq!(record.version.as_deref(), Some("2024.11.17"));
        assert_eq!(record.target_release, "1.21.1");
        assert!(record.fallback_used);
        assert_eq!(
            record.notes.as_deref(),
            Some("Using Parchment mappings for 1.21.1 (forwards compatible)")
        );
        assert_eq!(record.source_url, format!("{}/parchment-1.21.1/", server.url()));
    }

    #[tokio::test]
    async fn resolve_marks_pre_release_base_as_fallback() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/parchment-1.21.4/maven-metadata.xml")
            .with_status(200)
            .with_body(metadata(&["2025.01.05"]))
            .create_async()
            .await;

        let record = source_for(&server)
            .resolve("parchment", "1.21.4-pre1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(record.target_release, "1.21.4");
        assert!(record.fallback_used);
    }

    #[tokio::test]
    async fn resolve_fails_after_exhausting_candidates() {
        let mut server = Server::new_async().await;
        // 1.21.0 plus 1.20.2..=1.20.0
        let mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/parchment-.*".to_string()))
            .with_status(404)
            .expect(4)
            .create_async()
            .await;

        let result = source_for(&server).resolve("parchment", "1.21.0").await;

        mock.assert_async().await;
        match result {
            Err(RegistryError::FallbackExhausted(release)) => assert_eq!(release, "1.21.0"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

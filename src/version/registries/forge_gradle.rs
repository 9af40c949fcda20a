//! ForgeGradle version from the Forge Maven metadata

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::metadata::{find_latest_tag, parse_maven_metadata};
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::semver::{latest_version, leading_number};
use crate::version::types::{Loader, VersionRecord};

/// Source implementation for ForgeGradle.
///
/// The metadata's `<latest>` pointer has been seen lagging whole major
/// versions behind, so the highest listed version wins and the pointer is
/// only cross-checked.
pub struct ForgeGradleSource {
    fetcher: Arc<dyn HttpFetcher>,
    metadata_url: String,
    source_url: String,
    icon_url: Option<String>,
}

impl ForgeGradleSource {
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

/// Whether the leading major numbers of two versions differ
fn major_differs(a: &str, b: &str) -> bool {
    let major = |v: &str| leading_number(v.split(['.', '-']).next().unwrap_or_default());
    major(a) != major(b)
}

#[async_trait::async_trait]
impl ComponentSource for ForgeGradleSource {
    fn label(&self) -> &'static str {
        "forgegradle"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let response = fetch_document(
            self.fetcher.as_ref(),
            &self.metadata_url,
            "ForgeGradle metadata",
        )
        .await?;
        let metadata = parse_maven_metadata(&response.body);

        let mut seen = HashSet::new();
        let unique: Vec<&String> = metadata
            .versions
            .iter()
            .filter(|v| seen.insert(v.as_str()))
            .collect();

        let version = latest_version(&unique).ok_or_else(|| {
            RegistryError::NoMatchingVersion(
                "No versions found in ForgeGradle XML metadata".to_string(),
            )
        })?;

        if let Some(latest_tag) = find_latest_tag(&response.body)
            && major_differs(&latest_tag, &version)
        {
            warn!(
                "ForgeGradle <latest> tag contains '{}' but latest version is '{}'",
                latest_tag, version
            );
        }

        Ok(VersionRecord::resolved(
            component,
            Loader::Forge,
            version,
            target_release,
            self.source_url.clone(),
        )
        .with_notes("Latest version")
        .with_icon(self.icon_url.clone()))
    }
}

//! Third-party mods from the Modrinth API

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use futures::future::join_all;
use indexmap::IndexSet;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{LoaderTable, SourceUrlTable};
use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::types::{Loader, LoaderMap, VersionRecord};

/// Entry of `GET /project/<slug>/version`
#[derive(Debug, Clone, Deserialize)]
struct ModrinthVersion {
    version_number: String,
    #[serde(default)]
    date_published: String,
    #[serde(default)]
    loaders: Vec<String>,
    #[serde(default)]
    files: Vec<ModrinthFile>,
}

impl ModrinthVersion {
    fn published(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date_published).ok()
    }

    fn supports(&self, loader: Loader) -> bool {
        self.loaders.iter().any(|l| l == loader.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ModrinthFile {
    #[serde(default)]
    url: String,
    #[serde(default)]
    filename: String,
    #[serde(default)]
    primary: bool,
}

/// Subset of `GET /project/<slug>`
#[derive(Debug, Deserialize)]
struct ModrinthProject {
    icon_url: Option<String>,
}

/// Most recently published entry; the earliest listed wins a tie
fn latest_published<'a>(
    versions: impl IntoIterator<Item = &'a ModrinthVersion>,
) -> Option<&'a ModrinthVersion> {
    versions.into_iter().fold(None, |latest, current| match latest {
        Some(prev) if current.published() <= prev.published() => Some(prev),
        _ => Some(current),
    })
}

/// Download URL of `version` for `loader`.
///
/// Prefers a file named after the loader, then the primary file, then the first file.
fn download_for(version: &ModrinthVersion, loader: Loader) -> Option<String> {
    let named = version
        .files
        .iter()
        .filter(|f| !f.filename.is_empty() && !f.url.is_empty())
        .find(|f| {
            let filename = f.filename.to_lowercase();
            match loader {
                Loader::Forge => filename.contains("forge") && !filename.contains("neoforge"),
                Loader::NeoForge => filename.contains("neoforge"),
                Loader::Fabric => filename.contains("fabric"),
                Loader::Universal => false,
            }
        });

    named
        .or_else(|| version.files.iter().find(|f| f.primary))
        .or_else(|| version.files.first())
        .map(|f| f.url.clone())
}

/// Latest version number and download per matrix loader
fn per_loader(versions: &[ModrinthVersion]) -> (LoaderMap, LoaderMap) {
    let mut loader_versions = LoaderMap::default();
    let mut download_urls = LoaderMap::default();

    for loader in Loader::MATRIX {
        if let Some(latest) = latest_published(versions.iter().filter(|v| v.supports(loader))) {
            loader_versions.set(loader, Some(latest.version_number.clone()));
            download_urls.set(loader, download_for(latest, loader));
        }
    }

    (loader_versions, download_urls)
}

/// Default source: any component without a dedicated adapter is looked up
/// as a Modrinth project slug.
pub struct ModrinthSource {
    fetcher: Arc<dyn HttpFetcher>,
    api_base: String,
    loaders: LoaderTable,
    source_urls: SourceUrlTable,
}

impl ModrinthSource {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        api_base: &str,
        loaders: LoaderTable,
        source_urls: SourceUrlTable,
    ) -> Self {
        Self {
            fetcher,
            api_base: api_base.trim_end_matches('/').to_string(),
            loaders,
            source_urls,
        }
    }

    /// `{api}/{slug}` followed by `tail`, with the slug percent-encoded as a
    /// single path segment
    fn project_url(&self, slug: &str, tail: &[&str]) -> Result<Url, RegistryError> {
        let invalid = |e: String| RegistryError::InvalidResponse(format!("Invalid Modrinth URL: {e}"));
        let mut url = Url::parse(&self.api_base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid(self.api_base.clone()))?
            .pop_if_empty()
            .push(slug)
            .extend(tail);
        Ok(url)
    }

    /// `{api}/{slug}/version?game_versions=["<release>"]`
    fn versions_url(&self, slug: &str, release: &str) -> Result<Url, RegistryError> {
        let game_versions = serde_json::to_string(&[release])
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;
        let mut url = self.project_url(slug, &["version"])?;
        url.query_pairs_mut()
            .append_pair("game_versions", &game_versions);
        Ok(url)
    }

    async fn icon_url(&self, slug: &str) -> Option<String> {
        let url = self
            .project_url(slug, &[])
            .inspect_err(|e| warn!("Skipping icon of {}: {}", slug, e))
            .ok()?;
        let response = match self.fetcher.fetch(url.as_str()).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                debug!("Modrinth project {} returned status {}", slug, response.status);
                return None;
            }
            Err(e) => {
                warn!("Failed to fetch Modrinth project {}: {}", slug, e);
                return None;
            }
        };

        response
            .json::<ModrinthProject>()
            .inspect_err(|e| warn!("Failed to parse Modrinth project {}: {}", slug, e))
            .ok()
            .and_then(|project| project.icon_url)
    }

    /// Names among `projects` that Modrinth does not know.
    ///
    /// Names are trimmed and deduplicated first. Any answer other than a
    /// version array or a 404 fails the whole validation.
    pub async fn find_invalid_projects(
        &self,
        projects: &[String],
        release: &str,
    ) -> Result<Vec<String>, RegistryError> {
        let unique: IndexSet<&str> = projects
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();

        let checks = unique.into_iter().map(|project| async move {
            let url = self.versions_url(project, release)?;
            let response = self.fetcher.fetch(url.as_str()).await?;

            if response.status == StatusCode::NOT_FOUND {
                return Ok(Some(project.to_string()));
            }

            if !response.is_success() {
                return Err(RegistryError::InvalidResponse(format!(
                    "Unable to validate project \"{project}\" with Modrinth (status {})",
                    response.status
                )));
            }

            let payload: serde_json::Value = response.json()?;
            if !payload.is_array() {
                return Err(RegistryError::InvalidResponse(format!(
                    "Unexpected Modrinth response while validating project \"{project}\""
                )));
            }

            Ok::<_, RegistryError>(None)
        });

        join_all(checks)
            .await
            .into_iter()
            .filter_map(Result::transpose)
            .collect()
    }
}

#[async_trait::async_trait]
impl ComponentSource for ModrinthSource {
    fn label(&self) -> &'static str {
        "modrinth"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let url = self.versions_url(component, target_release)?;
        let what = format!("Modrinth versions of {component} for Minecraft {target_release}");

        let (versions_response, icon_url) = tokio::join!(
            fetch_document(self.fetcher.as_ref(), url.as_str(), &what),
            self.icon_url(component),
        );

        let versions: Vec<ModrinthVersion> = versions_response?.json().inspect_err(|e| {
            warn!("Failed to parse Modrinth versions of {}: {}", component, e);
        })?;

        let latest = latest_published(&versions).ok_or_else(|| {
            RegistryError::NoMatchingVersion(format!("No {component} versions available"))
        })?;

        let (loader_versions, download_urls) = per_loader(&versions);

        let mut record = VersionRecord::resolved(
            component,
            self.loaders.loader_for(component),
            latest.version_number.clone(),
            target_release,
            self.source_urls.source_url(component),
        )
        .with_icon(icon_url);
        record.coordinates = Some(format!(
            "maven.modrinth:{component}:{}",
            latest.version_number
        ));
        record.loader_versions = Some(loader_versions);
        record.download_urls = Some(download_urls);

        Ok(record)
    }
}

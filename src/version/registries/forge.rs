//! Forge version scraped from the per-release download page

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::version::error::RegistryError;
use crate::version::http::HttpFetcher;
use crate::version::registries::fetch_document;
use crate::version::registry::ComponentSource;
use crate::version::types::{Loader, VersionRecord};

static RECOMMENDED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Recommended:\s*([0-9.]+)").ok());
static LATEST: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"Latest:\s*([0-9.]+)").ok());

/// Source implementation for the Forge files site
pub struct ForgeSource {
    fetcher: Arc<dyn HttpFetcher>,
    base_url: String,
    icon_url: Option<String>,
}

impl ForgeSource {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, base_url: &str, icon_url: Option<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.to_string(),
            icon_url,
        }
    }
}

fn first_capture(pattern: &Option<Regex>, html: &str) -> Option<String> {
    pattern
        .as_ref()?
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Promoted version and the label it was published under
pub fn scrape_promoted_version(html: &str) -> Option<(String, &'static str)> {
    first_capture(&RECOMMENDED, html)
        .map(|v| (v, "Recommended"))
        .or_else(|| first_capture(&LATEST, html).map(|v| (v, "Latest")))
}

#[async_trait::async_trait]
impl ComponentSource for ForgeSource {
    fn label(&self) -> &'static str {
        "forge"
    }

    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let url = format!("{}/index_{}.html", self.base_url, target_release);
        let page = fetch_document(
            self.fetcher.as_ref(),
            &url,
            &format!("Forge page for Minecraft {target_release}"),
        )
        .await?;

        let (version, label) = scrape_promoted_version(&page.body)
            .ok_or_else(|| RegistryError::NoMatchingVersion("No Forge version found".to_string()))?;

        Ok(
            VersionRecord::resolved(component, Loader::Forge, version, target_release, url)
                .with_notes(label)
                .with_icon(self.icon_url.clone()),
        )
    }
}

//! Single-component resolution: gate, dispatch and cache

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::{CacheConfig, LoaderTable, ResolverConfig, SourceUrlTable, db_path};
use crate::version::cache::{Cache, CacheStore};
use crate::version::catalog::{CATALOG_CACHE_KEY, ReleaseCatalog};
use crate::version::compat::CompatibilityGate;
use crate::version::error::RegistryError;
use crate::version::facade::CacheFacade;
use crate::version::http::{HttpFetcher, ReqwestFetcher};
use crate::version::registries::{ModrinthSource, built_in_registry};
use crate::version::registry::SourceRegistry;
use crate::version::types::{ReleaseInfo, VersionRecord};

/// Cache key of one component resolution
pub fn cache_key(component: &str, target_release: &str) -> String {
    format!("dep:{component}:{target_release}")
}

/// Resolves components to [`VersionRecord`]s.
///
/// Every resolution runs the compatibility gate first, then the source
/// registered for the component, with the result cached per
/// `(component, requested release)`.
pub struct VersionResolver<S: CacheStore> {
    facade: CacheFacade<S>,
    gate: CompatibilityGate,
    sources: SourceRegistry,
    validator: Arc<ModrinthSource>,
    catalog: ReleaseCatalog,
    loaders: LoaderTable,
    source_urls: SourceUrlTable,
    cache_config: CacheConfig,
}

impl VersionResolver<Cache> {
    /// Production resolver: reqwest fetcher and the SQLite cache at [`db_path`].
    ///
    /// A cache that cannot be opened only disables caching.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, RegistryError> {
        let fetcher: Arc<dyn HttpFetcher> = Arc::new(ReqwestFetcher::new(&config.http)?);
        let store = if config.cache.enabled {
            open_store(&db_path())
        } else {
            None
        };

        Ok(Self::build(config, store, fetcher))
    }
}

fn open_store(path: &Path) -> Option<Arc<Cache>> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent).inspect_err(|e| {
            warn!("Failed to create data directory {:?}: {}", parent, e);
        });
    }

    Cache::new(path)
        .inspect_err(|e| error!("Failed to open cache, continuing without it: {}", e))
        .ok()
        .map(Arc::new)
}

impl<S: CacheStore> VersionResolver<S> {
    /// Resolver over the built-in sources with Modrinth as the default.
    pub fn build(
        config: &ResolverConfig,
        store: Option<Arc<S>>,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> Self {
        let modrinth = Arc::new(ModrinthSource::new(
            fetcher.clone(),
            &config.endpoints.modrinth_api,
            config.loaders.clone(),
            config.source_urls.clone(),
        ));
        let sources = built_in_registry(fetcher.clone(), config, modrinth.clone());
        let catalog = ReleaseCatalog::new(fetcher, &config.endpoints.minecraft_manifest);

        Self::with_sources(config, store, sources, modrinth, catalog)
    }

    pub fn with_sources(
        config: &ResolverConfig,
        store: Option<Arc<S>>,
        sources: SourceRegistry,
        validator: Arc<ModrinthSource>,
        catalog: ReleaseCatalog,
    ) -> Self {
        let store = store.filter(|_| config.cache.enabled);

        Self {
            facade: CacheFacade::new(store),
            gate: CompatibilityGate::new(config.minimum_versions.clone()),
            sources,
            validator,
            catalog,
            loaders: config.loaders.clone(),
            source_urls: config.source_urls.clone(),
            cache_config: config.cache.clone(),
        }
    }

    pub fn loaders(&self) -> &LoaderTable {
        &self.loaders
    }

    /// Whether `component` can exist for `target_release`, without any I/O
    pub fn is_compatible(&self, component: &str, target_release: &str) -> bool {
        self.gate.is_compatible(component, target_release)
    }

    /// Latest version of `component` for `target_release`.
    ///
    /// Never fails: upstream errors come back as a record without a version
    /// and with the cause in `notes`.
    pub async fn resolve_one(&self, component: &str, target_release: &str) -> VersionRecord {
        let key = cache_key(component, target_release);
        let result = self
            .facade
            .get_or_fetch(&key, self.cache_config.component_ttl(), || {
                self.fetch_record(component, target_release)
            })
            .await;

        match result {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to fetch {} for {}: {}", component, target_release, e);
                VersionRecord::errored(
                    component,
                    self.loaders.loader_for(component),
                    target_release,
                    self.source_urls.source_url(component),
                    &e.to_string(),
                )
                .with_icon(self.source_urls.icon_url(component))
            }
        }
    }

    async fn fetch_record(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError> {
        let mut record = if let Some(minimum) = self
            .gate
            .minimum_for(component)
            .filter(|_| !self.gate.is_compatible(component, target_release))
        {
            info!(
                "{} is not available for {} (requires {})",
                component, target_release, minimum
            );
            VersionRecord::incompatible(
                component,
                self.loaders.loader_for(component),
                target_release,
                minimum,
                self.source_urls.source_url(component),
            )
            .with_icon(self.source_urls.icon_url(component))
        } else {
            let source = self.sources.source_for(component);
            debug!(
                "Resolving {} for {} via {}",
                component,
                target_release,
                source.label()
            );
            let record = source.resolve(component, target_release).await?;
            info!(
                "Resolved {} {} for {}",
                component,
                record.version.as_deref().unwrap_or("-"),
                target_release
            );
            record
        };

        record.cached_at = Some(Utc::now());
        Ok(record)
    }

    /// Platform releases, newest first
    pub async fn releases(&self) -> Result<Vec<ReleaseInfo>, RegistryError> {
        self.facade
            .get_or_fetch(CATALOG_CACHE_KEY, self.cache_config.catalog_ttl(), || {
                self.catalog.fetch_releases()
            })
            .await
    }

    /// Third-party project names the registry does not know
    pub async fn find_invalid_projects(
        &self,
        projects: &[String],
        target_release: &str,
    ) -> Result<Vec<String>, RegistryError> {
        self.validator
            .find_invalid_projects(projects, target_release)
            .await
    }
}

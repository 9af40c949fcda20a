//! Resolver test utilities

use std::sync::Arc;

use mockito::ServerGuard;
use tempfile::TempDir;

use echo_registry::config::{EndpointsConfig, ResolverConfig};
use echo_registry::resolve::VersionResolver;
use echo_registry::version::cache::Cache;
use echo_registry::version::http::ReqwestFetcher;

/// Create a Cache backed by a temporary database
pub fn create_test_cache() -> (TempDir, Arc<Cache>) {
    let temp_dir = TempDir::new().unwrap();
    let cache = Cache::new(&temp_dir.path().join("cache.db")).unwrap();
    (temp_dir, Arc::new(cache))
}

/// Config whose endpoints all point at `server`
pub fn create_test_config(server: &ServerGuard) -> ResolverConfig {
    ResolverConfig {
        endpoints: EndpointsConfig::with_base(&server.url()),
        ..ResolverConfig::default()
    }
}

/// Create a resolver talking to `server` with the given config
pub fn create_test_resolver_with_config(
    config: &ResolverConfig,
    cache: Option<Arc<Cache>>,
) -> VersionResolver<Cache> {
    let fetcher = Arc::new(ReqwestFetcher::new(&config.http).unwrap());
    VersionResolver::build(config, cache, fetcher)
}

/// Create a resolver talking to `server`
pub fn create_test_resolver(
    server: &ServerGuard,
    cache: Option<Arc<Cache>>,
) -> VersionResolver<Cache> {
    create_test_resolver_with_config(&create_test_config(server), cache)
}

//! Resolution of every built-in component plus caller-supplied projects

use futures::future::join_all;
use tracing::info;

use crate::config::BUILT_IN_COMPONENTS;
use crate::resolve::resolver::VersionResolver;
use crate::version::cache::CacheStore;
use crate::version::types::VersionRecord;

impl<S: CacheStore> VersionResolver<S> {
    /// One record per built-in component followed by one per `extra` name,
    /// all resolved concurrently.
    ///
    /// A failing component only turns its own record into an errored one.
    pub async fn resolve_all(&self, target_release: &str, extra: &[String]) -> Vec<VersionRecord> {
        let names: Vec<&str> = BUILT_IN_COMPONENTS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
            .collect();

        info!(
            "Resolving {} components for Minecraft {}",
            names.len(),
            target_release
        );

        join_all(
            names
                .iter()
                .map(|name| self.resolve_one(name, target_release)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::BUILT_IN_COMPONENTS;
    use crate::resolve::resolver::tests::{failing_source, resolved_source, resolver_with};
    use crate::version::registry::SourceRegistry;
    use crate::version::types::Loader;

    #[tokio::test]
    async fn resolve_all_returns_one_record_per_name_in_order() {
        let resolver = resolver_with(
            SourceRegistry::new(Arc::new(resolved_source(Loader::Universal, "1.0.0")))
                .with_source("forge", Arc::new(failing_source())),
            None,
        );
        let extra = vec!["jei".to_string(), "fabric-api".to_string()];

        let records = resolver.resolve_all("1.21.1", &extra).await;

        let names: Vec<&str> = records.iter().map(|r| r.component_name.as_str()).collect();
        let expected: Vec<&str> = BUILT_IN_COMPONENTS
            .iter()
            .copied()
            .chain(["jei", "fabric-api"])
            .collect();
        assert_eq!(names, expected);

        let forge = &records[0];
        assert!(forge.is_error());
        assert_eq!(forge.notes.as_deref(), Some("Failed to fetch: Invalid response: boom"));

        assert!(
            records[1..]
                .iter()
                .all(|r| r.version.as_deref() == Some("1.0.0"))
        );
    }

    #[tokio::test]
    async fn resolve_all_gates_old_releases() {
        let resolver = resolver_with(
            SourceRegistry::new(Arc::new(resolved_source(Loader::Universal, "1.0.0"))),
            None,
        );

        let records = resolver.resolve_all("1.12.2", &[]).await;

        assert_eq!(records.len(), BUILT_IN_COMPONENTS.len());
        let neoforge = records
            .iter()
            .find(|r| r.component_name == "neoforge")
            .unwrap();
        assert!(neoforge.is_incompatible());
    }
}

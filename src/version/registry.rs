//! Source trait and the name -> source lookup

use std::collections::HashMap;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::VersionRecord;

/// Trait for resolving a component's latest version from one upstream
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ComponentSource: Send + Sync {
    /// Short label used in logs (e.g., "forge", "modrinth")
    fn label(&self) -> &'static str;

    /// Resolves the latest version of `component` for `target_release`
    ///
    /// # Returns
    /// * `Ok(VersionRecord)` - A fully populated record
    /// * `Err(RegistryError)` - If the upstream is unreachable or has no matching version
    async fn resolve(
        &self,
        component: &str,
        target_release: &str,
    ) -> Result<VersionRecord, RegistryError>;
}

/// Maps component names to their source, with an explicit default for
/// everything else (third-party registry lookups).
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn ComponentSource>>,
    default_source: Arc<dyn ComponentSource>,
}

impl SourceRegistry {
    pub fn new(default_source: Arc<dyn ComponentSource>) -> Self {
        Self {
            sources: HashMap::new(),
            default_source,
        }
    }

    pub fn with_source(mut self, component: &str, source: Arc<dyn ComponentSource>) -> Self {
        self.sources.insert(component.to_string(), source);
        self
    }

    /// Source for `component`, falling back to the default source
    pub fn source_for(&self, component: &str) -> &Arc<dyn ComponentSource> {
        self.sources.get(component).unwrap_or(&self.default_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(label: &'static str) -> Arc<dyn ComponentSource> {
        let mut source = MockComponentSource::new();
        source.expect_label().return_const(label);
        Arc::new(source)
    }

    #[test]
    fn source_for_returns_dedicated_source() {
        let registry = SourceRegistry::new(labeled("modrinth")).with_source("forge", labeled("forge"));

        assert_eq!(registry.source_for("forge").label(), "forge");
    }

    #[test]
    fn source_for_falls_back_to_default() {
        let registry = SourceRegistry::new(labeled("modrinth")).with_source("forge", labeled("forge"));

        assert_eq!(registry.source_for("fabric-api").label(), "modrinth");
    }
}

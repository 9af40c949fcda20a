//! Component x release compatibility matrix

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::info;

use crate::config::is_built_in;
use crate::resolve::resolver::VersionResolver;
use crate::version::cache::CacheStore;
use crate::version::types::{CompatibilityMatrix, Loader, LoaderMap, VersionRecord};

/// Matrix cell of a built-in component: its version in its own column
fn built_in_cell(record: &VersionRecord, slot: Option<Loader>) -> LoaderMap {
    let mut cell = LoaderMap::default();
    if let Some(slot) = slot {
        cell.set(slot, record.usable_version().map(str::to_string));
    }
    cell
}

/// Matrix cell of a third-party component.
///
/// Uses the per-loader versions; when none are known the headline version
/// goes in the record's own loader column.
fn third_party_cell(record: &VersionRecord) -> LoaderMap {
    let mut cell = record.loader_versions.clone().unwrap_or_default();
    if cell.is_empty()
        && let Some(version) = record.usable_version()
    {
        cell.set(record.loader, Some(version.to_string()));
    }
    cell
}

impl<S: CacheStore> VersionResolver<S> {
    /// Per-loader versions for every `(component, release)` pair.
    ///
    /// Every cell is present; a cell whose resolution failed stays all-null.
    pub async fn build_matrix(
        &self,
        components: &[String],
        releases: &[String],
    ) -> CompatibilityMatrix {
        let mut matrix: CompatibilityMatrix = components
            .iter()
            .map(|component| {
                let row: IndexMap<String, LoaderMap> = releases
                    .iter()
                    .map(|release| (release.clone(), LoaderMap::default()))
                    .collect();
                (component.clone(), row)
            })
            .collect();

        info!(
            "Building matrix for {} components x {} releases",
            components.len(),
            releases.len()
        );

        let cells = components
            .iter()
            .flat_map(|component| releases.iter().map(move |release| (component, release)));
        let resolved = join_all(cells.map(|(component, release)| async move {
            let cell = self.matrix_cell(component, release).await;
            (component, release, cell)
        }))
        .await;

        for (component, release, cell) in resolved {
            if let Some(row) = matrix.get_mut(component.as_str()) {
                row.insert(release.clone(), cell);
            }
        }

        matrix
    }

    async fn matrix_cell(&self, component: &str, release: &str) -> LoaderMap {
        let record = self.resolve_one(component, release).await;

        if is_built_in(component) {
            built_in_cell(&record, self.loaders().matrix_slot(component))
        } else {
            third_party_cell(&record)
        }
    }
}

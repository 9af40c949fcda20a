//! Minimum-release gate evaluated before any upstream request

use tracing::warn;

use crate::config::MinimumVersionTable;
use crate::version::semver::parse_release;

/// Decides whether a component can exist for a target release
#[derive(Debug, Clone, Default)]
pub struct CompatibilityGate {
    minimums: MinimumVersionTable,
}

impl CompatibilityGate {
    pub fn new(minimums: MinimumVersionTable) -> Self {
        Self { minimums }
    }

    /// Minimum release recorded for a component
    pub fn minimum_for(&self, component: &str) -> Option<&str> {
        self.minimums.get(component)
    }

    /// Components without a recorded minimum are always compatible.
    pub fn is_compatible(&self, component: &str, target_release: &str) -> bool {
        match self.minimums.get(component) {
            Some(minimum) => is_release_at_least(target_release, minimum),
            None => true,
        }
    }
}

/// `release >= minimum` on (major, minor, patch).
/// Unparseable input on either side is treated as compatible.
pub fn is_release_at_least(release: &str, minimum: &str) -> bool {
    match (parse_release(release), parse_release(minimum)) {
        (Some(release), Some(minimum)) => release >= minimum,
        _ => {
            warn!(
                "Version parsing failed for {} or {}, assuming compatible",
                release, minimum
            );
            true
        }
    }
}

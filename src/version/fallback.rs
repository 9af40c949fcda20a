//! Ordered fallback releases for sources that lag behind new platform releases

use crate::config::FallbackConfig;
use crate::version::semver::leading_number;

const PRE_RELEASE_MARKERS: &[&str] = &["-pre", "-rc", "-snapshot"];

/// Candidate releases to try, most preferred first.
///
/// Order: the request itself, its base release when it carries a pre-release
/// marker, lower patches of the same minor, then for each of the previous
/// `previous_minors` minors (ascending) patches `max_patch` down to `0`.
///
/// Example with the default config, "1.21.1-pre1" yields
/// `1.21.1-pre1, 1.21.1, 1.21.0, 1.19.10 .. 1.19.0, 1.20.10 .. 1.20.0`.
pub fn generate_fallback_candidates(release: &str, config: &FallbackConfig) -> Vec<String> {
    let mut candidates = vec![release.to_string()];

    let parts: Vec<&str> = release.split('.').collect();
    if parts.len() < 2 || !starts_with_digit(parts[0]) || !starts_with_digit(parts[1]) {
        return candidates;
    }

    let major = leading_number(parts[0]);
    let minor = leading_number(parts[1]);

    if PRE_RELEASE_MARKERS.iter().any(|m| release.contains(m))
        && let Some((base, _)) = release.split_once('-')
    {
        candidates.push(base.to_string());
    }

    let patch = parts.get(2).map_or(0, |p| leading_number(p));
    candidates.extend((0..patch).rev().map(|p| format!("{major}.{minor}.{p}")));

    let first_minor = minor.saturating_sub(u64::from(config.previous_minors));
    for m in first_minor..minor {
        candidates.extend(
            (0..=u64::from(config.max_patch))
                .rev()
                .map(|p| format!("{major}.{m}.{p}")),
        );
    }

    candidates
}

fn starts_with_digit(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

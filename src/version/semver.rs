use std::cmp::Ordering;

use semver::Version;

/// Read the leading decimal digits of a token, `0` when there are none.
///
/// Examples:
/// - "21" -> 21
/// - "1rc" -> 1
/// - "pre1" -> 0
/// - "SNAPSHOT" -> 0
pub fn leading_number(token: &str) -> u64 {
    let digits: &str = token
        .find(|c: char| !c.is_ascii_digit())
        .map_or(token, |end| &token[..end]);
    digits.parse().unwrap_or(if digits.is_empty() { 0 } else { u64::MAX })
}

fn numeric_tokens(version: &str) -> Vec<u64> {
    version.split(['.', '-']).map(leading_number).collect()
}

/// Total order over version-like strings.
///
/// Tokens split on `.` and `-` are compared numerically with the shorter list
/// padded by zeros. On a numeric tie a pre-release (a string containing `-`)
/// sorts before its release, and any remaining tie is broken by comparing the
/// raw strings. Malformed input never fails, it only orders arbitrarily.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_tokens = numeric_tokens(a);
    let b_tokens = numeric_tokens(b);
    let len = a_tokens.len().max(b_tokens.len());

    for i in 0..len {
        let x = a_tokens.get(i).copied().unwrap_or(0);
        let y = b_tokens.get(i).copied().unwrap_or(0);
        if x != y {
            return x.cmp(&y);
        }
    }

    match (a.contains('-'), b.contains('-')) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cmp(b),
    }
}

/// Sort versions lowest first, highest last
pub fn sort_versions<S: AsRef<str>>(versions: &mut [S]) {
    versions.sort_by(|a, b| compare_versions(a.as_ref(), b.as_ref()));
}

/// Highest version of the list under [`compare_versions`]
pub fn latest_version<S: AsRef<str>>(versions: &[S]) -> Option<String> {
    versions
        .iter()
        .map(|v| v.as_ref())
        .max_by(|a, b| compare_versions(a, b))
        .map(str::to_string)
}

/// Parse a platform release into a (major, minor, patch) triple.
///
/// Needs at least `major.minor`; a missing patch is `0` and non-numeric
/// components read as `0`. Returns `None` for anything shorter.
///
/// Examples:
/// - "1.21.1" -> 1.21.1
/// - "1.21" -> 1.21.0
/// - "1.abc.3" -> 1.0.3
/// - "1" -> None
pub fn parse_release(release: &str) -> Option<Version> {
    let parts: Vec<&str> = release.split('.').collect();
    if parts.len() < 2 {
        return None;
    }
    let major = leading_number(parts[0]);
    let minor = leading_number(parts[1]);
    let patch = parts.get(2).map_or(0, |p| leading_number(p));
    Some(Version::new(major, minor, patch))
}

/// Derive the loader version prefix from a release ("1.21.1" -> "21.1", "1.21" -> "21")
pub fn release_prefix(release: &str) -> String {
    let parts: Vec<&str> = release.split('.').collect();
    match parts.len() {
        0 | 1 => release.to_string(),
        2 => parts[1].to_string(),
        _ => format!("{}.{}", parts[1], parts[2]),
    }
}

/// Whether `version` starts with `prefix` on a segment boundary.
///
/// "21.1" matches "21.1.77" and "21.1-beta" but not "21.10.3".
pub fn matches_version_prefix(prefix: &str, version: &str) -> bool {
    match version.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(['.', '-']),
        None => false,
    }
}

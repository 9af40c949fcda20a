//! Maven `maven-metadata.xml` reader
//!
//! Two extraction paths: a structured parse of `<versioning>` and a plain
//! pattern scan for tag contents, used when only one tag is needed or the
//! versions must be prefix-filtered before any sorting.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Versions and `<latest>` pointer of a metadata document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MavenMetadata {
    pub versions: Vec<String>,
    pub latest: Option<String>,
}

impl MavenMetadata {
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Parse a metadata document. Unparseable input yields an empty result.
pub fn parse_maven_metadata(xml: &str) -> MavenMetadata {
    let document = match roxmltree::Document::parse(xml) {
        Ok(document) => document,
        Err(e) => {
            warn!("Failed to parse Maven metadata XML: {}", e);
            return MavenMetadata::default();
        }
    };

    let Some(versioning) = document
        .descendants()
        .find(|node| node.has_tag_name("versioning"))
    else {
        return MavenMetadata::default();
    };

    let child_text = |name: &str| {
        versioning
            .children()
            .find(|child| child.has_tag_name(name))
            .and_then(|child| child.text())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    };

    // A single <version> is just one element, so it needs no special casing here
    let versions = versioning
        .children()
        .filter(|child| child.has_tag_name("versions"))
        .flat_map(|list| list.children().filter(|v| v.has_tag_name("version")))
        .filter_map(|v| v.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    MavenMetadata {
        versions,
        latest: child_text("latest"),
    }
}

static VERSION_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<version>(.*?)</version>").ok());
static LATEST_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<latest>(.*?)</latest>").ok());

/// Every non-empty `<version>` content, optionally restricted to those starting with `prefix`
pub fn extract_version_tags(xml: &str, prefix: Option<&str>) -> Vec<String> {
    let Some(pattern) = VERSION_TAG.as_ref() else {
        return Vec::new();
    };

    pattern
        .captures_iter(xml)
        .map(|caps| caps[1].trim().to_string())
        .filter(|version| !version.is_empty())
        .filter(|version| prefix.is_none_or(|p| version.starts_with(p)))
        .collect()
}

/// Trimmed content of the first `<latest>` element, matched case-insensitively.
/// An empty element counts as absent.
pub fn find_latest_tag(xml: &str) -> Option<String> {
    LATEST_TAG
        .as_ref()?
        .captures(xml)
        .map(|caps| caps[1].trim().to_string())
        .filter(|latest| !latest.is_empty())
}

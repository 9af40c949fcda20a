use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::version::types::Loader;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default lifetime of a cached component record (5 minutes)
pub const DEFAULT_COMPONENT_TTL_SECS: u64 = 5 * 60;

/// Default lifetime of the cached release catalog (1 hour)
pub const DEFAULT_CATALOG_TTL_SECS: u64 = 60 * 60;

/// Timeout for a single outbound request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

pub const DEFAULT_USER_AGENT: &str = "EchoRegistry/1.0";

/// Components resolved by their own source strategy, in aggregation order
pub const BUILT_IN_COMPONENTS: &[&str] = &[
    "forge",
    "neoforge",
    "fabric-loader",
    "parchment",
    "neoform",
    "moddev-gradle",
    "forgegradle",
    "loom",
];

pub fn is_built_in(component: &str) -> bool {
    BUILT_IN_COMPONENTS.contains(&component)
}

/// Resolver configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub cache: CacheConfig,
    pub http: HttpConfig,
    pub endpoints: EndpointsConfig,
    pub fallback: FallbackConfig,
    pub minimum_versions: MinimumVersionTable,
    pub loaders: LoaderTable,
    pub source_urls: SourceUrlTable,
}

impl ResolverConfig {
    /// Loads configuration from a JSON file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub enabled: bool,
    pub component_ttl_secs: u64,
    pub catalog_ttl_secs: u64,
}

impl CacheConfig {
    pub fn component_ttl(&self) -> Duration {
        Duration::from_secs(self.component_ttl_secs)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            component_ttl_secs: DEFAULT_COMPONENT_TTL_SECS,
            catalog_ttl_secs: DEFAULT_CATALOG_TTL_SECS,
        }
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: FETCH_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Upstream locations for every source
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointsConfig {
    /// Base of the per-release Forge download pages (`index_<release>.html`)
    pub forge_base: String,
    pub neoforge_metadata: String,
    pub fabric_loader: String,
    pub modrinth_api: String,
    /// Parchment metadata location; `{version}` is replaced by the candidate release
    pub parchment_metadata: String,
    /// Parchment browse page; `{version}` is replaced by the candidate release
    pub parchment_source: String,
    pub neoform_metadata: String,
    pub forgegradle_metadata: String,
    pub moddev_gradle_metadata: String,
    pub loom_metadata: String,
    pub minecraft_manifest: String,
}

impl EndpointsConfig {
    /// Points every endpoint at a single host, keeping the upstream path layout.
    pub fn with_base(base: &str) -> Self {
        Self {
            forge_base: format!("{base}/forge"),
            neoforge_metadata: format!("{base}/neoforge/maven-metadata.xml"),
            fabric_loader: format!("{base}/fabric/loader"),
            modrinth_api: format!("{base}/modrinth/project"),
            parchment_metadata: format!("{base}/parchment-{{version}}/maven-metadata.xml"),
            parchment_source: format!("{base}/parchment-{{version}}/"),
            neoform_metadata: format!("{base}/neoform/maven-metadata.xml"),
            forgegradle_metadata: format!("{base}/forgegradle/maven-metadata.xml"),
            moddev_gradle_metadata: format!("{base}/moddev-gradle/maven-metadata.xml"),
            loom_metadata: format!("{base}/loom/maven-metadata.xml"),
            minecraft_manifest: format!("{base}/mc/version_manifest_v2.json"),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            forge_base: "https://files.minecraftforge.net/net/minecraftforge/forge".to_string(),
            neoforge_metadata:
                "https://maven.neoforged.net/releases/net/neoforged/neoforge/maven-metadata.xml"
                    .to_string(),
            fabric_loader: "https://meta.fabricmc.net/v2/versions/loader".to_string(),
            modrinth_api: "https://api.modrinth.com/v2/project".to_string(),
            parchment_metadata: "https://maven.parchmentmc.org/org/parchmentmc/data/parchment-{version}/maven-metadata.xml".to_string(),
            parchment_source:
                "https://maven.parchmentmc.org/org/parchmentmc/data/parchment-{version}/"
                    .to_string(),
            neoform_metadata:
                "https://maven.neoforged.net/releases/net/neoforged/neoform/maven-metadata.xml"
                    .to_string(),
            forgegradle_metadata: "https://maven.minecraftforge.net/net/minecraftforge/gradle/ForgeGradle/maven-metadata.xml".to_string(),
            moddev_gradle_metadata:
                "https://maven.neoforged.net/releases/net/neoforged/moddev-gradle/maven-metadata.xml"
                    .to_string(),
            loom_metadata: "https://maven.fabricmc.net/net/fabricmc/fabric-loom/maven-metadata.xml"
                .to_string(),
            minecraft_manifest: "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json"
                .to_string(),
        }
    }
}

/// Shape of the Parchment fallback chain
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FallbackConfig {
    /// How many minors below the requested one are walked
    pub previous_minors: u32,
    /// Highest patch number tried for each previous minor
    pub max_patch: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            previous_minors: 2,
            max_patch: 10,
        }
    }
}

/// Minimum target release per component; absent components are always compatible
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MinimumVersionTable(HashMap<String, String>);

impl MinimumVersionTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self(entries)
    }

    pub fn get(&self, component: &str) -> Option<&str> {
        self.0.get(component).map(String::as_str)
    }
}

impl Default for MinimumVersionTable {
    fn default() -> Self {
        let entries = [
            ("neoforge", "1.20.2"),
            ("fabric-loader", "1.13.0"),
            ("fabric-api", "1.13.0"),
            ("architectury-api", "1.16.5"),
            ("modmenu", "1.14.4"),
            ("rei", "1.13.0"),
            ("amber", "1.20.1"),
            ("neoform", "1.20.2"),
            ("moddev-gradle", "1.20.2"),
            ("forgegradle", "1.2.5"),
            ("forge", "1.2.5"),
            ("parchment", "1.16.0"),
        ];
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Loader family per component
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderTable {
    /// Loader reported on a component's record
    pub records: HashMap<String, Loader>,
    /// Matrix column a built-in component's version is placed in
    pub matrix_slots: HashMap<String, Loader>,
}

impl LoaderTable {
    pub fn loader_for(&self, component: &str) -> Loader {
        self.records
            .get(component)
            .copied()
            .unwrap_or(Loader::Universal)
    }

    pub fn matrix_slot(&self, component: &str) -> Option<Loader> {
        self.matrix_slots.get(component).copied()
    }
}

impl Default for LoaderTable {
    fn default() -> Self {
        let records = [
            ("forge", Loader::Forge),
            ("neoforge", Loader::NeoForge),
            ("fabric-loader", Loader::Fabric),
            ("forgegradle", Loader::Forge),
            ("loom", Loader::Fabric),
            ("neoform", Loader::Universal),
            ("moddev-gradle", Loader::Universal),
            ("parchment", Loader::Universal),
            ("fabric-api", Loader::Fabric),
            ("modmenu", Loader::Fabric),
            ("rei", Loader::Universal),
            ("architectury-api", Loader::Universal),
            ("amber", Loader::Universal),
        ];
        let matrix_slots = [
            ("forge", Loader::Forge),
            ("neoforge", Loader::NeoForge),
            ("fabric-loader", Loader::Fabric),
            ("loom", Loader::Fabric),
            ("forgegradle", Loader::Forge),
            ("moddev-gradle", Loader::NeoForge),
            ("parchment", Loader::Universal),
            ("neoform", Loader::Universal),
        ];
        Self {
            records: records
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            matrix_slots: matrix_slots
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

/// Human-facing pages and icons per component
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceUrlTable {
    pub pages: HashMap<String, String>,
    pub icons: HashMap<String, String>,
    /// Page for components not listed in `pages`; `{name}` is replaced by the component
    pub third_party_page: String,
}

impl SourceUrlTable {
    pub fn source_url(&self, component: &str) -> String {
        self.pages
            .get(component)
            .cloned()
            .unwrap_or_else(|| self.third_party_page.replace("{name}", component))
    }

    pub fn icon_url(&self, component: &str) -> Option<String> {
        self.icons.get(component).cloned()
    }
}

impl Default for SourceUrlTable {
    fn default() -> Self {
        let pages = [
            (
                "forge",
                "https://files.minecraftforge.net/net/minecraftforge/forge/",
            ),
            (
                "neoforge",
                "https://maven.neoforged.net/releases/net/neoforged/neoforge/",
            ),
            (
                "fabric-loader",
                "https://meta.fabricmc.net/v2/versions/loader/",
            ),
            ("parchment", "https://maven.parchmentmc.org/"),
            (
                "neoform",
                "https://maven.neoforged.net/releases/net/neoforged/neoform/",
            ),
            (
                "forgegradle",
                "https://maven.minecraftforge.net/net/minecraftforge/gradle/ForgeGradle/",
            ),
            (
                "moddev-gradle",
                "https://maven.neoforged.net/releases/net/neoforged/moddev-gradle/",
            ),
            ("loom", "https://maven.fabricmc.net/net/fabricmc/fabric-loom/"),
        ];
        let icons = [
            ("forge", "/icons/forge.svg"),
            ("neoforge", "/icons/neoforge.svg"),
            ("fabric-loader", "/icons/fabric.svg"),
            ("parchment", "/icons/parchment.svg"),
            ("neoform", "/icons/neoforge.svg"),
            ("forgegradle", "/icons/gradle.svg"),
            ("moddev-gradle", "/icons/gradle.svg"),
            ("loom", "/icons/gradle.svg"),
        ];
        Self {
            pages: pages
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            icons: icons
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            third_party_page: "https://modrinth.com/mod/{name}".to_string(),
        }
    }
}

/// Returns the path to the data directory for echo-registry.
/// Uses $XDG_DATA_HOME/echo-registry if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/echo-registry,
/// or ./echo-registry if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the cache database file.
pub fn db_path() -> PathBuf {
    data_dir().join("cache.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("echo-registry.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("echo-registry")
}

//! Resolution against a mocked upstream

mod helper;

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use mockito::Server;

use echo_registry::config::BUILT_IN_COMPONENTS;
use echo_registry::version::cache::CacheStore;
use echo_registry::version::types::{Loader, ReleaseType, VersionRecord};
use helper::{
    MODRINTH_VERSIONS, create_test_cache, create_test_config, create_test_resolver,
    create_test_resolver_with_config, maven_metadata, mock_built_in_upstreams,
    mock_modrinth_versions,
};

fn by_name(records: &[VersionRecord]) -> HashMap<&str, &VersionRecord> {
    records
        .iter()
        .map(|r| (r.component_name.as_str(), r))
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn resolve_all_isolates_failing_project() {
    let mut server = Server::new_async().await;
    let _built_ins = mock_built_in_upstreams(&mut server).await;
    let _jei = mock_modrinth_versions(&mut server, "jei", 200, MODRINTH_VERSIONS).await;
    let _fabric_api = mock_modrinth_versions(&mut server, "fabric-api", 500, "oops").await;

    let resolver = create_test_resolver(&server, None);
    let extra = vec!["jei".to_string(), "fabric-api".to_string()];
    let records = resolver.resolve_all("1.21.1", &extra).await;

    assert_eq!(records.len(), BUILT_IN_COMPONENTS.len() + 2);
    let records = by_name(&records);

    let expected = [
        ("forge", "52.0.3"),
        ("neoforge", "21.1.77"),
        ("fabric-loader", "0.16.9"),
        ("parchment", "2024.11.17"),
        ("neoform", "1.21.1-20240808.144430"),
        ("moddev-gradle", "2.0.78"),
        ("forgegradle", "6.0.25"),
        ("loom", "1.8-SNAPSHOT"),
        ("jei", "19.21.0.247"),
    ];
    for (name, version) in expected {
        assert_eq!(records[name].version.as_deref(), Some(version), "{name}");
        assert!(!records[name].fallback_used, "{name}");
    }

    let jei = records["jei"];
    assert_eq!(jei.coordinates.as_deref(), Some("maven.modrinth:jei:19.21.0.247"));
    assert_eq!(jei.source_url, "https://modrinth.com/mod/jei");
    assert_eq!(
        jei.download_urls.as_ref().and_then(|d| d.fabric.as_deref()),
        Some("https://cdn.test/jei-fabric.jar")
    );

    let fabric_api = records["fabric-api"];
    assert_eq!(fabric_api.version, None);
    assert_eq!(fabric_api.loader, Loader::Fabric);
    assert!(
        fabric_api
            .notes
            .as_deref()
            .is_some_and(|n| n.starts_with("Failed to fetch: "))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn parchment_falls_back_to_previous_patch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/parchment-1.21.1/maven-metadata.xml")
        .with_status(200)
        .with_body(maven_metadata(None, &["2024.11.17", "2024.11.18-nightly-SNAPSHOT"]))
        .create_async()
        .await;
    let (_dir, cache) = create_test_cache();

    let resolver = create_test_resolver(&server, Some(cache.clone()));
    let record = resolver.resolve_one("parchment", "1.21.3").await;

    mock.assert_async().await;
    assert_eq!(record.version.as_deref(), Some("2024.11.17"));
    assert_eq!(record.target_release, "1.21.1");
    assert!(record.fallback_used);
    assert_eq!(
        record.notes.as_deref(),
        Some("Using Parchment mappings for 1.21.1 (forwards compatible)")
    );
    // stored under the requested release
    assert!(cache.get("dep:parchment:1.21.3").unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn cached_record_is_reused() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/forge/index_1.21.1.html")
        .with_status(200)
        .with_body("<td>Recommended: 52.0.3</td>")
        .expect(1)
        .create_async()
        .await;
    let (_dir, cache) = create_test_cache();

    let resolver = create_test_resolver(&server, Some(cache));
    let first = resolver.resolve_one("forge", "1.21.1").await;
    let second = resolver.resolve_one("forge", "1.21.1").await;

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(first.version.as_deref(), Some("52.0.3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_record_is_fetched_again() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/forge/index_1.21.1.html")
        .with_status(200)
        .with_body("<td>Recommended: 52.0.3</td>")
        .expect(2)
        .create_async()
        .await;
    let (_dir, cache) = create_test_cache();
    let mut config = create_test_config(&server);
    config.cache.component_ttl_secs = 0;

    let resolver = create_test_resolver_with_config(&config, Some(cache));
    resolver.resolve_one("forge", "1.21.1").await;
    resolver.resolve_one("forge", "1.21.1").await;

    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_record_is_not_cached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/forge/index_1.21.1.html")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;
    let (_dir, cache) = create_test_cache();

    let resolver = create_test_resolver(&server, Some(cache.clone()));
    let first = resolver.resolve_one("forge", "1.21.1").await;
    let second = resolver.resolve_one("forge", "1.21.1").await;

    mock.assert_async().await;
    assert!(first.is_error());
    assert!(second.is_error());
    assert_eq!(cache.get("dep:forge:1.21.1").unwrap(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_upstream_times_out_into_error_record() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/forge/index_1.21.1.html")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(1000));
            w.write_all(b"<td>Recommended: 52.0.3</td>")
        })
        .create_async()
        .await;
    let (_dir, cache) = create_test_cache();
    let mut config = create_test_config(&server);
    config.http.timeout_ms = 50;

    let resolver = create_test_resolver_with_config(&config, Some(cache.clone()));
    let record = resolver.resolve_one("forge", "1.21.1").await;

    assert!(record.is_error());
    assert_eq!(record.loader, Loader::Forge);
    assert!(
        record
            .notes
            .as_deref()
            .is_some_and(|n| n.starts_with("Failed to fetch: Network error")),
        "{:?}",
        record.notes
    );
    assert_eq!(cache.get("dep:forge:1.21.1").unwrap(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn incompatible_release_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/neoforge/maven-metadata.xml")
        .expect(0)
        .create_async()
        .await;

    let resolver = create_test_resolver(&server, None);
    let record = resolver.resolve_one("neoforge", "1.20.1").await;

    mock.assert_async().await;
    assert_eq!(record.version.as_deref(), Some("N/A"));
    assert_eq!(
        record.notes.as_deref(),
        Some("Not available for Minecraft 1.20.1. Requires 1.20.2 or later.")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn releases_come_from_manifest() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/mc/version_manifest_v2.json")
        .with_status(200)
        .with_body(
            r#"{"latest": {"release": "1.21.1", "snapshot": "24w33a"}, "versions": [
                {"id": "24w33a", "type": "snapshot", "releaseTime": "2024-08-15T12:00:00+00:00"},
                {"id": "1.21.1", "type": "release", "releaseTime": "2024-08-08T12:24:45+00:00"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let (_dir, cache) = create_test_cache();

    let resolver = create_test_resolver(&server, Some(cache));
    let releases = resolver.releases().await.unwrap();
    let again = resolver.releases().await.unwrap();

    mock.assert_async().await;
    assert_eq!(releases, again);
    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].version_type, ReleaseType::Snapshot);
    assert_eq!(releases[1].id, "1.21.1");
}

#[tokio::test(flavor = "multi_thread")]
async fn validation_reports_unknown_projects() {
    let mut server = Server::new_async().await;
    let _jei = mock_modrinth_versions(&mut server, "jei", 200, "[]").await;
    let _missing = mock_modrinth_versions(&mut server, "no-such-mod", 404, "").await;

    let resolver = create_test_resolver(&server, None);
    let invalid = resolver
        .find_invalid_projects(&["jei".to_string(), "no-such-mod".to_string()], "1.21.1")
        .await
        .unwrap();

    assert_eq!(invalid, vec!["no-such-mod".to_string()]);
}

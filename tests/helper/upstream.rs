//! Canned upstream responses served from a mockito server

use mockito::{Matcher, Mock, ServerGuard};

/// Maven metadata document listing `versions`
pub fn maven_metadata(latest: Option<&str>, versions: &[&str]) -> String {
    let latest = latest
        .map(|l| format!("<latest>{l}</latest>"))
        .unwrap_or_default();
    let versions: String = versions
        .iter()
        .map(|v| format!("<version>{v}</version>"))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<metadata><versioning>{latest}<versions>{versions}</versions></versioning></metadata>"
    )
}

async fn serve(server: &mut ServerGuard, path: &str, body: String) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

/// Mock every built-in upstream with data for Minecraft 1.21.1
pub async fn mock_built_in_upstreams(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        serve(
            server,
            "/forge/index_1.21.1.html",
            "<td>Latest: 52.0.16</td><td>Recommended: 52.0.3</td>".to_string(),
        )
        .await,
        serve(
            server,
            "/neoforge/maven-metadata.xml",
            maven_metadata(
                Some("21.10.2-beta"),
                &["21.1.1-beta", "21.1.77", "21.10.2-beta"],
            ),
        )
        .await,
        serve(
            server,
            "/fabric/loader/1.21.1",
            r#"[{"loader": {"version": "0.16.9"}}, {"loader": {"version": "0.16.8"}}]"#
                .to_string(),
        )
        .await,
        serve(
            server,
            "/parchment-1.21.1/maven-metadata.xml",
            maven_metadata(None, &["2024.07.28", "2024.11.17"]),
        )
        .await,
        serve(
            server,
            "/neoform/maven-metadata.xml",
            maven_metadata(None, &["1.21.1-20240808.144430", "1.21-20240613.152323"]),
        )
        .await,
        serve(
            server,
            "/moddev-gradle/maven-metadata.xml",
            maven_metadata(Some("2.0.78"), &["2.0.77", "2.0.78"]),
        )
        .await,
        serve(
            server,
            "/forgegradle/maven-metadata.xml",
            maven_metadata(Some("2.3-1.0.0"), &["2.3-1.0.0", "6.0.24", "6.0.25"]),
        )
        .await,
        serve(
            server,
            "/loom/maven-metadata.xml",
            maven_metadata(None, &["1.7.4", "1.7-SNAPSHOT", "1.8-SNAPSHOT"]),
        )
        .await,
    ]
}

/// Mock the Modrinth version listing of `slug` with `status` and `body`
pub async fn mock_modrinth_versions(
    server: &mut ServerGuard,
    slug: &str,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("GET", format!("/modrinth/project/{slug}/version").as_str())
        .match_query(Matcher::Any)
        .with_status(status)
        .with_body(body)
        .create_async()
        .await
}

/// Version listing with one Fabric and one NeoForge build
pub const MODRINTH_VERSIONS: &str = r#"[
    {
        "version_number": "19.21.0.247",
        "date_published": "2024-10-01T00:00:00Z",
        "loaders": ["neoforge"],
        "files": [{"url": "https://cdn.test/jei-neoforge.jar", "filename": "jei-1.21.1-neoforge-19.21.0.247.jar", "primary": true}]
    },
    {
        "version_number": "19.21.0.246",
        "date_published": "2024-09-30T00:00:00Z",
        "loaders": ["fabric"],
        "files": [{"url": "https://cdn.test/jei-fabric.jar", "filename": "jei-1.21.1-fabric-19.21.0.246.jar", "primary": true}]
    }
]"#;

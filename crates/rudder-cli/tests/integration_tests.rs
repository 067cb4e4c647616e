//! Integration tests for CLI commands

use rudder_core::write_archive;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = r#"
apiVersion: v1
entries:
  mypkg:
    - name: mypkg
      version: "1.2.0"
      description: Demo package
      keywords: [web]
      urls: [mypkg-1.2.0.tgz]
    - name: mypkg
      version: "1.1.0"
      keywords: [web]
      urls: [mypkg-1.1.0.tgz]
  postgres:
    - name: postgres
      version: "12.0.0"
      keywords: [database]
      urls: [postgres-12.0.0.tgz]
"#;

/// Run the rudder binary
async fn rudder(args: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_rudder"))
        .args(args)
        .env_remove("RUDDER_CONFIG")
        .env_remove("RUDDER_CACHE_DIR")
        .output()
        .await
        .expect("Failed to execute rudder")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Write a config listing `repos` with its cache under the temp dir
fn write_config(dir: &Path, repos: &[(&str, &str)]) -> PathBuf {
    let mut yaml = String::from(if repos.is_empty() {
        "repositories: []\n"
    } else {
        "repositories:\n"
    });
    for (name, url) in repos {
        yaml.push_str(&format!("  - name: {}\n    url: {}\n", name, url));
    }
    yaml.push_str(&format!("cache:\n  dir: {}\n", dir.join("cache").display()));

    let path = dir.join("config.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

async fn chart_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INDEX))
        .mount(&server)
        .await;

    let archive = write_archive(&[
        (
            "mypkg/Chart.yaml",
            b"apiVersion: v2\nname: mypkg\nversion: 1.2.0\ndescription: Demo package\n",
        ),
        ("mypkg/values.yaml", b"service:\n  port: 8080\nimage:\n  tag: stable\n"),
        ("mypkg/templates/service.yaml", b"kind: Service\n"),
    ])
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/mypkg-1.2.0.tgz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .mount(&server)
        .await;

    server
}

mod repo_command {
    use super::*;

    #[tokio::test]
    async fn test_repo_list() {
        let dir = TempDir::new().unwrap();
        let config = write_config(
            dir.path(),
            &[
                ("stable", "https://charts.example.com/stable"),
                ("internal", "http://charts.internal:8080"),
            ],
        );

        let output = rudder(&["repo", "list", "--config", config.to_str().unwrap()]).await;
        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("stable"));
        assert!(out.contains("https://charts.example.com/stable"));
        assert!(out.contains("internal"));
    }

    #[tokio::test]
    async fn test_repo_list_json() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path(), &[("stable", "https://charts.example.com/stable")]);

        let config = config.to_str().unwrap();

        let output = rudder(&["repo", "list", "--json", "--config", config]).await;
        assert!(output.status.success());

        let json: serde_json::Value =
            serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
        assert_eq!(json[0]["name"], "stable");
        assert_eq!(json[0]["url"], "https://charts.example.com/stable");
        assert_eq!(json[0]["index_cached"], false);
    }

    #[tokio::test]
    async fn test_missing_config_is_usage_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yaml");

        let output = rudder(&["repo", "list", "--config", missing.to_str().unwrap()]).await;
        assert_eq!(output.status.code(), Some(64));
    }

    #[tokio::test]
    async fn test_duplicate_repositories_are_rejected() {
        let dir = TempDir::new().unwrap();
        let config = write_config(
            dir.path(),
            &[
                ("stable", "https://a.example.com"),
                ("stable", "https://b.example.com"),
            ],
        );

        let output = rudder(&["repo", "list", "--config", config.to_str().unwrap()]).await;
        assert_eq!(output.status.code(), Some(64));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Duplicate repository name"));
    }
}

mod chart_commands {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_with_filter() {
        let server = chart_server().await;
        let dir = TempDir::new().unwrap();
        let uri = server.uri();
        let config = write_config(dir.path(), &[("local", uri.as_str())]);
        let config = config.to_str().unwrap();

        let output = rudder(&["list", "local", "--config", config]).await;
        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("mypkg"));
        assert!(out.contains("postgres"));

        let output = rudder(&[
            "list", "local", "--filter", "database", "--json", "--config", config,
        ])
        .await;
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "postgres");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_across_repositories() {
        let server = chart_server().await;
        let dir = TempDir::new().unwrap();
        let uri = server.uri();
        let other = format!("{}/", uri);
        let config = write_config(dir.path(), &[("one", uri.as_str()), ("two", other.as_str())]);

        let config = config.to_str().unwrap();

        let output = rudder(&["search", "web", "--json", "--config", config]).await;
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        let repos: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["repository"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(repos, vec!["one", "two"]);
        assert_eq!(json[0]["versions"], 2);
        assert_eq!(json[0]["version"], "1.2.0");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_show_latest() {
        let server = chart_server().await;
        let dir = TempDir::new().unwrap();
        let uri = server.uri();
        let config = write_config(dir.path(), &[("local", uri.as_str())]);
        let config = config.to_str().unwrap();

        let output = rudder(&["show", "local", "mypkg", "--values", "--config", config]).await;
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        let out = stdout(&output);
        assert!(out.contains("mypkg"));
        assert!(out.contains("1.2.0"));
        assert!(out.contains("Demo package"));
        assert!(out.contains("port: 8080"));
        assert!(out.contains("service.yaml"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_show_json_and_get() {
        let server = chart_server().await;
        let dir = TempDir::new().unwrap();
        let uri = server.uri();
        let config = write_config(dir.path(), &[("local", uri.as_str())]);
        let config = config.to_str().unwrap();

        let output = rudder(&[
            "show", "local", "mypkg", "--version", "1.2.0", "--json", "--config", config,
        ])
        .await;
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["metadata"]["version"], "1.2.0");
        assert_eq!(json["values"]["service"]["port"], 8080);
        assert_eq!(json["templates"]["service.yaml"], "a2luZDogU2VydmljZQo=");

        let output =
            rudder(&["show", "local", "mypkg", "--get", "image.tag", "--config", config]).await;
        assert!(output.status.success());
        assert_eq!(stdout(&output).trim(), "stable");

        let output =
            rudder(&["show", "local", "mypkg", "--get", "image.digest", "--config", config]).await;
        assert_eq!(output.status.code(), Some(3));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_show_not_found_exit_codes() {
        let server = chart_server().await;
        let dir = TempDir::new().unwrap();
        let uri = server.uri();
        let config = write_config(dir.path(), &[("local", uri.as_str())]);
        let config = config.to_str().unwrap();

        let output = rudder(&["show", "local", "absent", "--config", config]).await;
        assert_eq!(output.status.code(), Some(3));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Chart not found"));

        let output =
            rudder(&["show", "local", "mypkg", "--version", "9.9.9", "--config", config]).await;
        assert_eq!(output.status.code(), Some(3));

        let output = rudder(&["show", "missing", "mypkg", "--config", config]).await;
        assert_eq!(output.status.code(), Some(3));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unreachable_archive_is_network_error() {
        let server = chart_server().await;
        let dir = TempDir::new().unwrap();
        let uri = server.uri();
        let config = write_config(dir.path(), &[("local", uri.as_str())]);
        let config = config.to_str().unwrap();

        // Listed in the index but not served
        let output = rudder(&["show", "local", "postgres", "--config", config]).await;
        assert_eq!(output.status.code(), Some(4));
    }
}

mod cache_command {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cache_lifecycle() {
        let server = chart_server().await;
        let dir = TempDir::new().unwrap();
        let uri = server.uri();
        let config = write_config(dir.path(), &[("local", uri.as_str())]);
        let config = config.to_str().unwrap();

        let output = rudder(&["cache", "path", "--config", config]).await;
        assert!(output.status.success());
        assert_eq!(PathBuf::from(stdout(&output).trim()), dir.path().join("cache"));

        assert!(rudder(&["list", "local", "--config", config]).await.status.success());

        let output = rudder(&["cache", "stats", "--json", "--config", config]).await;
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["entry_count"], 1);
        assert_eq!(json["stale_count"], 0);

        let output = rudder(&["cache", "clear", "--config", config]).await;
        assert!(output.status.success());
        assert!(stdout(&output).contains("Removed 1"));

        let output = rudder(&["cache", "stats", "--json", "--config", config]).await;
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["entry_count"], 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cache_invalidate_refetches_index() {
        let server = chart_server().await;
        let dir = TempDir::new().unwrap();
        let uri = server.uri();
        let config = write_config(dir.path(), &[("local", uri.as_str())]);
        let config = config.to_str().unwrap();

        let output = rudder(&["cache", "invalidate", "local", "--config", config]).await;
        assert!(output.status.success());
        assert!(stdout(&output).contains("No cached index"));

        assert!(rudder(&["list", "local", "--config", config]).await.status.success());

        let output = rudder(&["repo", "list", "--json", "--config", config]).await;
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json[0]["index_cached"], true);

        let output = rudder(&["cache", "invalidate", "local", "--config", config]).await;
        assert!(output.status.success());
        assert!(stdout(&output).contains("Invalidated cached index"));

        let output = rudder(&["repo", "list", "--json", "--config", config]).await;
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json[0]["index_cached"], false);

        // The index is downloaded again on the next read
        assert!(rudder(&["list", "local", "--config", config]).await.status.success());
        let requests = server.received_requests().await.unwrap();
        let index_fetches = requests.iter().filter(|r| r.url.path() == "/index.yaml").count();
        assert_eq!(index_fetches, 2);

        let output = rudder(&["cache", "invalidate", "missing", "--config", config]).await;
        assert_eq!(output.status.code(), Some(3));
    }

    #[tokio::test]
    async fn test_cache_dir_override() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path(), &[]);
        let elsewhere = dir.path().join("elsewhere");

        let output = rudder(&[
            "cache",
            "path",
            "--config",
            config.to_str().unwrap(),
            "--cache-dir",
            elsewhere.to_str().unwrap(),
        ])
        .await;
        assert!(output.status.success());
        assert_eq!(PathBuf::from(stdout(&output).trim()), elsewhere);
    }

    #[tokio::test]
    async fn test_zero_lifetime_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path(), &[]);

        let config = config.to_str().unwrap();

        let output =
            rudder(&["cache", "stats", "--config", config, "--cache-lifetime", "0s"]).await;
        assert_eq!(output.status.code(), Some(64));
    }
}

//! Integration tests for the `prodman` CLI binary.
//!
//! Argument parsing, help, completions and exit codes run without a
//! backend; the rest talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Build a command for the `prodman` binary with env isolation.
///
/// Clears all `PRODMAN_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn prodman_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("prodman");
    cmd.env("HOME", "/tmp/prodman-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/prodman-cli-test-nonexistent")
        .env(
            "PRODMAN_CONFIG",
            "/tmp/prodman-cli-test-nonexistent/config.toml",
        )
        .env("NO_COLOR", "1")
        .env_remove("PRODMAN_PROFILE")
        .env_remove("PRODMAN_API_URL")
        .env_remove("PRODMAN_OUTPUT")
        .env_remove("PRODMAN_INSECURE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn laptop() -> serde_json::Value {
    json!({
        "id": 1,
        "name": "Laptop Pro X",
        "ref": "LPX-001",
        "description": "High performance laptop for professionals.",
        "documents": [
            { "id": 101, "type": "pdf", "path_or_url": "media/product_1/pdf/specsheet.pdf", "label": "Specsheet.pdf" }
        ]
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = prodman_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    prodman_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("product catalog")
            .and(predicate::str::contains("products"))
            .and(predicate::str::contains("documents")),
    );
}

#[test]
fn test_version_flag() {
    prodman_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("prodman"));
}

#[test]
fn test_completions_zsh() {
    prodman_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    prodman_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = prodman_cmd().arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unreachable_backend_exits_with_connection_code() {
    let output = prodman_cmd()
        .args(["--api-url", UNREACHABLE, "products", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    let text = combined_output(&output);
    assert!(
        text.contains("Failed to load products"),
        "Expected the list failure notice:\n{text}"
    );
}

#[test]
fn test_delete_without_yes_is_refused_non_interactively() {
    let output = prodman_cmd()
        .args(["--api-url", UNREACHABLE, "products", "delete", "3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[test]
fn test_unknown_profile_is_reported() {
    let output = prodman_cmd()
        .args(["--profile", "staging", "products", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("staging"));
}

#[test]
fn test_blank_name_is_a_usage_error() {
    let output = prodman_cmd()
        .args([
            "--api-url",
            UNREACHABLE,
            "products",
            "create",
            "--name",
            "   ",
            "--ref",
            "X-1",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Please enter product name"));
}

#[test]
fn test_import_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("catalog.pdf");
    std::fs::write(&file, b"%PDF-1.4").unwrap();

    let output = prodman_cmd()
        .args(["--api-url", UNREACHABLE, "products", "import"])
        .arg(&file)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Only .xlsx or .csv allowed"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_override() {
    prodman_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "prodman-cli-test-nonexistent/config.toml",
        ));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    prodman_cmd()
        .env("PRODMAN_CONFIG", &config)
        .args([
            "config",
            "init",
            "--api-url",
            "http://catalog.local:8000",
            "--profile",
            "lab",
        ])
        .assert()
        .success();

    prodman_cmd()
        .env("PRODMAN_CONFIG", &config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.lab]")
                .and(predicate::str::contains("http://catalog.local:8000"))
                .and(predicate::str::contains("default_profile = \"lab\"")),
        );
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test]
async fn test_products_list_passes_search_and_renders_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/"))
        .and(query_param("search", "laptop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([laptop()])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = prodman_cmd();
    cmd.args([
        "--api-url",
        server.uri().as_str(),
        "-o",
        "json",
        "products",
        "list",
        "--search",
        "laptop",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["name"], "Laptop Pro X");
    assert_eq!(listed[0]["ref"], "LPX-001");
}

#[tokio::test]
async fn test_products_get_missing_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/42/"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Product 42 not found" })),
        )
        .mount(&server)
        .await;

    let mut cmd = prodman_cmd();
    cmd.args(["--api-url", server.uri().as_str(), "products", "get", "42"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(
        text.contains("Could not load product details for ID: 42"),
        "{text}"
    );
}

#[tokio::test]
async fn test_add_url_prints_refreshed_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(laptop()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/products/1/documents/add_url/"))
        .and(body_json(json!({ "url": "https://cdn.example.com/manual.pdf", "doc_type": "pdf" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 300, "type": "pdf", "path_or_url": "https://cdn.example.com/manual.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = prodman_cmd();
    cmd.args([
        "--api-url",
        server.uri().as_str(),
        "-o",
        "plain",
        "documents",
        "add-url",
        "1",
        "https://cdn.example.com/manual.pdf",
        "--type",
        "pdf",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(&format!("{}/media/product_1/pdf/specsheet.pdf", server.uri())),
        "storage paths resolve against the API origin:\n{stdout}"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("URL added successfully."), "{stderr}");
}

#[tokio::test]
async fn test_products_get_renders_detail_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(laptop()))
        .mount(&server)
        .await;

    let mut cmd = prodman_cmd();
    cmd.args(["--api-url", server.uri().as_str(), "products", "get", "1"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    for expected in [
        "ID:          1",
        "Name:        Laptop Pro X",
        "Reference:   LPX-001",
        "Description: High performance laptop for professionals.",
        "Documents:   1",
        "Specsheet.pdf",
    ] {
        assert!(stdout.contains(expected), "missing {expected:?}:\n{stdout}");
    }
}

#[tokio::test]
async fn test_add_url_accepts_other_document_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(laptop()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/products/1/documents/add_url/"))
        .and(body_json(json!({ "url": "https://cdn.example.com/cert.txt", "doc_type": "other" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 301, "type": "other", "path_or_url": "https://cdn.example.com/cert.txt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = prodman_cmd();
    cmd.args([
        "--api-url",
        server.uri().as_str(),
        "documents",
        "add-url",
        "1",
        "https://cdn.example.com/cert.txt",
        "--type",
        "other",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
}

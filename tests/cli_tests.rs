mod common;

use assert_cmd::Command;
use common::{JPEG_HEADER, JPEG_HEADER_DATA_URI};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn iad_verify(server: &str, bundle: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("iad-verify")?;
    cmd.env_remove("IAD_SERVER_URL")
        .env_remove("IAD_AUTH_TOKEN")
        .env_remove("IAD_VERBOSE_TRACING")
        .env_remove("IAD_REVEAL_CREDENTIALS")
        .arg("--server")
        .arg(server)
        .arg("--bundle")
        .arg(bundle)
        .arg("--token")
        .arg("abc")
        .arg("--template-id")
        .arg("tpl-1")
        .arg("--verification-id")
        .arg("ver-1");
    Ok(cmd)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_success_prints_body_and_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/biometricsverification"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new()?;
    let bundle = dir.path().join("capture.bin");
    let image = dir.path().join("face.jpg");
    std::fs::write(&bundle, b"sealed-bundle")?;
    std::fs::write(&image, JPEG_HEADER)?;

    let mut cmd = iad_verify(&server.uri(), &bundle)?;
    cmd.arg("--image").arg(&image);
    tokio::task::spawn_blocking(move || {
        cmd.assert().success().stdout("{\"ok\":true}\n");
    })
    .await?;

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("sealed-bundle"));
    assert!(body.contains(JPEG_HEADER_DATA_URI));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/biometricsverification"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"message":"invalid template"}"#),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new()?;
    let bundle = dir.path().join("capture.bin");
    std::fs::write(&bundle, b"sealed-bundle")?;

    let mut cmd = iad_verify(&server.uri(), &bundle)?;
    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .failure()
            .code(1)
            .stdout("")
            .stderr(predicate::str::contains("invalid template (Code: 400)"));
    })
    .await?;
    Ok(())
}

#[test]
fn test_missing_bundle_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("absent.bin");

    iad_verify("http://127.0.0.1:9", &missing)?
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
    Ok(())
}

#[test]
fn test_invalid_server_url_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let bundle = dir.path().join("capture.bin");
    std::fs::write(&bundle, b"sealed-bundle")?;

    iad_verify("not a url", &bundle)?
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid server url"));
    Ok(())
}

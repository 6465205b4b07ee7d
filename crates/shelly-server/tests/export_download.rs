use std::fs;

use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use tower::ServiceExt;

#[path = "support/mod.rs"]
mod support;

use support::{get, TestServer, ADMIN_KEY};

fn server_with_artifacts() -> TestServer {
    let server = TestServer::with_admin_key();
    let root = server.state.exports.root().to_path_buf();
    fs::create_dir_all(root.join("2024")).unwrap();
    fs::write(root.join("devices.json"), r#"{"devices":[]}"#).unwrap();
    fs::write(root.join("2024/backup.json"), "backup").unwrap();
    fs::write(server.dir.path().join("secret.txt"), "top secret").unwrap();
    server
}

#[tokio::test]
async fn download_serves_file_inside_root() {
    let server = server_with_artifacts();

    let response = server
        .app
        .clone()
        .oneshot(get("/api/v1/export/download/devices.json", Some(ADMIN_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");
    let expected = br#"{"devices":[]}"#;
    assert_eq!(response.headers()[CONTENT_LENGTH], expected.len().to_string().as_str());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], expected);

    let (status, value) = server
        .send(get("/api/v1/export/download/2024/backup.json", Some(ADMIN_KEY)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, "backup");
}

#[tokio::test]
async fn download_rejects_traversal() {
    let server = server_with_artifacts();

    let (status, value) = server
        .send(get("/api/v1/export/download/../secret.txt", Some(ADMIN_KEY)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(value["error"], "forbidden");

    let (status, _) = server
        .send(get("/api/v1/export/download/2024/../../secret.txt", Some(ADMIN_KEY)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn download_rejects_absolute_path() {
    let server = server_with_artifacts();
    let (status, _) = server
        .send(get("/api/v1/export/download/%2Fetc%2Fpasswd", Some(ADMIN_KEY)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[cfg(unix)]
#[tokio::test]
async fn download_rejects_symlink_out_of_root() {
    let server = server_with_artifacts();
    let root = server.state.exports.root().to_path_buf();
    std::os::unix::fs::symlink(server.dir.path().join("secret.txt"), root.join("leak.txt")).unwrap();

    let (status, value) = server
        .send(get("/api/v1/export/download/leak.txt", Some(ADMIN_KEY)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!value.to_string().contains("top secret"));
}

#[tokio::test]
async fn download_missing_file_is_not_found() {
    let server = server_with_artifacts();

    let (status, value) = server
        .send(get("/api/v1/export/download/nope.json", Some(ADMIN_KEY)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "not_found");

    // Directories are not artifacts
    let (status, _) = server
        .send(get("/api/v1/export/download/2024", Some(ADMIN_KEY)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_requires_admin_key() {
    let server = server_with_artifacts();

    let (status, _) = server
        .send(get("/api/v1/export/download/devices.json", None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server
        .send(get("/api/v1/export/download/devices.json", Some("wrong-key-wrong-key")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

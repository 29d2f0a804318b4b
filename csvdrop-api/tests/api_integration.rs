// Copyright 2026 Csvdrop Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! API Integration Tests
//!
//! Tests the upload/download HTTP API using in-process requests.
//! No actual network I/O - uses tower::ServiceExt::oneshot directly.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use csvdrop_api::{create_router, AppState};
use csvdrop_core::ArtifactStore;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

const TEST_TOKEN: &str = "test-download-token";
const BOUNDARY: &str = "X-CSVDROP-TEST-BOUNDARY";

/// Creates a router backed by a store in a temporary directory.
async fn create_test_app() -> (Router, Arc<ArtifactStore>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(
        ArtifactStore::open(temp_dir.path(), 5).await.expect("Failed to open store"),
    );
    let app = create_router(AppState::new(store.clone(), TEST_TOKEN.to_string()));
    (app, store, temp_dir)
}

/// Builds a multipart/form-data body with a single field.
fn multipart_body(field_name: &str, file_name: Option<&str>, content: &str) -> String {
    let disposition = match file_name {
        Some(name) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
            field_name, name
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"", field_name),
    };
    format!(
        "--{BOUNDARY}\r\n{disposition}\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    )
}

fn upload_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn download_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/download");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Uploads `content` through the API and asserts success.
async fn upload_ok(app: &Router, content: &str) {
    let body = multipart_body("file", Some("data.csv"), content);
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_to_string(response.into_body()).await,
        "{\"success\":true}"
    );
    // Space uploads out so backup names and mtimes stay distinct.
    tokio::time::sleep(Duration::from_millis(15)).await;
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_without_file_field_returns_400() {
    let (app, store, _temp) = create_test_app().await;

    // A plain form field without a filename is not a file upload.
    let body = multipart_body("note", None, "not a file");
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_to_string(response.into_body()).await,
        "{\"error\":\"No file uploaded\"}"
    );

    // Nothing was rotated or written.
    assert!(!store.exists().await);
    assert!(store.list_backups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_with_empty_file_returns_400() {
    let (app, store, _temp) = create_test_app().await;

    let body = multipart_body("file", Some("data.csv"), "");
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!store.exists().await);
}

#[tokio::test]
async fn test_first_upload_creates_canonical_file() {
    let (app, store, _temp) = create_test_app().await;

    upload_ok(&app, "a,b\n1,2\n").await;

    assert_eq!(store.read().await.unwrap().unwrap(), b"a,b\n1,2\n");
    assert!(store.list_backups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_upload_rotates_prior_version() {
    let (app, store, _temp) = create_test_app().await;

    upload_ok(&app, "a,b\n1,2\n").await;
    upload_ok(&app, "c,d\n3,4\n").await;

    assert_eq!(store.read().await.unwrap().unwrap(), b"c,d\n3,4\n");

    let backups = store.list_backups().await.unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(std::fs::read(&backups[0]).unwrap(), b"a,b\n1,2\n");
}

#[tokio::test]
async fn test_six_uploads_fill_the_backup_set() {
    let (app, store, _temp) = create_test_app().await;

    // Uploads 2..6 each archive one version, so the set sits exactly at
    // the bound and nothing has been pruned yet.
    for i in 0..6 {
        upload_ok(&app, &format!("upload-{}\n", i)).await;
    }

    let backups = store.list_backups().await.unwrap();
    assert_eq!(backups.len(), 5);

    let contents: Vec<Vec<u8>> =
        backups.iter().map(|p| std::fs::read(p).unwrap()).collect();
    assert!(contents.iter().any(|c| c == b"upload-0\n"));
}

#[tokio::test]
async fn test_seventh_upload_prunes_oldest_backup() {
    let (app, store, _temp) = create_test_app().await;

    // The seventh upload creates a sixth backup, pushing the set past the
    // bound; the very first version's backup is the oldest and must go.
    for i in 0..7 {
        upload_ok(&app, &format!("upload-{}\n", i)).await;
    }

    let backups = store.list_backups().await.unwrap();
    assert_eq!(backups.len(), 5);

    let contents: Vec<Vec<u8>> =
        backups.iter().map(|p| std::fs::read(p).unwrap()).collect();
    assert!(!contents.iter().any(|c| c == b"upload-0\n"));

    // Newest-first: versions 5 down to 1.
    for (idx, content) in contents.iter().enumerate() {
        let expected = format!("upload-{}\n", 5 - idx);
        assert_eq!(content, expected.as_bytes());
    }
}

#[tokio::test]
async fn test_upload_accepts_non_csv_content() {
    let (app, store, _temp) = create_test_app().await;

    // Content is stored verbatim, never validated as CSV.
    upload_ok(&app, "this is not csv at all {}[]").await;
    assert_eq!(
        store.read().await.unwrap().unwrap(),
        b"this is not csv at all {}[]"
    );
}

#[tokio::test]
async fn test_storage_failure_returns_500() {
    let (app, store, temp) = create_test_app().await;

    upload_ok(&app, "a,b\n1,2\n").await;

    // Swap the backup directory for a plain file so the rotation rename
    // fails mid-upload with an I/O error.
    std::fs::remove_dir_all(temp.path().join("backups")).unwrap();
    std::fs::write(temp.path().join("backups"), b"").unwrap();

    let body = multipart_body("file", Some("data.csv"), "c,d\n3,4\n");
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_to_string(response.into_body()).await,
        "{\"error\":\"Internal server error\"}"
    );

    // The failed upload never became canonical.
    assert_eq!(store.read().await.unwrap().unwrap(), b"a,b\n1,2\n");
}

// ============================================================================
// Download Tests
// ============================================================================

#[tokio::test]
async fn test_download_without_token_returns_403() {
    let (app, _store, _temp) = create_test_app().await;

    let response = app.clone().oneshot(download_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_to_string(response.into_body()).await,
        "{\"error\":\"Invalid token\"}"
    );
}

#[tokio::test]
async fn test_download_with_wrong_token_returns_403() {
    let (app, _store, _temp) = create_test_app().await;
    upload_ok(&app, "a,b\n").await;

    let response = app
        .clone()
        .oneshot(download_request(Some("wrong-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_download_token_is_case_sensitive() {
    let (app, _store, _temp) = create_test_app().await;
    upload_ok(&app, "a,b\n").await;

    let response = app
        .clone()
        .oneshot(download_request(Some(&TEST_TOKEN.to_uppercase())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_download_before_any_upload_returns_404() {
    let (app, _store, _temp) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(download_request(Some(TEST_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_to_string(response.into_body()).await, "File not found");
}

#[tokio::test]
async fn test_download_returns_last_uploaded_bytes() {
    let (app, _store, _temp) = create_test_app().await;

    upload_ok(&app, "a,b\n1,2\n").await;
    upload_ok(&app, "c,d\n3,4\n").await;

    let response = app
        .clone()
        .oneshot(download_request(Some(TEST_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    assert_eq!(body_to_string(response.into_body()).await, "c,d\n3,4\n");
}

#[tokio::test]
async fn test_repeated_downloads_return_identical_bytes() {
    let (app, _store, _temp) = create_test_app().await;
    upload_ok(&app, "x,y\n9,8\n").await;

    let mut bodies = Vec::new();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(download_request(Some(TEST_TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        bodies.push(body_to_string(response.into_body()).await);
    }

    assert_eq!(bodies[0], "x,y\n9,8\n");
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

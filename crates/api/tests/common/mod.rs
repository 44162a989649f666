//! Shared harness for HTTP-level integration tests.
//!
//! Builds the production router over an in-memory record store and sends
//! requests through `tower::ServiceExt::oneshot`, no TCP listener needed.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use roster_api::config::ServerConfig;
use roster_api::router::build_app_router;
use roster_api::state::AppState;
use roster_core::record::{ListOrder, RecordKind};
use roster_core::storage::ImageStorageKind;
use roster_db::memory::MemoryRecordStore;
use roster_db::store::RecordStore;
use tower::ServiceExt;

pub const BOUNDARY: &str = "roster-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(kind: RecordKind, order: ListOrder) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        record_kind: kind,
        list_order: order,
        ..ServerConfig::default()
    }
}

/// Config for the disk image store rooted at `upload_dir`.
pub fn disk_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        image_storage: ImageStorageKind::Disk,
        upload_dir: upload_dir.to_path_buf(),
        upload_url_prefix: "/uploads".to_string(),
        ..test_config(RecordKind::Characters, ListOrder::Asc)
    }
}

/// Build the full application router around `records`.
pub fn build_app(config: ServerConfig, records: Arc<dyn RecordStore>) -> Router {
    let state = AppState::new(config, records).unwrap();
    build_app_router(state)
}

/// A fresh in-memory store plus a router over it.
pub fn memory_app(config: ServerConfig) -> (Router, Arc<MemoryRecordStore>) {
    let store = Arc::new(MemoryRecordStore::new(config.record_kind, config.list_order));
    let app = build_app(config, store.clone());
    (app, store)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a `multipart/form-data` body.
pub async fn post_multipart(app: &Router, uri: &str, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Assert the response is a 303 back to the list page.
pub fn assert_redirects_to_list(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
}

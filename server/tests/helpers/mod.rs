//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full
//! axum router. Each test gets its own migrated database from
//! `#[sqlx::test]`; S3 stays unconfigured, so storage-backed endpoints
//! answer 503 and everything else runs for real.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{request, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use gala_server::api::{create_router, AppState};
use gala_server::config::Config;
use gala_server::db::{self, NewPhoto, Photo};

/// A router plus its backing pool, ready for `oneshot` requests.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
}

/// Build a test app over a migrated pool. Storage is left unconfigured.
pub fn test_app(pool: PgPool) -> TestApp {
    let state = AppState::new(pool.clone(), Config::default_for_test(), None);
    TestApp {
        router: create_router(state),
        pool,
    }
}

impl TestApp {
    /// Start a request builder.
    pub fn request(method: Method, uri: &str) -> request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Start a request builder with a JSON body content type.
    pub fn json_request(method: Method, uri: &str) -> request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
    }

    /// Send a request through the full router.
    pub async fn oneshot(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("router call failed")
    }
}

/// Collect a response body as JSON.
pub async fn json_body(resp: Response<Body>) -> serde_json::Value {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body was not valid JSON")
}

/// Insert a minimal photo record directly, for endpoints that need one.
pub async fn insert_test_photo(pool: &PgPool, file_name: &str, s3_key: &str) -> Photo {
    db::insert_photo(
        pool,
        &NewPhoto {
            file_path: s3_key,
            file_name,
            file_size: 2048,
            mime_type: "image/jpeg",
            storage_url: "https://test-bucket.s3.us-east-1.amazonaws.com/photos/t.jpg",
            s3_key: Some(s3_key),
            uploader_name: Some("Convidado Teste"),
            is_video: false,
            date_taken: None,
            latitude: None,
            longitude: None,
        },
    )
    .await
    .expect("failed to insert test photo")
}

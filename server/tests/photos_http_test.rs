//! HTTP Integration Tests for the Photo Gallery
//!
//! Run with: `cargo test --test photos_http_test -- --nocapture`

mod helpers;

use axum::body::Body;
use axum::http::Method;
use chrono::NaiveDate;
use helpers::{insert_test_photo, json_body, test_app, TestApp};
use sqlx::PgPool;
use uuid::Uuid;

use gala_server::db::{self, NewPhoto};

async fn insert_with_capture_date(
    pool: &PgPool,
    s3_key: &str,
    date: Option<(u32, u32, u32, u32)>,
) -> db::Photo {
    let date_taken = date.map(|(month, day, hour, minute)| {
        NaiveDate::from_ymd_opt(2026, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    });
    db::insert_photo(
        pool,
        &NewPhoto {
            file_path: s3_key,
            file_name: "f.jpg",
            file_size: 10,
            mime_type: "image/jpeg",
            storage_url: "https://test-bucket.s3.us-east-1.amazonaws.com/x.jpg",
            s3_key: Some(s3_key),
            uploader_name: None,
            is_video: false,
            date_taken,
            latitude: None,
            longitude: None,
        },
    )
    .await
    .expect("insert")
}

// ============================================================================
// Listing
// ============================================================================

#[sqlx::test]
async fn test_list_returns_newest_first(pool: PgPool) {
    let app = test_app(pool.clone());
    let first = insert_test_photo(&pool, "a.jpg", "photos/a.jpg").await;
    // Keep the created_at timestamps strictly ordered
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = insert_test_photo(&pool, "b.jpg", "photos/b.jpg").await;

    let req = TestApp::request(Method::GET, "/api/photos")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), 200);

    let json = json_body(resp).await;
    let photos = json["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0]["id"], second.id.to_string());
    assert_eq!(photos[1]["id"], first.id.to_string());
}

#[sqlx::test]
async fn test_timeline_groups_in_window_order(pool: PgPool) {
    let app = test_app(pool.clone());
    // Festa: wedding day evening
    insert_with_capture_date(&pool, "photos/festa.jpg", Some((12, 19, 19, 0))).await;
    // Cerimônia: wedding day morning
    insert_with_capture_date(&pool, "photos/cerimonia.jpg", Some((12, 19, 10, 0))).await;
    // No capture date: unclassified
    insert_with_capture_date(&pool, "photos/sem-data.jpg", None).await;

    let req = TestApp::request(Method::GET, "/api/photos/timeline")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), 200);

    let json = json_body(resp).await;
    let groups = json["groups"].as_array().unwrap();
    let ids: Vec<&str> = groups
        .iter()
        .map(|g| g["event"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["cerimonia", "festa", "outros"],
        "window declaration order, unclassified last, empty windows omitted"
    );
    assert_eq!(groups[2]["event"]["label"], "Outros momentos");
}

// ============================================================================
// Deletion
// ============================================================================

#[sqlx::test]
async fn test_delete_with_wrong_password_is_401(pool: PgPool) {
    let app = test_app(pool.clone());
    let photo = insert_test_photo(&pool, "a.jpg", "photos/a.jpg").await;

    let req = TestApp::json_request(Method::DELETE, &format!("/api/photos/{}", photo.id))
        .body(Body::from(
            serde_json::json!({ "password": "chute-errado" }).to_string(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), 401);

    // Record untouched
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[sqlx::test]
async fn test_delete_unknown_id_is_404(pool: PgPool) {
    let app = test_app(pool.clone());
    insert_test_photo(&pool, "a.jpg", "photos/a.jpg").await;

    let req = TestApp::json_request(Method::DELETE, &format!("/api/photos/{}", Uuid::new_v4()))
        .body(Body::from(
            serde_json::json!({ "password": "test-delete-password" }).to_string(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), 404);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1, "record set unchanged");
}

#[sqlx::test]
async fn test_delete_removes_record_and_reactions(pool: PgPool) {
    let app = test_app(pool.clone());
    let photo = insert_test_photo(&pool, "a.jpg", "photos/a.jpg").await;

    // React first so the cascade has something to remove
    let req = TestApp::json_request(Method::POST, "/api/reactions")
        .body(Body::from(
            serde_json::json!({
                "photo_id": photo.id,
                "emoji": "❤️",
                "session_id": "session-1",
            })
            .to_string(),
        ))
        .unwrap();
    app.oneshot(req).await;

    let req = TestApp::json_request(Method::DELETE, &format!("/api/photos/{}", photo.id))
        .body(Body::from(
            serde_json::json!({ "password": "test-delete-password" }).to_string(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), 200);

    let json = json_body(resp).await;
    assert_eq!(json["success"], true);

    let photos: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(photos.0, 0);

    let reactions: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photo_reactions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(reactions.0, 0, "reactions cascade with the photo");
}

// ============================================================================
// Health
// ============================================================================

#[sqlx::test]
async fn test_health_reports_storage_state(pool: PgPool) {
    let app = test_app(pool);

    let req = TestApp::request(Method::GET, "/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), 200);

    let json = json_body(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], false);
}

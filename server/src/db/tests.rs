//! Database Integration Tests
//!
//! Repository tests for photo records and reaction toggling.

#[cfg(test)]
mod postgres_tests {
    use super::super::*;
    use chrono::NaiveDate;
    use sqlx::PgPool;
    use uuid::Uuid;

    fn sample_photo<'a>(file_name: &'a str, s3_key: &'a str) -> NewPhoto<'a> {
        NewPhoto {
            file_path: s3_key,
            file_name,
            file_size: 1024,
            mime_type: "image/jpeg",
            storage_url: "https://bucket.s3.us-east-1.amazonaws.com/photos/x.jpg",
            s3_key: Some(s3_key),
            uploader_name: Some("Convidado Teste"),
            is_video: false,
            date_taken: None,
            latitude: None,
            longitude: None,
        }
    }

    // ========================================================================
    // Photo Tests
    // ========================================================================

    #[sqlx::test]
    async fn test_insert_returns_generated_fields(pool: PgPool) {
        let photo = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("Failed to insert photo");

        assert_eq!(photo.file_name, "a.jpg");
        assert_eq!(photo.s3_key.as_deref(), Some("photos/a.jpg"));
        assert!(!photo.is_video);

        let found = find_photo_by_id(&pool, photo.id)
            .await
            .expect("Query failed")
            .expect("Photo not found");
        assert_eq!(found.id, photo.id);
    }

    #[sqlx::test]
    async fn test_insert_preserves_capture_metadata(pool: PgPool) {
        let date_taken = NaiveDate::from_ymd_opt(2026, 12, 19)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        let mut new_photo = sample_photo("festa.jpg", "photos/festa.jpg");
        new_photo.date_taken = Some(date_taken);
        new_photo.latitude = Some(-23.55);
        new_photo.longitude = Some(-46.63);

        let photo = insert_photo(&pool, &new_photo)
            .await
            .expect("Failed to insert photo");

        assert_eq!(photo.date_taken, Some(date_taken));
        assert_eq!(photo.latitude, Some(-23.55));
        assert_eq!(photo.longitude, Some(-46.63));
    }

    #[sqlx::test]
    async fn test_storage_key_uniqueness(pool: PgPool) {
        insert_photo(&pool, &sample_photo("a.jpg", "photos/dup.jpg"))
            .await
            .expect("Failed to insert first photo");

        let result = insert_photo(&pool, &sample_photo("b.jpg", "photos/dup.jpg")).await;
        assert!(result.is_err(), "Should fail on duplicate storage key");
    }

    #[sqlx::test]
    async fn test_list_newest_first(pool: PgPool) {
        let first = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert a");
        // Keep the created_at timestamps strictly ordered
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let second = insert_photo(&pool, &sample_photo("b.jpg", "photos/b.jpg"))
            .await
            .expect("insert b");

        let photos = list_photos(&pool).await.expect("Query failed");
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id, second.id, "Most recent record comes first");
        assert_eq!(photos[1].id, first.id);
    }

    #[sqlx::test]
    async fn test_delete_returns_prior_state(pool: PgPool) {
        let photo = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert");

        let deleted = delete_photo(&pool, photo.id)
            .await
            .expect("Query failed")
            .expect("Photo should exist");
        assert_eq!(deleted.s3_key.as_deref(), Some("photos/a.jpg"));

        assert!(find_photo_by_id(&pool, photo.id)
            .await
            .expect("Query failed")
            .is_none());
    }

    #[sqlx::test]
    async fn test_delete_missing_id_is_none(pool: PgPool) {
        insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert");

        let deleted = delete_photo(&pool, Uuid::new_v4()).await.expect("Query failed");
        assert!(deleted.is_none());

        // Record set unchanged
        assert_eq!(list_photos(&pool).await.expect("Query failed").len(), 1);
    }

    #[sqlx::test]
    async fn test_delete_cascades_reactions(pool: PgPool) {
        let photo = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert");
        toggle_reaction(&pool, photo.id, "❤️", "session-1")
            .await
            .expect("toggle");
        toggle_reaction(&pool, photo.id, "🔥", "session-2")
            .await
            .expect("toggle");

        delete_photo(&pool, photo.id)
            .await
            .expect("Query failed")
            .expect("Photo should exist");

        let counts = get_reaction_counts(&pool, photo.id, "session-1")
            .await
            .expect("Query failed");
        assert!(counts.is_empty(), "Reactions must cascade with the photo");
    }

    // ========================================================================
    // Reaction Tests
    // ========================================================================

    #[sqlx::test]
    async fn test_toggle_inserts_then_removes(pool: PgPool) {
        let photo = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert");

        let counts = toggle_reaction(&pool, photo.id, "❤️", "session-1")
            .await
            .expect("toggle on");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].emoji, "❤️");
        assert_eq!(counts[0].count, 1);
        assert!(counts[0].reacted);

        // Same emoji again: idempotent-to-empty
        let counts = toggle_reaction(&pool, photo.id, "❤️", "session-1")
            .await
            .expect("toggle off");
        assert!(counts.is_empty());
    }

    #[sqlx::test]
    async fn test_toggle_different_emoji_switches_in_place(pool: PgPool) {
        let photo = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert");

        toggle_reaction(&pool, photo.id, "❤️", "session-1")
            .await
            .expect("toggle on");
        let counts = toggle_reaction(&pool, photo.id, "😂", "session-1")
            .await
            .expect("switch");

        assert_eq!(counts.len(), 1, "Switch must not leave the old reaction");
        assert_eq!(counts[0].emoji, "😂");
        assert_eq!(counts[0].count, 1);

        let row = find_reaction(&pool, photo.id, "session-1")
            .await
            .expect("Query failed")
            .expect("Reaction should exist");
        assert_eq!(row.emoji, "😂");
    }

    #[sqlx::test]
    async fn test_at_most_one_row_per_pair(pool: PgPool) {
        let photo = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert");

        for emoji in ["❤️", "😍", "👏", "😍"] {
            toggle_reaction(&pool, photo.id, emoji, "session-1")
                .await
                .expect("toggle");
        }

        let rows: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM photo_reactions WHERE photo_id = $1 AND session_id = $2",
        )
        .bind(photo.id)
        .bind("session-1")
        .fetch_one(&pool)
        .await
        .expect("Query failed");
        assert!(rows.0 <= 1, "Never more than one row per (photo, session)");
    }

    #[sqlx::test]
    async fn test_counts_aggregate_across_sessions(pool: PgPool) {
        let photo = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert");

        toggle_reaction(&pool, photo.id, "❤️", "session-1")
            .await
            .expect("toggle");
        toggle_reaction(&pool, photo.id, "❤️", "session-2")
            .await
            .expect("toggle");
        toggle_reaction(&pool, photo.id, "🔥", "session-3")
            .await
            .expect("toggle");

        let counts = get_reaction_counts(&pool, photo.id, "session-2")
            .await
            .expect("Query failed");
        assert_eq!(counts.len(), 2);
        // Most-used first
        assert_eq!(counts[0].emoji, "❤️");
        assert_eq!(counts[0].count, 2);
        assert!(counts[0].reacted);
        assert_eq!(counts[1].emoji, "🔥");
        assert!(!counts[1].reacted);
    }

    #[sqlx::test]
    async fn test_batch_counts_keyed_by_requested_ids(pool: PgPool) {
        let with_reactions = insert_photo(&pool, &sample_photo("a.jpg", "photos/a.jpg"))
            .await
            .expect("insert");
        let without_reactions = insert_photo(&pool, &sample_photo("b.jpg", "photos/b.jpg"))
            .await
            .expect("insert");
        let outside_set = insert_photo(&pool, &sample_photo("c.jpg", "photos/c.jpg"))
            .await
            .expect("insert");

        toggle_reaction(&pool, with_reactions.id, "👏", "session-1")
            .await
            .expect("toggle");
        toggle_reaction(&pool, outside_set.id, "❤️", "session-1")
            .await
            .expect("toggle");

        let batch = get_reaction_counts_batch(
            &pool,
            &[with_reactions.id, without_reactions.id],
            "session-1",
        )
        .await
        .expect("Query failed");

        assert_eq!(batch.len(), 1, "Only photos with reactions appear");
        assert!(batch.contains_key(&with_reactions.id));
        assert!(
            !batch.contains_key(&outside_set.id),
            "Ids outside the requested set never appear"
        );
    }

    #[sqlx::test]
    async fn test_batch_counts_empty_input(pool: PgPool) {
        let batch = get_reaction_counts_batch(&pool, &[], "session-1")
            .await
            .expect("Query failed");
        assert!(batch.is_empty());
    }
}

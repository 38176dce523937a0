//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.

use std::collections::HashMap;

use gala_common::ReactionCount;
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

use super::models::{NewPhoto, Photo, PhotoReaction};

/// Log and return a database error with context.
///
/// This helper ensures all database errors are logged with relevant context
/// before being propagated, making production debugging easier.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

// ============================================================================
// Photo Queries
// ============================================================================

/// Insert a photo/video record and return it with generated id/timestamp.
pub async fn insert_photo(pool: &PgPool, photo: &NewPhoto<'_>) -> sqlx::Result<Photo> {
    sqlx::query_as::<_, Photo>(
        r"
        INSERT INTO photos (
            file_path, file_name, file_size, mime_type,
            storage_url, s3_key, uploader_name, is_video,
            date_taken, latitude, longitude
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        ",
    )
    .bind(photo.file_path)
    .bind(photo.file_name)
    .bind(photo.file_size)
    .bind(photo.mime_type)
    .bind(photo.storage_url)
    .bind(photo.s3_key)
    .bind(photo.uploader_name)
    .bind(photo.is_video)
    .bind(photo.date_taken)
    .bind(photo.latitude)
    .bind(photo.longitude)
    .fetch_one(pool)
    .await
    .map_err(db_error!("insert_photo", file_name = %photo.file_name))
}

/// Insert a batch of photo records atomically.
///
/// One transaction for the whole batch: a failure on any row rolls back
/// everything, so a confirm call never persists partially.
pub async fn insert_photos_batch(
    pool: &PgPool,
    photos: &[NewPhoto<'_>],
) -> sqlx::Result<Vec<Photo>> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(photos.len());

    for photo in photos {
        let row = sqlx::query_as::<_, Photo>(
            r"
            INSERT INTO photos (
                file_path, file_name, file_size, mime_type,
                storage_url, s3_key, uploader_name, is_video,
                date_taken, latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            ",
        )
        .bind(photo.file_path)
        .bind(photo.file_name)
        .bind(photo.file_size)
        .bind(photo.mime_type)
        .bind(photo.storage_url)
        .bind(photo.s3_key)
        .bind(photo.uploader_name)
        .bind(photo.is_video)
        .bind(photo.date_taken)
        .bind(photo.latitude)
        .bind(photo.longitude)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error!("insert_photos_batch", file_name = %photo.file_name))?;
        created.push(row);
    }

    tx.commit().await?;
    Ok(created)
}

/// List every record, newest first. No pagination — guest-list scale.
pub async fn list_photos(pool: &PgPool) -> sqlx::Result<Vec<Photo>> {
    sqlx::query_as::<_, Photo>("SELECT * FROM photos ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Find a photo by ID.
pub async fn find_photo_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Photo>> {
    sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_photo_by_id", photo_id = %id))
}

/// Delete a photo by ID, returning its prior state so the caller can clean
/// up the stored object. `None` means no such record existed.
///
/// Reactions go with it via `ON DELETE CASCADE`.
pub async fn delete_photo(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Photo>> {
    sqlx::query_as::<_, Photo>("DELETE FROM photos WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("delete_photo", photo_id = %id))
}

// ============================================================================
// Reaction Queries
// ============================================================================

#[derive(Debug, FromRow)]
struct ReactionCountRow {
    emoji: String,
    count: i64,
    reacted: bool,
}

impl From<ReactionCountRow> for ReactionCount {
    fn from(row: ReactionCountRow) -> Self {
        Self {
            emoji: row.emoji,
            count: row.count,
            reacted: row.reacted,
        }
    }
}

#[derive(Debug, FromRow)]
struct BatchReactionCountRow {
    photo_id: Uuid,
    emoji: String,
    count: i64,
    reacted: bool,
}

/// Per-emoji reaction counts for one photo, flagging whether the given
/// session contributed to each count. Ordered most-used first.
pub async fn get_reaction_counts(
    pool: &PgPool,
    photo_id: Uuid,
    session_id: &str,
) -> sqlx::Result<Vec<ReactionCount>> {
    let rows = sqlx::query_as::<_, ReactionCountRow>(
        r"
        SELECT
            emoji,
            COUNT(*) AS count,
            BOOL_OR(session_id = $2) AS reacted
        FROM photo_reactions
        WHERE photo_id = $1
        GROUP BY emoji
        ORDER BY count DESC
        ",
    )
    .bind(photo_id)
    .bind(session_id)
    .fetch_all(pool)
    .await
    .map_err(db_error!("get_reaction_counts", photo_id = %photo_id))?;

    Ok(rows.into_iter().map(ReactionCount::from).collect())
}

/// Reaction counts for a set of photos in one round trip, keyed by photo
/// id. Photos without reactions are absent from the result; ids outside
/// the requested set never appear.
pub async fn get_reaction_counts_batch(
    pool: &PgPool,
    photo_ids: &[Uuid],
    session_id: &str,
) -> sqlx::Result<HashMap<Uuid, Vec<ReactionCount>>> {
    if photo_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, BatchReactionCountRow>(
        r"
        SELECT
            photo_id,
            emoji,
            COUNT(*) AS count,
            BOOL_OR(session_id = $2) AS reacted
        FROM photo_reactions
        WHERE photo_id = ANY($1)
        GROUP BY photo_id, emoji
        ORDER BY count DESC
        ",
    )
    .bind(photo_ids)
    .bind(session_id)
    .fetch_all(pool)
    .await
    .map_err(db_error!("get_reaction_counts_batch", photos = photo_ids.len()))?;

    let mut result: HashMap<Uuid, Vec<ReactionCount>> = HashMap::new();
    for row in rows {
        result.entry(row.photo_id).or_default().push(ReactionCount {
            emoji: row.emoji,
            count: row.count,
            reacted: row.reacted,
        });
    }
    Ok(result)
}

/// Find the session's existing reaction on a photo, if any.
pub async fn find_reaction(
    pool: &PgPool,
    photo_id: Uuid,
    session_id: &str,
) -> sqlx::Result<Option<PhotoReaction>> {
    sqlx::query_as::<_, PhotoReaction>(
        "SELECT * FROM photo_reactions WHERE photo_id = $1 AND session_id = $2",
    )
    .bind(photo_id)
    .bind(session_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_reaction", photo_id = %photo_id))
}

/// Toggle a session's reaction on a photo and return the refreshed counts.
///
/// Exactly one of three outcomes per call:
/// - no existing reaction: insert
/// - existing reaction with the same emoji: delete (toggle off)
/// - existing reaction with a different emoji: update in place (switch)
///
/// The insert carries `ON CONFLICT DO NOTHING` so a concurrent
/// double-submit from one session loses as a no-op; the
/// `UNIQUE (photo_id, session_id)` constraint is the backstop that makes a
/// duplicate row impossible.
pub async fn toggle_reaction(
    pool: &PgPool,
    photo_id: Uuid,
    emoji: &str,
    session_id: &str,
) -> sqlx::Result<Vec<ReactionCount>> {
    match find_reaction(pool, photo_id, session_id).await? {
        Some(existing) if existing.emoji == emoji => {
            sqlx::query("DELETE FROM photo_reactions WHERE id = $1")
                .bind(existing.id)
                .execute(pool)
                .await
                .map_err(db_error!("toggle_reaction_delete", photo_id = %photo_id))?;
        }
        Some(existing) => {
            sqlx::query("UPDATE photo_reactions SET emoji = $1, created_at = NOW() WHERE id = $2")
                .bind(emoji)
                .bind(existing.id)
                .execute(pool)
                .await
                .map_err(db_error!("toggle_reaction_update", photo_id = %photo_id))?;
        }
        None => {
            sqlx::query(
                r"
                INSERT INTO photo_reactions (photo_id, emoji, session_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (photo_id, session_id) DO NOTHING
                ",
            )
            .bind(photo_id)
            .bind(emoji)
            .bind(session_id)
            .execute(pool)
            .await
            .map_err(db_error!("toggle_reaction_insert", photo_id = %photo_id))?;
        }
    }

    get_reaction_counts(pool, photo_id, session_id).await
}

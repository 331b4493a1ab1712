//! Repository for the `videos` table.

use chrono::NaiveDate;
use cliplog_core::RecordId;
use sqlx::{Executor, Sqlite};

use crate::models::video::{CreateVideo, VideoRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, filename, checksum, comment, edited, produced, created_date, produced_date";

/// Provides queries and lifecycle updates for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video record, returning the created row.
    pub async fn create<'e, E>(executor: E, body: &CreateVideo) -> Result<VideoRow, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO videos (filename, comment, created_date)
             VALUES (?1, ?2, ?3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(&body.filename)
            .bind(&body.comment)
            .bind(body.created_date)
            .fetch_one(executor)
            .await
    }

    /// Find a single video by ID.
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: RecordId,
    ) -> Result<Option<VideoRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = ?1");
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a video by its unique filename.
    pub async fn find_by_filename<'e, E>(
        executor: E,
        filename: &str,
    ) -> Result<Option<VideoRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE filename = ?1");
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(filename)
            .fetch_optional(executor)
            .await
    }

    /// List all videos, ordered by ID.
    pub async fn list_all<'e, E>(executor: E) -> Result<Vec<VideoRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {COLUMNS} FROM videos ORDER BY id");
        sqlx::query_as::<_, VideoRow>(&query).fetch_all(executor).await
    }

    /// Videos whose checksum is absent or empty.
    pub async fn list_missing_checksum<'e, E>(executor: E) -> Result<Vec<VideoRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE checksum IS NULL OR checksum = ''
             ORDER BY id"
        );
        sqlx::query_as::<_, VideoRow>(&query).fetch_all(executor).await
    }

    /// Videos carrying `checksum`.
    pub async fn find_by_checksum<'e, E>(
        executor: E,
        checksum: &str,
    ) -> Result<Vec<VideoRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE checksum = ?1 ORDER BY id");
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(checksum)
            .fetch_all(executor)
            .await
    }

    /// Set the checksum of a video that has none. Returns `false` when the
    /// video is missing or its checksum is already set.
    pub async fn set_checksum<'e, E>(
        executor: E,
        id: RecordId,
        checksum: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE videos SET checksum = ?2
             WHERE id = ?1 AND (checksum IS NULL OR checksum = '')",
        )
        .bind(id)
        .bind(checksum)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that a clip was attached.
    pub async fn mark_edited<'e, E>(executor: E, id: RecordId) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE videos SET edited = 1 WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a video produced on `date`.
    pub async fn mark_produced<'e, E>(
        executor: E,
        id: RecordId,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE videos SET produced = 1, produced_date = ?2 WHERE id = ?1")
            .bind(id)
            .bind(date)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Videos that have at least one clip, ordered by filename.
    pub async fn list_with_clips<'e, E>(executor: E) -> Result<Vec<VideoRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM videos v
             WHERE EXISTS (SELECT 1 FROM clips c WHERE c.video_id = v.id)
             ORDER BY filename"
        );
        sqlx::query_as::<_, VideoRow>(&query).fetch_all(executor).await
    }

    /// First unproduced video with clips whose filename sorts after `after`
    /// (from the start when `None`).
    pub async fn next_unproduced<'e, E>(
        executor: E,
        after: Option<&str>,
    ) -> Result<Option<VideoRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM videos v
             WHERE produced = 0
               AND EXISTS (SELECT 1 FROM clips c WHERE c.video_id = v.id)
               AND (?1 IS NULL OR filename > ?1)
             ORDER BY filename
             LIMIT 1"
        );
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(after)
            .fetch_optional(executor)
            .await
    }

    /// Delete a video; its clips go with it.
    pub async fn delete<'e, E>(executor: E, id: RecordId) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Scripted data-entry sessions.
//!
//! Drives the interactive loop from an in-memory script with a canned media
//! probe, then checks what reached the database.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use cliplog_app::{Annotation, JobError};
use cliplog_core::Result;
use cliplog_media::DurationProbe;
use cliplog_store::{ClipRepo, CreateVideo, VideoRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::{Connection, SqlitePool};

// ── Helpers ────────────────────────────────────────────────────

struct CannedProbe;

impl DurationProbe for CannedProbe {
    fn probe_output(&self, _path: &Path) -> Result<String> {
        Ok("  Duration: 00:01:30.27, start: 0.000000, bitrate: 512 kb/s\n".to_string())
    }
}

async fn run(pool: &SqlitePool, script: &str) -> cliplog_app::Result<cliplog_app::AnnotateSummary> {
    run_with_output(pool, script).await.0
}

async fn run_with_output(
    pool: &SqlitePool,
    script: &str,
) -> (cliplog_app::Result<cliplog_app::AnnotateSummary>, String) {
    let annotation = Annotation {
        pool,
        probe: &CannedProbe,
        videos_dir: Path::new("/media"),
        default_activity: "BELOW",
        today: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    };
    let mut input = script.as_bytes();
    let mut out = Vec::new();
    let result = annotation.run("a.mp4", None, &mut input, &mut out).await;
    (result, String::from_utf8_lossy(&out).into_owned())
}

/// A file database that fails fast on lock contention, with `a.mp4`
/// already registered.
async fn contended_pool(dir: &Path) -> (SqlitePool, SqliteConnectOptions) {
    let options = SqliteConnectOptions::new()
        .filename(dir.join("clips.db"))
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::ZERO);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options.clone())
        .await
        .unwrap();
    cliplog_store::MIGRATOR.run(&pool).await.unwrap();
    let body = CreateVideo {
        filename: "a.mp4".to_string(),
        comment: None,
        created_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    };
    VideoRepo::create(&pool, &body).await.unwrap();
    (pool, options)
}

/// Take the write lock on a second connection and keep it.
async fn hold_write_lock(options: &SqliteConnectOptions) -> SqliteConnection {
    let mut conn = SqliteConnection::connect_with(options).await.unwrap();
    sqlx::query("BEGIN IMMEDIATE").execute(&mut conn).await.unwrap();
    conn
}

// ── Sessions ───────────────────────────────────────────────────

#[tokio::test]
async fn session_stores_clips_with_defaults() {
    let pool = cliplog_store::connect_in_memory().await.unwrap();
    let script = [
        "12;00", "", "", "", // defaults for duration, activity and mag
        "05:00", "10:00", "?", "U", "3",
        "0:10:45", // frame overflow, re-prompted
        "",
    ]
    .join("\n");
    let summary = run(&pool, &script).await.unwrap();
    assert_eq!(summary.clips, 2);

    let clips = ClipRepo::list_for_video(&pool, summary.video_id).await.unwrap();
    let fields: Vec<(&str, &str, &str, i64)> = clips
        .iter()
        .map(|c| (c.start_time.as_str(), c.duration.as_str(), c.activity.as_str(), c.mag))
        .collect();
    assert_eq!(
        fields,
        vec![("0:12:00", "1:18:08", "BELOW", 1), ("1:05:00", "10:00", "U", 3)]
    );
    assert_eq!(clips[0].start_frame, Some(360));

    let video = VideoRepo::find_by_id(&pool, summary.video_id).await.unwrap().unwrap();
    assert!(video.edited);
    assert_eq!(video.created_date, NaiveDate::from_ymd_opt(2024, 2, 1));
}

#[tokio::test]
async fn edited_video_is_refused() {
    let pool = cliplog_store::connect_in_memory().await.unwrap();
    run(&pool, "0\n\n\n\n\n").await.unwrap();

    let err = run(&pool, "\n").await.unwrap_err();
    assert!(matches!(err, JobError::AlreadyEdited(name) if name == "a.mp4"));
}

#[tokio::test]
async fn empty_session_leaves_video_unedited() {
    let pool = cliplog_store::connect_in_memory().await.unwrap();
    let summary = run(&pool, "").await.unwrap();
    assert_eq!(summary.clips, 0);

    let video = VideoRepo::find_by_id(&pool, summary.video_id).await.unwrap().unwrap();
    assert!(!video.edited);
}

// ── Busy database ──────────────────────────────────────────────

#[tokio::test]
async fn busy_store_gives_up_at_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, options) = contended_pool(dir.path()).await;
    let _lock = hold_write_lock(&options).await;

    let (result, output) = run_with_output(&pool, "0\n\n\n\n").await;
    let err = result.unwrap_err();
    assert!(matches!(err, JobError::Store(ref e) if e.is_busy()), "{err:?}");
    assert_eq!(output.matches("Database is busy. Retry? ").count(), 1);
}

#[tokio::test]
async fn busy_store_asks_again_until_declined() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, options) = contended_pool(dir.path()).await;
    let mut lock = hold_write_lock(&options).await;

    let (result, output) = run_with_output(&pool, "0\n\n\n\ny\nn\n").await;
    assert!(matches!(result, Err(JobError::Store(ref e)) if e.is_busy()));
    assert_eq!(output.matches("Database is busy. Retry? ").count(), 2);

    sqlx::query("ROLLBACK").execute(&mut lock).await.unwrap();
    let video = VideoRepo::find_by_filename(&pool, "a.mp4").await.unwrap().unwrap();
    assert!(!video.edited);
    assert!(ClipRepo::list_for_video(&pool, video.id).await.unwrap().is_empty());
}

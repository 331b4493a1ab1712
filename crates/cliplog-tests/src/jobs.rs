//! Batch jobs against an in-memory database.
//!
//! Exercises cliplog-app jobs over cliplog-store repositories, with
//! cliplog-media hashing real files in a temp directory.

use chrono::NaiveDate;
use cliplog_app::{jobs, JobError};
use cliplog_core::{NewClip, RecordId};
use cliplog_media::Md5Hasher;
use cliplog_store::{ClipRepo, CreateVideo, VideoRepo};
use sqlx::SqlitePool;

// ── Helpers ────────────────────────────────────────────────────

async fn pool() -> SqlitePool {
    cliplog_store::connect_in_memory().await.unwrap()
}

async fn add_video(pool: &SqlitePool, filename: &str, comment: Option<&str>) -> RecordId {
    let body = CreateVideo {
        filename: filename.to_string(),
        comment: comment.map(str::to_string),
        created_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    };
    VideoRepo::create(pool, &body).await.unwrap().id
}

async fn add_clip(
    pool: &SqlitePool,
    video_id: RecordId,
    start: &str,
    duration: &str,
    activity: &str,
) {
    let clip = NewClip {
        start_time: start.to_string(),
        duration: duration.to_string(),
        activity: activity.to_string(),
        mag: 1,
    };
    let mut tx = pool.begin().await.unwrap();
    ClipRepo::create(&mut tx, video_id, &clip).await.unwrap();
    tx.commit().await.unwrap();
}

/// A row as older tools wrote it: no derived columns, no validation.
async fn add_legacy_clip(pool: &SqlitePool, video_id: RecordId, start: &str, duration: &str) {
    sqlx::query(
        "INSERT INTO clips (video_id, start_time, duration, activity, mag) VALUES (?1, ?2, ?3, 'U', 1)",
    )
    .bind(video_id)
    .bind(start)
    .bind(duration)
    .execute(pool)
    .await
    .unwrap();
}

// ── Backfill ───────────────────────────────────────────────────

#[tokio::test]
async fn backfill_fills_good_rows_and_skips_bad_ones() {
    let pool = pool().await;
    let v = add_video(&pool, "a.mp4", None).await;
    add_legacy_clip(&pool, v, "0:00:00", "10:00").await;
    add_legacy_clip(&pool, v, "0:10:00", "5:45").await;

    let summary = jobs::backfill_derived(&pool).await.unwrap();
    assert_eq!((summary.updated, summary.skipped), (1, 1));

    let missing = ClipRepo::list_missing_derived(&pool).await.unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].duration, "5:45");
    assert!(missing[0].duration_seconds.is_none());

    let again = jobs::backfill_derived(&pool).await.unwrap();
    assert_eq!((again.updated, again.skipped), (0, 1));
}

// ── Audit & statistics ─────────────────────────────────────────

#[tokio::test]
async fn statistics_per_activity() {
    let pool = pool().await;
    let v = add_video(&pool, "a.mp4", None).await;
    add_clip(&pool, v, "0:00:00", "10:00", "A").await;
    add_clip(&pool, v, "0:10:00", "20:00", "A").await;
    add_clip(&pool, v, "0:30:00", "5:00", "B").await;

    let report = jobs::statistics(&pool).await.unwrap();
    let a = report.category("A").unwrap();
    assert_eq!(a.count, 2);
    assert!((a.mean - 15.0).abs() < 1e-12);
    let total = report.total.as_ref().unwrap();
    assert_eq!(total.count, 3);
    assert!((total.mean - 35.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn statistics_refuse_unusable_durations() {
    let pool = pool().await;
    let v = add_video(&pool, "a.mp4", None).await;
    add_clip(&pool, v, "0:00:00", "10:00", "A").await;
    add_legacy_clip(&pool, v, "0:10:00", "1:02:99").await;

    match jobs::statistics(&pool).await {
        Err(JobError::InvalidDurations(invalid)) => {
            assert_eq!(invalid.len(), 1);
            assert_eq!(invalid[0].video_id, v);
            assert_eq!(invalid[0].duration, "1:02:99");
        }
        other => panic!("expected refusal, got {other:?}"),
    }

    let audit = jobs::audit(&pool).await.unwrap();
    assert!(audit.has_fatal());
    assert_eq!(audit.checked, 2);
}

#[tokio::test]
async fn audit_flags_short_start_times() {
    let pool = pool().await;
    let v = add_video(&pool, "a.mp4", None).await;
    add_legacy_clip(&pool, v, "12:15", "10:00").await;
    add_legacy_clip(&pool, v, "0:12:15", "10:00").await;

    let audit = jobs::audit(&pool).await.unwrap();
    assert!(!audit.has_fatal());
    assert_eq!(audit.flagged_starts.len(), 1);
    assert_eq!(audit.flagged_starts[0].start_time, "12:15");

    let names = jobs::filenames(&pool).await.unwrap();
    assert_eq!(names.get(&v).map(String::as_str), Some("a.mp4"));
}

// ── Checksums & duplicates ─────────────────────────────────────

#[tokio::test]
async fn checksums_and_duplicate_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.mp4"), b"same bytes").unwrap();
    std::fs::write(dir.path().join("b.mp4"), b"same bytes").unwrap();
    std::fs::write(dir.path().join("c.mp4"), b"other bytes").unwrap();
    std::fs::write(dir.path().join("e.mp4"), b"other bytes").unwrap();

    let pool = pool().await;
    let a = add_video(&pool, "a.mp4", None).await;
    let b = add_video(&pool, "b.mp4", None).await;
    add_video(&pool, "c.mp4", None).await;
    add_video(&pool, "d.mp4", None).await;
    add_video(&pool, "e.mp4", Some("dup of c.mp4")).await;

    let summary = jobs::compute_checksums(&pool, dir.path(), &Md5Hasher).await.unwrap();
    assert_eq!(summary.stored, 4);
    assert_eq!(summary.missing_files, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.duplicates, 2);

    let groups = jobs::duplicate_groups(&pool).await.unwrap();
    assert_eq!(groups.len(), 1);
    let ids: Vec<RecordId> = groups[0].members.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![a, b]);

    let rerun = jobs::compute_checksums(&pool, dir.path(), &Md5Hasher).await.unwrap();
    assert_eq!((rerun.stored, rerun.missing_files), (0, 1));
}

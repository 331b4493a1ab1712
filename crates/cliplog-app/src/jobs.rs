//! Batch jobs over the whole database.

use std::collections::HashMap;
use std::path::Path;

use cliplog_core::{
    aggregate, audit_clips, duration_rows, find_duplicate_groups, AuditReport, Clip,
    DuplicateGroup, RecordId, StatsReport, Video,
};
use cliplog_media::ContentHasher;
use cliplog_store::{ClipRepo, VideoRepo};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::error::{JobError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillSummary {
    pub updated: usize,
    /// Clips whose strings do not parse; left untouched.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChecksumSummary {
    pub stored: usize,
    pub missing_files: usize,
    pub failed: usize,
    /// Stored checksums that another video already had.
    pub duplicates: usize,
}

// ── Derived fields ──────────────────────────────────────────────

/// Fill `start_frame` and `duration_seconds` wherever either is missing.
pub async fn backfill_derived(pool: &SqlitePool) -> Result<BackfillSummary> {
    let mut summary = BackfillSummary::default();
    for row in ClipRepo::list_missing_derived(pool).await? {
        let clip = Clip::from(row);
        match clip.derive() {
            Ok(derived) => {
                ClipRepo::update_derived(pool, clip.id, &derived).await?;
                summary.updated += 1;
            }
            Err(e) => {
                error!(
                    clip_id = clip.id,
                    video_id = clip.video_id,
                    start_time = %clip.start_time,
                    duration = %clip.duration,
                    error = %e,
                    "Cannot derive clip fields"
                );
                summary.skipped += 1;
            }
        }
    }
    info!(updated = summary.updated, skipped = summary.skipped, "Backfill done");
    Ok(summary)
}

// ── Audit & statistics ──────────────────────────────────────────

pub async fn load_clips(pool: &SqlitePool) -> Result<Vec<Clip>> {
    Ok(ClipRepo::list_all(pool)
        .await?
        .into_iter()
        .map(Clip::from)
        .collect())
}

/// Audit every stored clip.
pub async fn audit(pool: &SqlitePool) -> Result<AuditReport> {
    let clips = load_clips(pool).await?;
    Ok(audit_clips(&clips))
}

/// Filenames keyed by video id.
pub async fn filenames(pool: &SqlitePool) -> Result<HashMap<RecordId, String>> {
    Ok(VideoRepo::list_all(pool)
        .await?
        .into_iter()
        .map(|v| (v.id, v.filename))
        .collect())
}

/// Per-activity duration statistics. Refused while any duration is
/// unusable.
pub async fn statistics(pool: &SqlitePool) -> Result<StatsReport> {
    let clips = load_clips(pool).await?;
    let rows = duration_rows(&clips).map_err(JobError::InvalidDurations)?;
    Ok(aggregate(rows))
}

// ── Checksums & duplicates ──────────────────────────────────────

/// Compute and store checksums for videos that have none.
pub async fn compute_checksums<H: ContentHasher>(
    pool: &SqlitePool,
    videos_dir: &Path,
    hasher: &H,
) -> Result<ChecksumSummary> {
    let mut summary = ChecksumSummary::default();

    for row in VideoRepo::list_missing_checksum(pool).await? {
        let path = videos_dir.join(&row.filename);
        if !path.is_file() {
            warn!(video_id = row.id, path = %path.display(), "Media file missing");
            summary.missing_files += 1;
            continue;
        }

        let digest = match hasher.hash_file(&path) {
            Ok(digest) => digest,
            Err(e) => {
                error!(video_id = row.id, path = %path.display(), error = %e, "Hashing failed");
                summary.failed += 1;
                continue;
            }
        };

        let existing = VideoRepo::find_by_checksum(pool, &digest).await?;
        if !existing.is_empty() {
            let ids: Vec<RecordId> = existing.iter().map(|v| v.id).collect();
            warn!(video_id = row.id, checksum = %digest, ?ids, "Duplicate content");
            summary.duplicates += 1;
        }

        if VideoRepo::set_checksum(pool, row.id, &digest).await? {
            summary.stored += 1;
        }
    }

    info!(
        stored = summary.stored,
        missing = summary.missing_files,
        failed = summary.failed,
        duplicates = summary.duplicates,
        "Checksums done"
    );
    Ok(summary)
}

/// Unacknowledged duplicate groups.
pub async fn duplicate_groups(pool: &SqlitePool) -> Result<Vec<DuplicateGroup>> {
    let videos: Vec<Video> = VideoRepo::list_all(pool)
        .await?
        .into_iter()
        .map(Video::from)
        .collect();
    Ok(find_duplicate_groups(&videos))
}

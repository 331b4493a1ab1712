//! Audit of stored clip timecodes.
//!
//! Two severities: start times that fail the legacy point-in-time shape are
//! flagged for review; durations that do not parse are fatal because they
//! would silently drop out of the statistics.

use crate::clip::{Clip, RecordId};
use crate::error::TimecodeError;
use crate::timecode;
use serde::Serialize;

/// A start time that needs a human look.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedStart {
    pub clip_id: RecordId,
    pub video_id: RecordId,
    pub start_time: String,
}

/// A clip whose duration cannot be used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidDuration {
    pub clip_id: RecordId,
    pub video_id: RecordId,
    pub start_time: String,
    pub duration: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: TimecodeError,
}

fn serialize_error<S: serde::Serializer>(error: &TimecodeError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub checked: usize,
    pub flagged_starts: Vec<FlaggedStart>,
    pub invalid_durations: Vec<InvalidDuration>,
}

impl AuditReport {
    /// True when some duration is unusable.
    pub fn has_fatal(&self) -> bool {
        !self.invalid_durations.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.flagged_starts.is_empty() && self.invalid_durations.is_empty()
    }

    /// Video ids referenced by any finding, sorted and distinct.
    pub fn video_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self
            .flagged_starts
            .iter()
            .map(|f| f.video_id)
            .chain(self.invalid_durations.iter().map(|d| d.video_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Check every clip's start and duration strings.
pub fn audit_clips<'a, I>(clips: I) -> AuditReport
where
    I: IntoIterator<Item = &'a Clip>,
{
    let mut report = AuditReport::default();
    for clip in clips {
        report.checked += 1;
        if !timecode::validate_point_in_time(&clip.start_time) {
            report.flagged_starts.push(FlaggedStart {
                clip_id: clip.id,
                video_id: clip.video_id,
                start_time: clip.start_time.clone(),
            });
        }
        if let Err(error) = clip.duration_timecode() {
            tracing::error!(
                clip_id = clip.id,
                video_id = clip.video_id,
                duration = %clip.duration,
                %error,
                "unusable clip duration"
            );
            report.invalid_durations.push(InvalidDuration {
                clip_id: clip.id,
                video_id: clip.video_id,
                start_time: clip.start_time.clone(),
                duration: clip.duration.clone(),
                error,
            });
        }
    }
    report
}

/// `(activity, seconds)` rows for the statistics engine.
///
/// Refuses to produce rows while any duration is unusable, so a bad record
/// can never vanish from the totals.
pub fn duration_rows(clips: &[Clip]) -> Result<Vec<(String, f64)>, Vec<InvalidDuration>> {
    let mut rows = Vec::with_capacity(clips.len());
    let mut invalid = Vec::new();
    for clip in clips {
        match clip.duration_timecode() {
            Ok(tc) => rows.push((clip.activity.clone(), tc.to_seconds())),
            Err(error) => invalid.push(InvalidDuration {
                clip_id: clip.id,
                video_id: clip.video_id,
                start_time: clip.start_time.clone(),
                duration: clip.duration.clone(),
                error,
            }),
        }
    }
    if invalid.is_empty() {
        Ok(rows)
    } else {
        Err(invalid)
    }
}

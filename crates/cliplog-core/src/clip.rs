//! Clip records and their cached derived fields.

use crate::error::TimecodeError;
use crate::timecode::Timecode;
use serde::{Deserialize, Serialize};

/// Database row id.
pub type RecordId = i64;

/// Magnitude assigned when none is entered.
pub const DEFAULT_MAGNITUDE: i64 = 1;

/// Values computed from a clip's start and duration strings.
///
/// Stored together: a clip has both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Frame index of the clip start.
    pub start_frame: i64,
    /// Duration in seconds; the fraction is `frames / 30`.
    pub duration_seconds: f64,
}

impl DerivedFields {
    /// Compute from the stored strings. Fails on the first bad field.
    pub fn compute(start_time: &str, duration: &str) -> Result<Self, TimecodeError> {
        let start = Timecode::parse(start_time)?;
        let duration = Timecode::parse(duration)?;
        Ok(Self {
            start_frame: start.to_frame_count() as i64,
            duration_seconds: duration.to_seconds(),
        })
    }

    /// Pair up nullable columns; a half-filled pair counts as missing.
    pub fn from_columns(start_frame: Option<i64>, duration_seconds: Option<f64>) -> Option<Self> {
        match (start_frame, duration_seconds) {
            (Some(start_frame), Some(duration_seconds)) => Some(Self {
                start_frame,
                duration_seconds,
            }),
            _ => None,
        }
    }
}

/// A clip of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: RecordId,
    pub video_id: RecordId,
    pub start_time: String,
    pub duration: String,
    pub activity: String,
    pub mag: i64,
    pub derived: Option<DerivedFields>,
}

impl Clip {
    /// Parsed start timecode.
    pub fn start(&self) -> Result<Timecode, TimecodeError> {
        Timecode::parse(&self.start_time)
    }

    /// Parsed duration timecode.
    pub fn duration_timecode(&self) -> Result<Timecode, TimecodeError> {
        Timecode::parse(&self.duration)
    }

    /// Derived fields recomputed from the string fields.
    pub fn derive(&self) -> Result<DerivedFields, TimecodeError> {
        DerivedFields::compute(&self.start_time, &self.duration)
    }

    /// Timecode where this clip ends.
    pub fn end(&self) -> Result<Timecode, TimecodeError> {
        Ok(self.start()?.add_by_frames(self.duration_timecode()?))
    }
}

/// A clip ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClip {
    pub start_time: String,
    pub duration: String,
    pub activity: String,
    pub mag: i64,
}

impl NewClip {
    /// Derived fields for the insert.
    pub fn derive(&self) -> Result<DerivedFields, TimecodeError> {
        DerivedFields::compute(&self.start_time, &self.duration)
    }
}

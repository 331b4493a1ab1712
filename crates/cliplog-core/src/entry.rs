//! Helpers for turning typed answers into clip records.
//!
//! The interactive prompt loop lives outside this crate; it feeds raw lines
//! into an [`EntrySession`] and stores the [`NewClip`] values it returns.
//! Numeric sub-fields of typed durations are coerced leniently (a bad value
//! becomes zero and is logged); every timecode is then validated strictly.

use crate::activity::ActivityCodes;
use crate::clip::{NewClip, DEFAULT_MAGNITUDE};
use crate::error::TimecodeError;
use crate::timecode::{self, Timecode};

/// Prefix offered for the first clip's start time.
pub const INITIAL_AUTO_FILL: &str = "0:";

/// Parse a numeric sub-field.
pub fn parse_field(text: &str) -> Result<u32, TimecodeError> {
    text.trim()
        .parse()
        .map_err(|_| TimecodeError::NumericCoercionFailure {
            value: text.to_string(),
        })
}

/// Lenient form of [`parse_field`]: logs the bad value and uses zero.
pub fn coerce_field(text: &str) -> u32 {
    parse_field(text).unwrap_or_else(|error| {
        tracing::warn!(value = %text, %error, "bad numeric value, using 0");
        0
    })
}

/// Trim and fix the common `;` for `:` typo.
pub fn clean(text: &str) -> String {
    text.trim().replace(';', ":")
}

/// Expand a typed start time.
///
/// `0` means the very beginning; a two-field entry is padded and prefixed
/// with the running auto-fill (`0:` + `12:05` -> `0:12:05`).
pub fn expand_start_time(text: &str, auto_fill: &str) -> String {
    let cleaned = clean(text);
    if cleaned == "0" {
        return "0:00:00".to_string();
    }
    if let Some((left, right)) = cleaned.split_once(':') {
        let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !right.contains(':') && is_digits(left) && is_digits(right) {
            return format!(
                "{auto_fill}{:02}:{:02}",
                coerce_field(left),
                coerce_field(right)
            );
        }
    }
    cleaned
}

/// Pad each field of a typed duration to two digits, first field unpadded.
pub fn pad_duration(text: &str) -> String {
    let cleaned = clean(text);
    cleaned
        .split(':')
        .enumerate()
        .map(|(index, part)| {
            let value = coerce_field(part);
            if index == 0 {
                value.to_string()
            } else {
                format!("{value:02}")
            }
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// Default duration: from the start time to the end of the media.
pub fn default_duration(time_remaining: &str, start_time: &str) -> Result<Timecode, TimecodeError> {
    timecode::subtract(time_remaining, start_time)
}

/// Auto-fill prefix for the next start time: every field of
/// `start + duration` above seconds, e.g. `1:05:10` -> `1:`.
///
/// `None` when the end is under a minute; the caller keeps its prefix.
pub fn next_auto_fill(start_time: &str, duration: &str) -> Result<Option<String>, TimecodeError> {
    let end = Timecode::parse(start_time)?.add_by_frames(Timecode::parse(duration)?);
    let canonical = end.to_string();
    let parts: Vec<&str> = canonical.rsplitn(3, ':').collect();
    Ok(match parts.as_slice() {
        [_, _, prefix] => Some(format!("{prefix}:")),
        _ => None,
    })
}

/// State carried between clips while annotating one video.
#[derive(Debug, Clone)]
pub struct EntrySession {
    activities: ActivityCodes,
    time_remaining: String,
    auto_fill: String,
    activity: String,
    clip_number: u32,
}

impl EntrySession {
    /// Start a session for a video whose probed length is `time_remaining`.
    pub fn new(
        activities: ActivityCodes,
        time_remaining: Timecode,
        default_activity: impl Into<String>,
    ) -> Self {
        Self {
            activities,
            time_remaining: time_remaining.to_string(),
            auto_fill: INITIAL_AUTO_FILL.to_string(),
            activity: default_activity.into(),
            clip_number: 1,
        }
    }

    /// One-based number of the clip being entered.
    pub fn clip_number(&self) -> u32 {
        self.clip_number
    }

    /// Prefix shown in the start-time prompt.
    pub fn auto_fill(&self) -> &str {
        &self.auto_fill
    }

    /// Known codes, including the ones typed during this session.
    pub fn activities(&self) -> &ActivityCodes {
        &self.activities
    }

    /// Activity used when the answer is blank.
    pub fn activity(&self) -> &str {
        &self.activity
    }

    /// Expand a start-time answer. `None` on a blank line ends the video.
    pub fn start_time(&self, raw: &str) -> Option<String> {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return None;
        }
        Some(expand_start_time(&cleaned, &self.auto_fill))
    }

    /// Duration offered as the default for `start_time`.
    pub fn suggested_duration(&self, start_time: &str) -> Result<Timecode, TimecodeError> {
        default_duration(&self.time_remaining, start_time)
    }

    /// Build a clip from the answers and advance the session.
    ///
    /// Blank duration, activity or magnitude answers take their defaults.
    pub fn accept(
        &mut self,
        start_time: &str,
        raw_duration: &str,
        raw_activity: &str,
        raw_mag: &str,
    ) -> Result<NewClip, TimecodeError> {
        Timecode::parse(start_time)?;

        let duration = if clean(raw_duration).is_empty() {
            self.suggested_duration(start_time)?.to_string()
        } else {
            pad_duration(raw_duration)
        };
        Timecode::parse(&duration)?;

        let activity = match raw_activity.trim() {
            "" => self.activity.clone(),
            typed => self.activities.resolve(typed).into_code(),
        };

        let mag = match raw_mag.trim() {
            "" => DEFAULT_MAGNITUDE,
            typed => i64::from(coerce_field(typed)),
        };

        if let Some(prefix) = next_auto_fill(start_time, &duration)? {
            self.auto_fill = prefix;
        }
        self.activities.insert(&activity);
        self.activity.clone_from(&activity);
        self.clip_number += 1;

        Ok(NewClip {
            start_time: start_time.to_string(),
            duration,
            activity,
            mag,
        })
    }
}

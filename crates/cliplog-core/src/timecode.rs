//! Frame-accurate timecodes at a fixed 30 frames per second (non-drop).
//!
//! A [`Timecode`] is a duration or an instant split into hours, minutes,
//! seconds and frames. Its canonical value is the frame count; every
//! conversion and all arithmetic goes through that integer so results are
//! exact. Text comes in three shorthand shapes, tried in this order:
//!
//! ```text
//! SS:FF          seconds, frames
//! MM:SS:FF       minutes, seconds, frames
//! HH:MM:SS:FF    hours, minutes, seconds, frames
//! ```
//!
//! Leading fields are one or two digits, the frame field is always two.

use crate::error::TimecodeError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Frames per second. Variable or drop-frame rates are not supported.
pub const FPS: u64 = 30;

const FRAMES_PER_MINUTE: u64 = FPS * 60;
const FRAMES_PER_HOUR: u64 = FRAMES_PER_MINUTE * 60;

static SECONDS_FRAMES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid regex"));
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2}):(\d{2})$").expect("valid regex"));
static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{1,2}):(\d{1,2}):(\d{2})$").expect("valid regex")
});

// Legacy start-time shape. Stricter than `parse`: frames 20-29 pass only
// through the `[0-2]\d` class, hour prefixes are limited to 1-3.
static POINT_IN_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([1-3]:)?[0-5])?\d:[0-5]\d:[0-2]\d$").expect("valid regex")
});

static MEDIA_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})\.(\d{2})$").expect("valid regex")
});

/// Maps the media probe's hundredths of a second to a frame index.
///
/// Hand-tuned; it is not a linear rounding of `cs * 30 / 100` (see 30-36).
pub const CENTISECOND_TO_FRAME: [u8; 100] = [
    0, 0, 0, 1, 1, 1, 2, 2, 2, 3, //
    3, 3, 3, 4, 4, 4, 5, 5, 5, 6, //
    6, 6, 6, 7, 7, 7, 7, 8, 8, 8, //
    9, 9, 10, 10, 10, 10, 10, 11, 11, 11, //
    12, 12, 12, 13, 13, 13, 13, 14, 14, 14, //
    15, 15, 15, 15, 16, 16, 16, 16, 17, 17, //
    17, 18, 18, 18, 19, 19, 19, 19, 20, 20, //
    21, 21, 22, 22, 22, 22, 23, 23, 23, 24, //
    24, 24, 24, 25, 25, 25, 26, 26, 26, 26, //
    27, 27, 27, 27, 28, 28, 29, 29, 29, 29, //
];

/// A timecode at 30 fps.
///
/// Values built through [`Timecode::parse`], [`Timecode::new`] or
/// [`Timecode::from_frame_count`] always have `minutes < 60`,
/// `seconds < 60` and `frames < 30`. Parsed text with wider minute or
/// second fields (`75:00`) is folded into canonical form (`1:15:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl Timecode {
    /// Zero duration.
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
        frames: 0,
    };

    /// Build a timecode from fields, rejecting out-of-range values.
    pub fn new(hours: u32, minutes: u32, seconds: u32, frames: u32) -> Result<Self, TimecodeError> {
        let tc = Self {
            hours,
            minutes,
            seconds,
            frames,
        };
        tc.check(&tc.to_string_fields())?;
        Ok(tc)
    }

    /// Parse one of the three accepted shapes; first match wins.
    pub fn parse(text: &str) -> Result<Self, TimecodeError> {
        let fields = if let Some(caps) = SECONDS_FRAMES_RE.captures(text) {
            [None, None, caps.get(1), caps.get(2)]
        } else if let Some(caps) = MINUTES_RE.captures(text) {
            [None, caps.get(1), caps.get(2), caps.get(3)]
        } else if let Some(caps) = HOURS_RE.captures(text) {
            [caps.get(1), caps.get(2), caps.get(3), caps.get(4)]
        } else {
            return Err(TimecodeError::malformed(text));
        };

        let mut values = [0u32; 4];
        for (value, field) in values.iter_mut().zip(fields) {
            if let Some(digits) = field {
                *value = digits
                    .as_str()
                    .parse()
                    .map_err(|_| TimecodeError::malformed(text))?;
            }
        }
        let [hours, minutes, seconds, frames] = values;
        Self::fold(hours, minutes, seconds, frames, text)
    }

    /// Canonicalize fields through the frame count. Only the frame field
    /// is range-checked.
    fn fold(
        hours: u32,
        minutes: u32,
        seconds: u32,
        frames: u32,
        input: &str,
    ) -> Result<Self, TimecodeError> {
        check_frame(frames, input)?;
        let total = u64::from(frames)
            + FPS * u64::from(seconds)
            + FRAMES_PER_MINUTE * u64::from(minutes)
            + FRAMES_PER_HOUR * u64::from(hours);
        Ok(Self::from_frame_count(total))
    }

    fn check(&self, input: &str) -> Result<(), TimecodeError> {
        check_frame(self.frames, input)?;
        if self.minutes >= 60 || self.seconds >= 60 {
            return Err(TimecodeError::malformed(input));
        }
        Ok(())
    }

    fn to_string_fields(self) -> String {
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }

    /// Inverse of [`to_frame_count`](Self::to_frame_count).
    pub fn from_frame_count(frames: u64) -> Self {
        let total_seconds = frames / FPS;
        let hours = u32::try_from(total_seconds / 3600).unwrap_or(u32::MAX);
        Self {
            hours,
            minutes: ((total_seconds / 60) % 60) as u32,
            seconds: (total_seconds % 60) as u32,
            frames: (frames % FPS) as u32,
        }
    }

    /// Total number of frames denoted by this timecode.
    #[inline]
    pub fn to_frame_count(self) -> u64 {
        u64::from(self.frames)
            + FPS * u64::from(self.seconds)
            + FRAMES_PER_MINUTE * u64::from(self.minutes)
            + FRAMES_PER_HOUR * u64::from(self.hours)
    }

    /// Seconds as a float; the fractional part is `frames / 30`.
    #[inline]
    pub fn to_seconds(self) -> f64 {
        f64::from(self.hours) * 3600.0
            + f64::from(self.minutes) * 60.0
            + f64::from(self.seconds)
            + f64::from(self.frames) / FPS as f64
    }

    /// Field-wise borrow subtraction (radices 30, 60, 60).
    ///
    /// Fails when a borrow would be needed from above the hours field.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, TimecodeError> {
        let mut minuend = [
            i64::from(self.hours),
            i64::from(self.minutes),
            i64::from(self.seconds),
            i64::from(self.frames),
        ];
        let subtrahend = [
            i64::from(rhs.hours),
            i64::from(rhs.minutes),
            i64::from(rhs.seconds),
            i64::from(rhs.frames),
        ];
        let radices = [0, 60, 60, FPS as i64];
        let mut diffs = [0i64; 4];

        for index in (0..4).rev() {
            let mut diff = minuend[index] - subtrahend[index];
            if diff < 0 {
                if index == 0 {
                    return Err(TimecodeError::ArithmeticUnderflow {
                        minuend: self.to_string(),
                        subtrahend: rhs.to_string(),
                    });
                }
                diff += radices[index];
                minuend[index - 1] -= 1;
            }
            diffs[index] = diff;
        }

        let [hours, minutes, seconds, frames] = diffs.map(|d| d as u32);
        Ok(Self {
            hours,
            minutes,
            seconds,
            frames,
        })
    }

    /// Sum of two timecodes, computed in the frame domain.
    pub fn add_by_frames(self, rhs: Self) -> Self {
        Self::from_frame_count(self.to_frame_count() + rhs.to_frame_count())
    }

    /// True when every field is zero.
    pub fn is_zero(self) -> bool {
        self.to_frame_count() == 0
    }
}

fn check_frame(frame: u32, input: &str) -> Result<(), TimecodeError> {
    if u64::from(frame) >= FPS {
        return Err(TimecodeError::FrameOverflow {
            frame,
            input: input.to_string(),
        });
    }
    Ok(())
}

impl PartialOrd for Timecode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timecode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_frame_count().cmp(&other.to_frame_count())
    }
}

/// Shortest canonical form, e.g. `6:15`, `1:30:08`, `1:02:05:15`.
impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&from_frame_count(self.to_frame_count()))
    }
}

impl FromStr for Timecode {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timecode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timecode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timecode::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Parse a timecode string. See [`Timecode::parse`].
pub fn parse(text: &str) -> Result<Timecode, TimecodeError> {
    Timecode::parse(text)
}

/// Boolean form of [`parse`] for filtering.
pub fn is_valid(text: &str) -> bool {
    parse(text).is_ok()
}

/// Check a stored start time against the legacy point-in-time shape.
///
/// This is intentionally narrower than [`parse`]; a `false` here flags the
/// record for manual review rather than rejecting it.
pub fn validate_point_in_time(text: &str) -> bool {
    POINT_IN_TIME_RE.is_match(text)
}

/// Total frame count of a timecode.
#[inline]
pub fn to_frame_count(tc: Timecode) -> u64 {
    tc.to_frame_count()
}

/// Seconds of a timecode as a float.
#[inline]
pub fn to_seconds(tc: Timecode) -> f64 {
    tc.to_seconds()
}

/// Render a frame count as the shortest canonical timecode string.
///
/// Zero hours, then zero minutes, are dropped; the first remaining field is
/// unpadded and the frame field is always two digits.
pub fn from_frame_count(frames: u64) -> String {
    let total_seconds = frames / FPS;
    let frame = frames % FPS;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}:{frame:02}")
    } else if minutes > 0 {
        format!("{minutes}:{seconds:02}:{frame:02}")
    } else {
        format!("{seconds}:{frame:02}")
    }
}

/// Pad a timecode string to the four-field `HH:MM:SS:FF` form.
pub fn normalize_text(text: &str) -> String {
    let mut padded = text.trim().to_string();
    if padded.find(':') == Some(1) {
        padded.insert(0, '0');
    }
    while padded.matches(':').count() < 3 {
        padded.insert_str(0, "00:");
    }
    padded
}

/// Normalize to four fields and parse. Only used ahead of subtraction.
pub fn normalize(text: &str) -> Result<Timecode, TimecodeError> {
    let padded = normalize_text(text);
    Timecode::parse(&padded).map_err(|e| match e {
        TimecodeError::MalformedTimecode { .. } => TimecodeError::malformed(text),
        other => other,
    })
}

/// `minuend - subtrahend` over normalized four-field timecodes.
pub fn subtract(minuend: &str, subtrahend: &str) -> Result<Timecode, TimecodeError> {
    let a = normalize(minuend)?;
    let b = normalize(subtrahend)?;
    a.checked_sub(b).map_err(|e| match e {
        TimecodeError::ArithmeticUnderflow { .. } => TimecodeError::ArithmeticUnderflow {
            minuend: minuend.to_string(),
            subtrahend: subtrahend.to_string(),
        },
        other => other,
    })
}

/// `a + b` through the frame domain.
pub fn add_by_frames(a: Timecode, b: Timecode) -> Timecode {
    a.add_by_frames(b)
}

/// Frame index for a two-digit centisecond fraction.
#[inline]
pub fn centiseconds_to_frame(centiseconds: u8) -> Option<u32> {
    CENTISECOND_TO_FRAME
        .get(usize::from(centiseconds))
        .map(|&frame| u32::from(frame))
}

/// Convert a media-probe duration (`HH:MM:SS.cc`) to a timecode.
///
/// The fractional part is hundredths of a second, not a frame index.
pub fn media_duration_to_timecode(raw: &str) -> Result<Timecode, TimecodeError> {
    let raw = raw.trim();
    let caps = MEDIA_DURATION_RE
        .captures(raw)
        .ok_or_else(|| TimecodeError::malformed(raw))?;

    let field = |index: usize| -> Result<u32, TimecodeError> {
        caps[index].parse().map_err(|_| TimecodeError::malformed(raw))
    };
    let centiseconds: u8 = caps[4].parse().map_err(|_| TimecodeError::malformed(raw))?;
    let frames = centiseconds_to_frame(centiseconds).ok_or_else(|| TimecodeError::malformed(raw))?;

    Timecode::fold(field(1)?, field(2)?, field(3)?, frames, raw)
}

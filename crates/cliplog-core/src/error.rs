//! Error types for cliplog.

use thiserror::Error;

/// Failures raised by the timecode engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// The text matches none of the accepted timecode shapes.
    #[error("Malformed timecode: {input:?}")]
    MalformedTimecode { input: String },

    /// Frame field of 30 or more; the source was cut at another frame rate.
    #[error("Frame too large: {frame} in {input:?}")]
    FrameOverflow { frame: u32, input: String },

    /// The subtrahend is later than the minuend.
    #[error("Timecode underflow: {minuend} - {subtrahend}")]
    ArithmeticUnderflow {
        minuend: String,
        subtrahend: String,
    },

    /// A numeric sub-field could not be read as an integer.
    #[error("Bad numeric value: {value:?}")]
    NumericCoercionFailure { value: String },
}

impl TimecodeError {
    pub(crate) fn malformed(input: &str) -> Self {
        Self::MalformedTimecode {
            input: input.to_string(),
        }
    }
}

/// Main error type for cliplog operations.
#[derive(Error, Debug)]
pub enum ClipLogError {
    #[error(transparent)]
    Timecode(#[from] TimecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The media probe produced no `Duration:` line.
    #[error("No duration in probe output for {path}")]
    ProbeOutputMissing { path: String },

    #[error("Media probe failed for {path}: {message}")]
    Probe { path: String, message: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for cliplog operations.
pub type Result<T> = std::result::Result<T, ClipLogError>;

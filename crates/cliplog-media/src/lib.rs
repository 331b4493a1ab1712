//! cliplog media - external media tools
//!
//! This crate handles:
//! - Media length probing through ffprobe
//! - Content checksums for duplicate detection

pub mod hashing;
pub mod probe;

pub use hashing::{ContentHasher, Md5Hasher};
pub use probe::{parse_probe_output, DurationProbe, FfprobeCommand, MediaLength};

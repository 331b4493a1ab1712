//! cliplog core - timecode and statistics engines
//!
//! This crate holds everything that does not touch the database or the
//! filesystem:
//! - Frame-accurate 30fps timecode arithmetic (parse, subtract, normalize)
//! - Per-activity duration statistics and the fixed-width report
//! - The video/clip record model and its lifecycle
//! - Audits, duplicate grouping and data-entry helpers

pub mod activity;
pub mod clip;
pub mod duplicates;
pub mod entry;
pub mod error;
pub mod report;
pub mod review;
pub mod stats;
pub mod timecode;
pub mod video;

pub use activity::{ActivityCodes, ActivityMatch};
pub use clip::{Clip, DerivedFields, NewClip, RecordId, DEFAULT_MAGNITUDE};
pub use duplicates::{find_duplicate_groups, DuplicateGroup, DuplicateMember};
pub use entry::EntrySession;
pub use error::{ClipLogError, Result, TimecodeError};
pub use report::{format_duration, render, LabelTable};
pub use review::{audit_clips, duration_rows, AuditReport, FlaggedStart, InvalidDuration};
pub use stats::{aggregate, CategoryStats, StatsReport, TOTAL_CATEGORY};
pub use timecode::{Timecode, FPS};
pub use video::{Lifecycle, Video};

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! any SQLite executor (`&SqlitePool`, `&mut SqliteConnection`, or a
//! transaction via `&mut *tx`) as the first argument, so the caller decides
//! the transaction boundary.

pub mod clip_repo;
pub mod video_repo;

pub use clip_repo::ClipRepo;
pub use video_repo::VideoRepo;

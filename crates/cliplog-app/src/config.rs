//! Runtime configuration.

use cliplog_core::{LabelTable, Result};
use cliplog_media::FfprobeCommand;
use std::path::PathBuf;

/// Activity used for the first clip when none is typed.
pub const DEFAULT_ACTIVITY: &str = "BELOW";

/// Tool configuration loaded from environment variables.
///
/// All fields have defaults suitable for running next to the database and
/// the media files.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL.
    pub database_url: String,
    /// Directory holding the media files named in `videos.filename`.
    pub videos_dir: PathBuf,
    /// Explicit ffprobe executable; the sidecar lookup is used otherwise.
    pub ffprobe: Option<PathBuf>,
    /// Display names for the statistics report.
    pub labels: LabelTable,
    /// Starting activity for data entry.
    pub default_activity: String,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default               |
    /// |----------------------------|-----------------------|
    /// | `DATABASE_URL`             | `sqlite://example.db` |
    /// | `CLIPLOG_VIDEOS_DIR`       | `.`                   |
    /// | `CLIPLOG_FFPROBE`          | sidecar lookup        |
    /// | `CLIPLOG_LABELS`           | built-in labels only  |
    /// | `CLIPLOG_DEFAULT_ACTIVITY` | `BELOW`               |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            non_empty("DATABASE_URL").unwrap_or_else(|| "sqlite://example.db".into());

        let videos_dir = non_empty("CLIPLOG_VIDEOS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let ffprobe = non_empty("CLIPLOG_FFPROBE").map(PathBuf::from);

        let mut labels = LabelTable::default();
        if let Some(spec) = non_empty("CLIPLOG_LABELS") {
            labels.merge_spec(&spec)?;
        }

        let default_activity =
            non_empty("CLIPLOG_DEFAULT_ACTIVITY").unwrap_or_else(|| DEFAULT_ACTIVITY.into());

        Ok(Self {
            database_url,
            videos_dir,
            ffprobe,
            labels,
            default_activity,
        })
    }

    /// The configured media probe.
    pub fn probe(&self) -> FfprobeCommand {
        match &self.ffprobe {
            Some(program) => FfprobeCommand::new(program),
            None => FfprobeCommand::sidecar(),
        }
    }
}

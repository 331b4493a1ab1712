//! Media length probing.
//!
//! ffprobe writes its banner and stream summary to stderr; the length is on
//! the line holding `Duration: HH:MM:SS.cc, start: ...`.

use cliplog_core::{timecode, ClipLogError, Result, Timecode};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

const DURATION_MARKER: &str = "Duration:";

/// Length of one media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaLength {
    pub path: String,
    /// Raw probe value, e.g. `00:01:30.27`.
    pub raw: String,
    pub timecode: Timecode,
}

/// Something that can report how long a media file is.
pub trait DurationProbe {
    /// Full text output of the probe for `path`.
    fn probe_output(&self, path: &Path) -> Result<String>;

    /// Probe `path` and convert its length to a timecode.
    fn media_length(&self, path: &Path) -> Result<MediaLength> {
        let output = self.probe_output(path)?;
        parse_probe_output(&output, path)
    }
}

/// Runs the ffprobe executable.
#[derive(Debug, Clone)]
pub struct FfprobeCommand {
    program: PathBuf,
}

impl FfprobeCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// ffprobe next to the running executable, falling back to `PATH`.
    pub fn sidecar() -> Self {
        Self::new(ffmpeg_sidecar::ffprobe::ffprobe_path())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for FfprobeCommand {
    fn default() -> Self {
        Self::sidecar()
    }
}

impl DurationProbe for FfprobeCommand {
    fn probe_output(&self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(ClipLogError::NotFound(format!(
                "File not found: {}",
                path_str
            )));
        }

        debug!(program = %self.program.display(), path = %path_str, "Probing media");

        let output = Command::new(&self.program)
            .arg("-hide_banner")
            .arg(path)
            .output()
            .map_err(|e| ClipLogError::Probe {
                path: path_str.clone(),
                message: format!("Failed to spawn {}: {e}", self.program.display()),
            })?;

        // ffprobe exits non-zero for some containers yet still prints the
        // duration, so the status is only logged.
        if !output.status.success() {
            warn!(path = %path_str, status = %output.status, "ffprobe exited with failure");
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

/// Pull the length out of ffprobe's text output.
pub fn parse_probe_output(output: &str, path: &Path) -> Result<MediaLength> {
    let path_str = path.to_string_lossy().to_string();

    let line = output
        .lines()
        .find(|line| line.contains(DURATION_MARKER))
        .ok_or_else(|| ClipLogError::ProbeOutputMissing {
            path: path_str.clone(),
        })?;

    let raw = line
        .split_once(DURATION_MARKER)
        .map(|(_, rest)| rest)
        .unwrap_or_default()
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    let timecode = timecode::media_duration_to_timecode(&raw)?;
    Ok(MediaLength {
        path: path_str,
        raw,
        timecode,
    })
}

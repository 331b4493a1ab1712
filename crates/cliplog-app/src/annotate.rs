//! Interactive clip entry for one video.
//!
//! Prompts go to `out` and answers come from `input`, one line each, so the
//! loop can be driven from a terminal or from a script.

use std::io::{BufRead, Write};
use std::path::Path;

use chrono::NaiveDate;
use cliplog_core::{ActivityCodes, EntrySession, NewClip, RecordId};
use cliplog_media::DurationProbe;
use cliplog_store::{retry_busy, ClipRepo, CreateVideo, StoreError, VideoRepo};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{JobError, Result};

/// Answer that lists the known activity codes.
const LIST_ACTIVITIES: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateSummary {
    pub video_id: RecordId,
    pub clips: usize,
}

/// Everything the entry loop needs besides its streams.
pub struct Annotation<'a, P> {
    pub pool: &'a SqlitePool,
    pub probe: &'a P,
    pub videos_dir: &'a Path,
    pub default_activity: &'a str,
    pub today: NaiveDate,
}

impl<'a, P: DurationProbe> Annotation<'a, P> {
    /// Create the video record if needed and record clips until a blank
    /// start time.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        filename: &str,
        comment: Option<String>,
        input: &mut R,
        out: &mut W,
    ) -> Result<AnnotateSummary> {
        let video_id = match VideoRepo::find_by_filename(self.pool, filename).await? {
            Some(video) if video.edited => {
                return Err(JobError::AlreadyEdited(filename.to_string()));
            }
            Some(video) => video.id,
            None => {
                let body = CreateVideo {
                    filename: filename.to_string(),
                    comment,
                    created_date: self.today,
                };
                VideoRepo::create(self.pool, &body).await?.id
            }
        };

        let length = self.probe.media_length(&self.videos_dir.join(filename))?;
        writeln!(out, "Editing: {filename} ({})", length.timecode).map_err(io_error)?;

        let activities = ActivityCodes::new(ClipRepo::distinct_activities(self.pool).await?);
        let mut session = EntrySession::new(activities, length.timecode, self.default_activity);
        let mut clips = 0;

        // End of input ends the video; a half-typed clip is dropped.
        'clips: loop {
            let prompt = format!(
                "start_time clip {} ({}): ",
                session.clip_number(),
                session.auto_fill()
            );
            let Some(answer) = ask(input, out, &prompt)? else {
                break;
            };
            let Some(start) = session.start_time(&answer) else {
                break;
            };

            let suggested = match session.suggested_duration(&start) {
                Ok(tc) => tc.to_string(),
                Err(e) => {
                    writeln!(out, "Error: {e}").map_err(io_error)?;
                    continue;
                }
            };
            let Some(duration) = ask(input, out, &format!("duration ({suggested}): "))? else {
                break;
            };

            let activity = loop {
                let prompt = format!("activity ({},?): ", session.activity());
                let Some(answer) = ask(input, out, &prompt)? else {
                    break 'clips;
                };
                if answer.trim() != LIST_ACTIVITIES {
                    break answer;
                }
                writeln!(out, "{}", session.activities().choices().join(", "))
                    .map_err(io_error)?;
            };

            let Some(mag) = ask(input, out, "mag (1): ")? else {
                break;
            };

            let clip = match session.accept(&start, &duration, &activity, &mag) {
                Ok(clip) => clip,
                Err(e) => {
                    writeln!(out, "Error: {e}").map_err(io_error)?;
                    continue;
                }
            };

            self.store_clip(video_id, &clip, input, out).await?;
            clips += 1;
        }

        info!(video_id, clips, "Annotation finished");
        Ok(AnnotateSummary { video_id, clips })
    }

    async fn store_clip<R: BufRead, W: Write>(
        &self,
        video_id: RecordId,
        clip: &NewClip,
        input: &mut R,
        out: &mut W,
    ) -> Result<()> {
        let pool = self.pool;
        retry_busy(
            move || async move {
                let mut tx = pool.begin().await?;
                ClipRepo::create(&mut tx, video_id, clip).await?;
                tx.commit().await?;
                Ok::<_, StoreError>(())
            },
            |_| confirm_retry(input, out),
        )
        .await?;
        Ok(())
    }
}

/// Ask whether to retry a busy write. Anything but an answer starting with
/// `N` retries; end of input or a broken stream gives up.
fn confirm_retry<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> bool {
    match ask(input, out, "Database is busy. Retry? ") {
        Ok(Some(answer)) => !answer.trim().to_ascii_uppercase().starts_with('N'),
        Ok(None) => false,
        Err(e) => {
            warn!(error = %e, "Cannot read retry answer");
            false
        }
    }
}

/// Print `prompt` and read one line. `None` at end of input, so a blank
/// line and a closed stream stay distinguishable.
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<Option<String>> {
    write!(out, "{prompt}").map_err(io_error)?;
    out.flush().map_err(io_error)?;
    let mut line = String::new();
    if input.read_line(&mut line).map_err(io_error)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn io_error(e: std::io::Error) -> JobError {
    JobError::Core(e.into())
}

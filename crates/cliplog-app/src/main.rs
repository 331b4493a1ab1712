//! cliplog - clip log maintenance and reporting
//!
//! Entry point and command dispatch.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use cliplog_app::{jobs, AppConfig, Annotation, JobError};
use cliplog_core::{render, AuditReport, RecordId, Video};
use cliplog_media::{DurationProbe, Md5Hasher};
use cliplog_store::VideoRepo;
use sqlx::SqlitePool;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
usage: cliplog <command> [args]

commands:
  report [--json]              audit, backfill, then print activity statistics
  audit                        check stored start times and durations
  backfill                     fill missing start_frame / duration_seconds
  checksums                    hash media files that have no checksum
  duplicates                   list videos sharing a checksum
  length <file>...             print media lengths as timecodes
  annotate <filename> [comment] enter clips for a video
  produced <filename>          mark a video produced today
  next [after-filename]        show the next unproduced video
  videos                       list videos that have clips";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cliplog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return Ok(());
    };
    let rest = &args[1..];

    let config = AppConfig::from_env().context("Invalid configuration")?;

    if command == "length" {
        return length(&config, rest);
    }

    let pool = cliplog_store::connect(&config.database_url)
        .await
        .with_context(|| format!("Cannot open {}", config.database_url))?;

    match command.as_str() {
        "report" => report(&pool, &config, rest.iter().any(|a| a == "--json")).await,
        "audit" => audit(&pool).await.map(|_| ()),
        "backfill" => {
            let summary = jobs::backfill_derived(&pool).await?;
            println!("updated {} clip(s), skipped {}", summary.updated, summary.skipped);
            Ok(())
        }
        "checksums" => {
            let summary = jobs::compute_checksums(&pool, &config.videos_dir, &Md5Hasher).await?;
            println!(
                "stored {}, missing files {}, failed {}, duplicate content {}",
                summary.stored, summary.missing_files, summary.failed, summary.duplicates
            );
            Ok(())
        }
        "duplicates" => duplicates(&pool).await,
        "annotate" => annotate(&pool, &config, rest).await,
        "produced" => produced(&pool, rest).await,
        "next" => {
            match VideoRepo::next_unproduced(&pool, rest.first().map(String::as_str)).await? {
                Some(video) => print_video(&Video::from(video)),
                None => println!("No unproduced videos"),
            }
            Ok(())
        }
        "videos" => {
            for video in VideoRepo::list_with_clips(&pool).await? {
                print_video(&Video::from(video));
            }
            Ok(())
        }
        other => bail!("Unknown command {other:?}\n\n{USAGE}"),
    }
}

async fn report(pool: &SqlitePool, config: &AppConfig, json: bool) -> Result<()> {
    audit(pool).await?;
    jobs::backfill_derived(pool).await?;

    let stats = match jobs::statistics(pool).await {
        Ok(stats) => stats,
        Err(JobError::InvalidDurations(invalid)) => {
            bail!("{} clip(s) have unusable durations", invalid.len())
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", stats.to_json()?);
    } else {
        print!("{}", render(&stats, &config.labels));
    }
    Ok(())
}

/// Print findings; fails when any duration is unusable.
async fn audit(pool: &SqlitePool) -> Result<AuditReport> {
    let report = jobs::audit(pool).await?;
    let names = jobs::filenames(pool).await?;
    print_audit(&report, &names);
    if report.has_fatal() {
        bail!(
            "{} clip(s) have unusable durations; fix them before reporting",
            report.invalid_durations.len()
        );
    }
    info!(checked = report.checked, flagged = report.flagged_starts.len(), "Audit passed");
    Ok(report)
}

fn print_audit(report: &AuditReport, names: &HashMap<RecordId, String>) {
    if report.is_clean() {
        return;
    }
    let name = |id: RecordId| names.get(&id).map(String::as_str).unwrap_or("?");
    for flagged in &report.flagged_starts {
        eprintln!(
            "review: clip {} video {} ({}) start {:?}",
            flagged.clip_id,
            flagged.video_id,
            name(flagged.video_id),
            flagged.start_time
        );
    }
    for invalid in &report.invalid_durations {
        eprintln!(
            "error: clip {} video {} ({}) start {:?} duration {:?}: {}",
            invalid.clip_id,
            invalid.video_id,
            name(invalid.video_id),
            invalid.start_time,
            invalid.duration,
            invalid.error
        );
    }
    let videos: Vec<String> = report.video_ids().iter().map(|id| id.to_string()).collect();
    eprintln!("videos to check: {}", videos.join(" "));
}

async fn duplicates(pool: &SqlitePool) -> Result<()> {
    for group in jobs::duplicate_groups(pool).await? {
        println!("{}", group.checksum);
        for member in &group.members {
            println!(
                "  {:>6} {} {}",
                member.id,
                member.filename,
                member.comment.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

fn length(config: &AppConfig, files: &[String]) -> Result<()> {
    if files.is_empty() {
        bail!("usage: cliplog length <file>...");
    }
    let probe = config.probe();
    let mut failed = 0;
    for file in files {
        match probe.media_length(Path::new(file)) {
            Ok(length) => println!("{}\t{}\t{}", file, length.raw, length.timecode),
            Err(e) => {
                eprintln!("{file}: {e}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} file(s) could not be probed");
    }
    Ok(())
}

async fn annotate(pool: &SqlitePool, config: &AppConfig, rest: &[String]) -> Result<()> {
    let Some(filename) = rest.first() else {
        bail!("usage: cliplog annotate <filename> [comment]");
    };
    let comment = rest.get(1).cloned();
    let probe = config.probe();
    let annotation = Annotation {
        pool,
        probe: &probe,
        videos_dir: &config.videos_dir,
        default_activity: &config.default_activity,
        today: chrono::Local::now().date_naive(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let summary = annotation.run(filename, comment, &mut input, &mut out).await?;
    writeln!(out, "Stored {} clip(s) for video {}", summary.clips, summary.video_id)?;
    Ok(())
}

async fn produced(pool: &SqlitePool, rest: &[String]) -> Result<()> {
    let Some(filename) = rest.first() else {
        bail!("usage: cliplog produced <filename>");
    };
    let Some(video) = VideoRepo::find_by_filename(pool, filename).await? else {
        bail!("No video named {filename:?}");
    };
    let today = chrono::Local::now().date_naive();
    VideoRepo::mark_produced(pool, video.id, today).await?;
    println!("Produced {} ({})", video.id, video.filename);
    Ok(())
}

fn print_video(video: &Video) {
    println!("{:>6} {} ({})", video.id, video.filename, video.lifecycle());
}

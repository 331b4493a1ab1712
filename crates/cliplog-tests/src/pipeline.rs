//! Probe output to statistics, without a database.
//!
//! Exercises cliplog-media feeding cliplog-core's timecode, entry and
//! statistics engines.

use std::path::Path;

use cliplog_core::{
    aggregate, duration_rows, entry, format_duration, render, timecode, Clip, LabelTable,
};
use cliplog_media::parse_probe_output;

// ── Helpers ────────────────────────────────────────────────────

const PROBE: &str = "  Duration: 00:02:00.50, start: 0.000000, bitrate: 900 kb/s\n";

fn clip(id: i64, start: &str, duration: &str, activity: &str) -> Clip {
    Clip {
        id,
        video_id: 1,
        start_time: start.to_string(),
        duration: duration.to_string(),
        activity: activity.to_string(),
        mag: 1,
        derived: None,
    }
}

// ── Media length & defaults ────────────────────────────────────

#[test]
fn probed_length_drives_default_duration() {
    let length = parse_probe_output(PROBE, Path::new("v.mp4")).unwrap();
    assert_eq!(length.timecode.to_string(), "2:00:15");

    let remaining = length.timecode.to_string();
    let duration = entry::default_duration(&remaining, "1:30:00").unwrap();
    assert_eq!(duration.to_string(), "30:15");
    assert!(entry::default_duration(&remaining, "2:30:00").is_err());
}

#[test]
fn clips_tile_the_media() {
    let length = parse_probe_output(PROBE, Path::new("v.mp4")).unwrap();
    let first = clip(1, "0:00:00", "45:00", "U");
    let second = clip(2, "0:45:00", "1:15:15", "O");

    assert_eq!(first.end().unwrap(), second.start().unwrap());
    assert_eq!(second.end().unwrap(), length.timecode);
}

// ── Statistics ─────────────────────────────────────────────────

#[test]
fn stats_from_clip_strings() {
    let clips = vec![
        clip(1, "0:00:00", "10:00", "A"),
        clip(2, "0:10:00", "20:00", "A"),
        clip(3, "0:30:00", "5:00", "B"),
    ];
    let report = aggregate(duration_rows(&clips).unwrap());

    let total = report.total.as_ref().unwrap();
    assert_eq!(total.count, 3);
    assert!((total.mean - 35.0 / 3.0).abs() < 1e-9);
    assert_eq!(format_duration(total.sum), "00:35.00");

    let text = render(&report, &LabelTable::default());
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().last().unwrap().starts_with("Total"));
}

#[test]
fn frame_fractions_reach_the_report() {
    let seconds = timecode::to_seconds(timecode::parse("1:00:15").unwrap());
    assert!((seconds - 60.5).abs() < 1e-12);
    assert_eq!(format_duration(seconds), "01:00.50");
}

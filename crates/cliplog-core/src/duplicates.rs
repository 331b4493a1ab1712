//! Duplicate-content detection by checksum.
//!
//! Duplicates are reported, never merged or deleted.

use crate::clip::RecordId;
use crate::video::Video;
use serde::Serialize;
use std::collections::BTreeMap;

/// Comment prefix marking a duplicate someone has already acknowledged.
pub const ACKNOWLEDGED_PREFIX: &str = "dup";

/// One video in a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateMember {
    pub id: RecordId,
    pub filename: String,
    pub comment: Option<String>,
}

/// Videos sharing a checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub checksum: String,
    pub members: Vec<DuplicateMember>,
}

/// True when the comment marks the video as a known duplicate.
///
/// Case-insensitive, like the SQL `LIKE 'dup%'` filter it replaces.
pub fn is_acknowledged(comment: Option<&str>) -> bool {
    comment.is_some_and(|c| {
        c.get(..ACKNOWLEDGED_PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(ACKNOWLEDGED_PREFIX))
    })
}

/// Group videos by checksum and keep groups that still have two or more
/// unacknowledged members. Groups come back ordered by checksum.
pub fn find_duplicate_groups<'a, I>(videos: I) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = &'a Video>,
{
    let mut by_checksum: BTreeMap<&str, Vec<DuplicateMember>> = BTreeMap::new();
    for video in videos {
        let Some(checksum) = video.checksum.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        if is_acknowledged(video.comment.as_deref()) {
            continue;
        }
        by_checksum.entry(checksum).or_default().push(DuplicateMember {
            id: video.id,
            filename: video.filename.clone(),
            comment: video.comment.clone(),
        });
    }

    by_checksum
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(checksum, mut members)| {
            members.sort_by_key(|m| m.id);
            DuplicateGroup {
                checksum: checksum.to_string(),
                members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn video(id: RecordId, checksum: Option<&str>, comment: Option<&str>) -> Video {
        let mut v = Video::new(
            id,
            format!("clip{id}.mp4"),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        v.checksum = checksum.map(str::to_string);
        v.comment = comment.map(str::to_string);
        v
    }

    #[test]
    fn test_acknowledged_comments() {
        assert!(is_acknowledged(Some("dup of 12")));
        assert!(is_acknowledged(Some("DUP")));
        assert!(!is_acknowledged(Some("du")));
        assert!(!is_acknowledged(Some("bad video")));
        assert!(!is_acknowledged(None));
    }

    #[test]
    fn test_groups() {
        let videos = vec![
            video(1, Some("aa"), None),
            video(2, Some("bb"), None),
            video(3, Some("aa"), Some("censored")),
            video(4, Some("bb"), Some("dup of 2")),
            video(5, None, None),
            video(6, Some(""), None),
            video(7, Some(""), None),
        ];
        let groups = find_duplicate_groups(&videos);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].checksum, "aa");
        let ids: Vec<RecordId> = groups[0].members.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}

//! Video records and their annotation lifecycle.

use crate::clip::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a video is in the annotate/produce workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Selected for annotation, no clips yet.
    New,
    /// At least one clip attached.
    Edited,
    /// Downstream processing finished.
    Produced,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::Edited => "edited",
            Self::Produced => "produced",
        })
    }
}

/// A media file under annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: RecordId,
    pub filename: String,
    /// Content digest, set once.
    pub checksum: Option<String>,
    pub comment: Option<String>,
    pub edited: bool,
    pub produced: bool,
    pub created_date: Option<NaiveDate>,
    pub produced_date: Option<NaiveDate>,
}

impl Video {
    /// A fresh record for a file selected today.
    pub fn new(id: RecordId, filename: impl Into<String>, created_date: NaiveDate) -> Self {
        Self {
            id,
            filename: filename.into(),
            checksum: None,
            comment: None,
            edited: false,
            produced: false,
            created_date: Some(created_date),
            produced_date: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.produced {
            Lifecycle::Produced
        } else if self.edited {
            Lifecycle::Edited
        } else {
            Lifecycle::New
        }
    }
}

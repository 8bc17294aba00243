//! Persisted playlist and submission entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One approved playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A submission waiting for admin approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// The playlist entry this submission becomes once approved. Identity
    /// and content carry over; the submission timestamp does not.
    #[must_use]
    pub fn into_playlist_item(self) -> PlaylistItem {
        PlaylistItem {
            id: self.id,
            title: self.title,
            url: self.url,
            tags: self.tags,
        }
    }
}

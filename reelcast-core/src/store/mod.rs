//! Content store
//!
//! File-backed persistence for the approved playlist and the pending
//! submission queue. Two JSON documents under the configured data
//! directory, read once at open and rewritten whole (temp file + rename)
//! after every mutation. State mutations go through a single write lock,
//! and the in-memory copy is only committed after the file write succeeds.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::models::{PlaylistItem, Submission};
use crate::{Error, Result};

const PLAYLIST_FILE: &str = "playlist.json";
const SUBMISSIONS_FILE: &str = "submissions.json";

#[derive(Default)]
struct StoreState {
    playlist: Vec<PlaylistItem>,
    submissions: Vec<Submission>,
}

/// Persisted playlist entries and pending submissions.
pub struct ContentStore {
    data_dir: PathBuf,
    state: RwLock<StoreState>,
}

/// Entry counts reported by the health endpoint.
#[derive(Debug, Clone, Copy)]
pub struct StoreCounts {
    pub playlist_items: usize,
    pub pending_submissions: usize,
}

impl ContentStore {
    /// Open (or create) the store under `data_dir`.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await?;

        let playlist = read_json_file(&data_dir.join(PLAYLIST_FILE)).await?;
        let submissions = read_json_file(&data_dir.join(SUBMISSIONS_FILE)).await?;

        tracing::info!(
            data_dir = %data_dir.display(),
            playlist_items = playlist.len(),
            pending_submissions = submissions.len(),
            "content store opened"
        );

        Ok(Self {
            data_dir,
            state: RwLock::new(StoreState {
                playlist,
                submissions,
            }),
        })
    }

    pub async fn playlist(&self) -> Vec<PlaylistItem> {
        self.state.read().await.playlist.clone()
    }

    pub async fn submissions(&self) -> Vec<Submission> {
        self.state.read().await.submissions.clone()
    }

    /// Replace the whole playlist. Entries arriving without an id get one.
    pub async fn replace_playlist(&self, items: Vec<PlaylistItem>) -> Result<usize> {
        let replacement: Vec<PlaylistItem> = items
            .into_iter()
            .map(|mut item| {
                if item.id.is_empty() {
                    item.id = nanoid::nanoid!();
                }
                item
            })
            .collect();

        let mut state = self.state.write().await;
        write_json_file(&self.data_dir.join(PLAYLIST_FILE), &replacement).await?;
        state.playlist = replacement;
        Ok(state.playlist.len())
    }

    /// Queue a submission for admin review.
    ///
    /// At most one pending submission per URL; a repeat is a conflict.
    pub async fn submit(
        &self,
        title: String,
        url: String,
        tags: Vec<String>,
    ) -> Result<Submission> {
        let mut state = self.state.write().await;

        if state.submissions.iter().any(|s| s.url == url) {
            return Err(Error::AlreadyExists(
                "A submission for this URL is already pending".to_string(),
            ));
        }

        let submission = Submission {
            id: nanoid::nanoid!(),
            title,
            url,
            tags,
            submitted_at: Utc::now(),
        };

        let mut updated = state.submissions.clone();
        updated.push(submission.clone());
        write_json_file(&self.data_dir.join(SUBMISSIONS_FILE), &updated).await?;
        state.submissions = updated;

        Ok(submission)
    }

    /// Move a pending submission into the playlist.
    pub async fn approve(&self, id: &str) -> Result<PlaylistItem> {
        let mut state = self.state.write().await;

        let index = state
            .submissions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("No pending submission with id {id}")))?;

        let mut submissions = state.submissions.clone();
        let submission = submissions.remove(index);
        let item = submission.into_playlist_item();

        let mut playlist = state.playlist.clone();
        playlist.push(item.clone());

        write_json_file(&self.data_dir.join(PLAYLIST_FILE), &playlist).await?;
        write_json_file(&self.data_dir.join(SUBMISSIONS_FILE), &submissions).await?;

        state.playlist = playlist;
        state.submissions = submissions;

        Ok(item)
    }

    /// Drop a pending submission without approving it.
    pub async fn reject(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;

        let index = state
            .submissions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("No pending submission with id {id}")))?;

        let mut submissions = state.submissions.clone();
        submissions.remove(index);

        write_json_file(&self.data_dir.join(SUBMISSIONS_FILE), &submissions).await?;
        state.submissions = submissions;

        Ok(())
    }

    pub async fn counts(&self) -> StoreCounts {
        let state = self.state.read().await;
        StoreCounts {
            playlist_items: state.playlist.len(),
            pending_submissions: state.submissions.len(),
        }
    }
}

async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

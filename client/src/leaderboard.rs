//! Leaderboard client: remote API first, device-local snapshot on any
//! failure. Both tiers share the engine's cleaning rules, so a fallback
//! snapshot is semantically interchangeable with a remote one even though
//! the two are never reconciled. Every failure path is a one-shot
//! fallback; there are no retries.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use inflynced_engine::{clean, round_time, ScoreEntry, DISPLAY_LIMIT};

use crate::profile::UserProfile;
use crate::storage::{SnapshotStore, StorageError};

/// Placeholder avatar when the profile has no picture.
pub const DEFAULT_AVATAR: &str = "🧩";

/// Which storage tier answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Remote,
    /// The remote call failed; the UI should show its offline banner.
    LocalFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Standings {
    pub entries: Vec<ScoreEntry>,
    pub tier: Tier,
}

/// Remote acknowledgement of a submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub success: bool,
    pub message: String,
    pub position: usize,
    pub total_scores: usize,
    #[serde(default)]
    pub leaderboard: Vec<ScoreEntry>,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Remote(SubmitReceipt),
    /// Stored locally; carries the updated local standings.
    LocalFallback(Vec<ScoreEntry>),
}

#[derive(thiserror::Error, Debug)]
pub enum LeaderboardError {
    /// Even the local tier failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    username: &'a str,
    fid: &'a str,
    time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<&'a str>,
}

pub struct LeaderboardClient<S> {
    http: reqwest::Client,
    base_url: String,
    store: S,
}

impl<S: SnapshotStore> LeaderboardClient<S> {
    pub fn new(base_url: impl Into<String>, store: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            store,
        }
    }

    /// Submit a solve time (rounded to 0.1s) under `profile`'s identity.
    pub async fn submit(
        &self,
        profile: &UserProfile,
        time_secs: f64,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        let entry = ScoreEntry {
            username: profile.username.clone(),
            fid: profile.fid.clone(),
            time: round_time(time_secs),
            timestamp: now_unix_ms(),
            avatar: Some(
                profile
                    .pfp_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            ),
        };
        match self.post_score(&entry).await {
            Ok(receipt) => {
                tracing::info!(position = receipt.position, "score submitted");
                Ok(SubmitOutcome::Remote(receipt))
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote submission failed, storing locally");
                Ok(SubmitOutcome::LocalFallback(self.store_locally(entry)?))
            }
        }
    }

    /// Fetch the standings, falling back to the cleaned local snapshot.
    pub async fn fetch(&self) -> Result<Standings, LeaderboardError> {
        match self.get_scores().await {
            Ok(entries) => Ok(Standings {
                entries,
                tier: Tier::Remote,
            }),
            Err(err) => {
                tracing::warn!(error = %err, "leaderboard fetch failed, reading local snapshot");
                let mut entries = clean(self.store.load()?);
                entries.truncate(DISPLAY_LIMIT);
                Ok(Standings {
                    entries,
                    tier: Tier::LocalFallback,
                })
            }
        }
    }

    async fn post_score(&self, entry: &ScoreEntry) -> Result<SubmitReceipt, reqwest::Error> {
        self.http
            .post(format!("{}/api/submit-score", self.base_url))
            .json(&SubmitBody {
                username: &entry.username,
                fid: &entry.fid,
                time: entry.time,
                avatar: entry.avatar.as_deref(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn get_scores(&self) -> Result<Vec<ScoreEntry>, reqwest::Error> {
        self.http
            .get(format!("{}/api/leaderboard", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    fn store_locally(&self, entry: ScoreEntry) -> Result<Vec<ScoreEntry>, StorageError> {
        let mut scores = self.store.load()?;
        scores.push(entry);
        let mut cleaned = clean(scores);
        cleaned.truncate(DISPLAY_LIMIT);
        self.store.save(&cleaned)?;
        Ok(cleaned)
    }
}

fn now_unix_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

//! Device-local persistence: two JSON-encoded records (user profile and
//! leaderboard snapshot), read and written synchronously. Corrupt records
//! are treated as absent rather than fatal.

use std::fs;
use std::path::{Path, PathBuf};

use inflynced_engine::ScoreEntry;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::profile::UserProfile;

const LEADERBOARD_FILE: &str = "inflynced-leaderboard.json";
const PROFILE_FILE: &str = "inflynced-user-profile.json";

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Local leaderboard snapshot record.
pub trait SnapshotStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StorageError>;
    fn save(&self, scores: &[ScoreEntry]) -> Result<(), StorageError>;
}

/// Local user profile record.
pub trait ProfileStore {
    fn load(&self) -> Result<Option<UserProfile>, StorageError>;
    fn save(&self, profile: &UserProfile) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// JSON files under a data directory, one per record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, StorageError> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "discarding corrupt record");
                Ok(None)
            }
        }
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string(value)?;
        fs::write(self.dir.join(file), raw)?;
        Ok(())
    }

    fn remove(&self, file: &str) -> Result<(), StorageError> {
        let path = self.dir.join(file);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StorageError> {
        Ok(self.read(LEADERBOARD_FILE)?.unwrap_or_default())
    }

    fn save(&self, scores: &[ScoreEntry]) -> Result<(), StorageError> {
        self.write(LEADERBOARD_FILE, &scores)
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<UserProfile>, StorageError> {
        self.read(PROFILE_FILE)
    }

    fn save(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.write(PROFILE_FILE, profile)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.remove(PROFILE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> JsonFileStore {
        let dir = std::env::temp_dir().join(format!(
            "inflynced-storage-{tag}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        JsonFileStore::new(dir)
    }

    #[test]
    fn snapshot_round_trips() {
        let store = temp_store("snapshot");
        assert!(SnapshotStore::load(&store).unwrap().is_empty());
        let scores = vec![ScoreEntry {
            username: "abc".into(),
            fid: "123".into(),
            time: 9.9,
            timestamp: 1,
            avatar: Some("🧩".into()),
        }];
        SnapshotStore::save(&store, &scores).unwrap();
        assert_eq!(SnapshotStore::load(&store).unwrap(), scores);
    }

    #[test]
    fn corrupt_records_read_as_absent() {
        let store = temp_store("corrupt");
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join(LEADERBOARD_FILE), "{not json").unwrap();
        assert!(SnapshotStore::load(&store).unwrap().is_empty());
    }

    #[test]
    fn profile_clear_removes_the_record() {
        let store = temp_store("profile");
        let profile = UserProfile {
            username: "alice".into(),
            fid: "a1b2c3".into(),
            display_name: None,
            pfp_url: None,
        };
        ProfileStore::save(&store, &profile).unwrap();
        assert_eq!(ProfileStore::load(&store).unwrap(), Some(profile));
        store.clear().unwrap();
        assert_eq!(ProfileStore::load(&store).unwrap(), None);
    }
}

//! Score storage behind a narrow read/write interface. Handlers never
//! touch shared mutable state directly; they load a snapshot, derive the
//! next one, and write it back through the trait.

use std::sync::Arc;

use inflynced_engine::ScoreEntry;
use parking_lot::Mutex;

pub trait ScoreStore: Send + Sync {
    /// Current snapshot of all stored entries.
    fn load(&self) -> Vec<ScoreEntry>;
    /// Replace the stored snapshot wholesale.
    fn replace(&self, scores: Vec<ScoreEntry>);
}

pub type SharedStore = Arc<dyn ScoreStore>;

/// Process-memory store. State lives only as long as the process: a
/// restart or a fresh serverless instance starts from an empty board.
/// Swapping in a database-backed implementation only requires another
/// `ScoreStore`.
#[derive(Default)]
pub struct MemoryStore {
    scores: Mutex<Vec<ScoreEntry>>,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Vec<ScoreEntry> {
        self.scores.lock().clone()
    }

    fn replace(&self, scores: Vec<ScoreEntry>) {
        *self.scores.lock() = scores;
    }
}

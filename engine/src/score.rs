//! Leaderboard score types and cleaning rules. The server and the client's
//! local fallback apply the exact same filtering and best-per-user
//! de-duplication so the two storage tiers stay semantically consistent
//! even though they are never reconciled with each other.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Entries shown to players.
pub const DISPLAY_LIMIT: usize = 10;
/// Entries the service keeps internally.
pub const STORE_LIMIT: usize = 50;
/// Upper bound on an accepted solve time (one hour).
pub const MAX_TIME_SECS: f64 = 3600.0;
/// Usernames are truncated to this many characters.
pub const USERNAME_MAX_LEN: usize = 20;
/// Sample usernames seeded during development, filtered from every view.
pub const DEMO_USERNAMES: [&str; 3] = ["puzzlemaster", "speedsolver", "braingamer"];

/// One leaderboard row. `fid` is the de-duplication key: at most one entry
/// per fid survives cleaning, the one with the lowest time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub fid: String,
    /// Solve time in seconds, rounded to one decimal.
    pub time: f64,
    /// Milliseconds since the Unix epoch, assigned by whichever tier
    /// recorded the entry.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Round a solve time to 0.1s precision.
pub fn round_time(secs: f64) -> f64 {
    (secs * 10.0).round() / 10.0
}

/// Demo/sample data check: the three hardcoded development usernames, any
/// fid containing "demo" or "sample", and entries with empty identity
/// fields all count as demo data.
pub fn is_demo(entry: &ScoreEntry) -> bool {
    DEMO_USERNAMES.contains(&entry.username.as_str())
        || entry.fid.contains("demo")
        || entry.fid.contains("sample")
        || entry.username.is_empty()
        || entry.fid.is_empty()
}

/// Canonicalize a score list: drop demo data, keep only the best time per
/// fid, and sort ascending by time (ties broken by submission timestamp).
/// Idempotent: cleaning a cleaned list is a no-op.
pub fn clean(scores: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    let mut best: HashMap<String, ScoreEntry> = HashMap::new();
    for entry in scores.into_iter().filter(|e| !is_demo(e)) {
        let replace = match best.get(&entry.fid) {
            Some(current) => entry.time < current.time,
            None => true,
        };
        if replace {
            best.insert(entry.fid.clone(), entry);
        }
    }
    let mut cleaned: Vec<ScoreEntry> = best.into_values().collect();
    cleaned.sort_by(|a, b| {
        a.time
            .total_cmp(&b.time)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(username: &str, fid: &str, time: f64) -> ScoreEntry {
        ScoreEntry {
            username: username.to_string(),
            fid: fid.to_string(),
            time,
            timestamp: 1_700_000_000_000,
            avatar: None,
        }
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round_time(9.87), 9.9);
        assert_eq!(round_time(12.34), 12.3);
        assert_eq!(round_time(0.0), 0.0);
    }

    #[test]
    fn demo_data_is_filtered() {
        let scores = vec![
            entry("puzzlemaster", "1", 1.0),
            entry("speedsolver", "2", 2.0),
            entry("braingamer", "3", 3.0),
            entry("alice", "demo-4", 4.0),
            entry("bob", "sample-5", 5.0),
            entry("", "6", 6.0),
            entry("carol", "", 7.0),
            entry("dave", "8", 8.0),
        ];
        let cleaned = clean(scores);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].username, "dave");
    }

    #[test]
    fn keeps_best_time_per_fid() {
        let cleaned = clean(vec![
            entry("abc", "123", 12.34),
            entry("abc", "123", 9.87),
            entry("zed", "456", 20.0),
        ]);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].fid, "123");
        assert_eq!(cleaned[0].time, 9.87);
        assert_eq!(cleaned[1].fid, "456");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let scores = vec![
            entry("abc", "123", 12.34),
            entry("abc", "123", 9.87),
            entry("puzzlemaster", "x", 1.0),
            entry("zed", "456", 20.0),
        ];
        let once = clean(scores);
        let twice = clean(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn sorts_ascending_by_time() {
        let cleaned = clean(vec![
            entry("slow", "1", 30.0),
            entry("fast", "2", 5.0),
            entry("mid", "3", 15.0),
        ]);
        let times: Vec<f64> = cleaned.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![5.0, 15.0, 30.0]);
    }

    #[test]
    fn avatar_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&entry("dave", "8", 8.0)).unwrap();
        assert!(!json.contains("avatar"));
    }
}

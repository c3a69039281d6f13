use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct BestScoreFile {
    best: u32,
}

/// Device-local best score. Read once on load, rewritten whenever the
/// in-session score exceeds it — independent of whether a leaderboard
/// submission ever happens or succeeds.
#[derive(Debug)]
pub struct BestScoreStore {
    path: PathBuf,
    best: u32,
}

impl BestScoreStore {
    /// Missing or unreadable files mean no recorded best yet.
    pub fn load(path: PathBuf) -> Self {
        let best = std::fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str::<BestScoreFile>(&contents).ok())
            .map(|file| file.best)
            .unwrap_or(0);
        Self { path, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a score; persists and returns true only when it beats the
    /// stored best. Write failures are logged, never fatal.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Ok(contents) = serde_json::to_string(&BestScoreFile { best: score })
            && let Err(e) = std::fs::write(&self.path, contents)
        {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist best score");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = BestScoreStore::load(dir.path().join("best.json"));
        assert_eq!(store.best(), 0);
    }

    #[test]
    fn corrupt_file_means_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");
        std::fs::write(&path, "not json").unwrap();
        let store = BestScoreStore::load(path);
        assert_eq!(store.best(), 0);
    }

    #[test]
    fn record_persists_only_improvements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");

        let mut store = BestScoreStore::load(path.clone());
        assert!(store.record(40));
        assert!(!store.record(40), "equal score is not a new best");
        assert!(!store.record(10));
        assert!(store.record(70));

        let reloaded = BestScoreStore::load(path);
        assert_eq!(reloaded.best(), 70);
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        let mut store = BestScoreStore::load(PathBuf::from("/nonexistent-dir/best.json"));
        assert!(store.record(10), "in-memory best still updates");
        assert_eq!(store.best(), 10);
    }
}
